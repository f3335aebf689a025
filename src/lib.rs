pub mod core;

pub use crate::core::errors::CoreError;
pub use crate::core::models::{ExtractedProfile, JobCategory, ProjectRecord};
pub use crate::core::profile::{assemble_profile, ProfileAssembler};
pub use crate::core::service::{AnalysisReport, ResumeAnalysisService};
