pub mod completeness;
pub mod document_parser;
pub mod errors;
pub mod field_extractor;
pub mod insights;
pub mod job_type;
pub mod models;
pub mod ocr;
pub mod pdf;
pub mod profile;
pub mod project_parser;
pub mod section_locator;
pub mod service;
pub mod settings_store;
pub mod skill_extractor;
pub mod text;
