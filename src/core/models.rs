use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedContact {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub github: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectSource {
    NumberedList,
    WorkExperience,
    BulletedEntry,
    LabeledLine,
    SectionText,
}

impl ProjectSource {
    pub fn is_work_experience(self) -> bool {
        matches!(self, ProjectSource::WorkExperience)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectEntry {
    pub title: String,
    pub description: String,
    pub duration: Option<String>,
    pub source: ProjectSource,
}

impl ProjectEntry {
    pub fn new(title: impl Into<String>, description: impl Into<String>, source: ProjectSource) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            duration: None,
            source,
        }
    }

    pub fn with_duration(mut self, duration: Option<String>) -> Self {
        self.duration = duration;
        self
    }
}

/// A project as exposed to callers. `id` is the 1-based position in the final list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: usize,
    pub title: String,
    pub desc: String,
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobCategory {
    #[default]
    Engineering,
    Design,
    Marketing,
    BusinessPlanning,
}

impl JobCategory {
    pub fn insight_key(self) -> &'static str {
        match self {
            JobCategory::Engineering => "developer",
            JobCategory::Design => "designer",
            JobCategory::Marketing => "marketer",
            JobCategory::BusinessPlanning => "service",
        }
    }

    /// Accepts both the category names and the legacy job keys.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "engineering" | "developer" => Some(JobCategory::Engineering),
            "design" | "designer" => Some(JobCategory::Design),
            "marketing" | "marketer" => Some(JobCategory::Marketing),
            "business-planning" | "business_planning" | "service" => {
                Some(JobCategory::BusinessPlanning)
            }
            _ => None,
        }
    }

    pub fn favors_work_history(self) -> bool {
        matches!(self, JobCategory::Marketing | JobCategory::BusinessPlanning)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyProjectFields {
    pub project1_title: String,
    pub project1_desc: String,
    pub project1_link: String,
    pub project2_title: String,
    pub project2_desc: String,
    pub project2_link: String,
    pub project3_title: String,
    pub project3_desc: String,
    pub project3_link: String,
}

impl LegacyProjectFields {
    pub fn from_projects(projects: &[ProjectRecord]) -> Self {
        let title = |idx: usize| projects.get(idx).map(|p| p.title.clone()).unwrap_or_default();
        let desc = |idx: usize| projects.get(idx).map(|p| p.desc.clone()).unwrap_or_default();

        Self {
            project1_title: title(0),
            project1_desc: desc(0),
            project1_link: String::new(),
            project2_title: title(1),
            project2_desc: desc(1),
            project2_link: String::new(),
            project3_title: title(2),
            project3_desc: desc(2),
            project3_link: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedProfile {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub github: Option<String>,
    pub intro: String,
    pub career_summary: String,
    /// Same value as `github`, empty when absent.
    pub link: String,
    pub projects: Vec<ProjectRecord>,
    #[serde(flatten)]
    pub legacy: LegacyProjectFields,
    pub skills: Vec<String>,
    pub job_type: JobCategory,
    pub original: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentText {
    pub text: String,
    pub images: Vec<String>,
    pub ocr_used: bool,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuntimeSettings {
    pub tesseract_path: String,
    pub ocr_language: String,
    pub ocr_timeout_seconds: u64,
    pub max_file_size_bytes: usize,
    pub insights_path: Option<String>,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            tesseract_path: "tesseract".to_string(),
            ocr_language: "kor+eng".to_string(),
            ocr_timeout_seconds: 120,
            max_file_size_bytes: 10 * 1024 * 1024,
            insights_path: None,
        }
    }
}
