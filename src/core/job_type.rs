use tracing::debug;

use super::models::{JobCategory, ProjectEntry, ProjectRecord};
use super::project_parser::MAX_PROJECTS;

const DESIGN_KEYWORDS: &[&str] = &["Figma", "Photoshop", "Illustrator", "Sketch", "XD"];
const MARKETING_KEYWORDS: &[&str] = &["GA", "Analytics", "SEO", "Marketing"];

/// Design wins over marketing; anything else is engineering. Business planning is
/// only ever chosen explicitly by the caller.
pub fn infer_job_category(skills: &[String]) -> JobCategory {
    let mentions = |keywords: &[&str]| {
        skills
            .iter()
            .any(|skill| keywords.iter().any(|keyword| skill.contains(keyword)))
    };

    if mentions(DESIGN_KEYWORDS) {
        JobCategory::Design
    } else if mentions(MARKETING_KEYWORDS) {
        JobCategory::Marketing
    } else {
        JobCategory::Engineering
    }
}

pub fn reorder_projects(entries: Vec<ProjectEntry>, category: JobCategory) -> Vec<ProjectRecord> {
    let (work, declared): (Vec<ProjectEntry>, Vec<ProjectEntry>) = entries
        .into_iter()
        .partition(|entry| entry.source.is_work_experience());

    let ordered: Vec<ProjectEntry> = if category.favors_work_history() {
        work.into_iter().chain(declared).collect()
    } else {
        declared.into_iter().chain(work).collect()
    };

    let records: Vec<ProjectRecord> = ordered
        .into_iter()
        .take(MAX_PROJECTS)
        .enumerate()
        .map(|(idx, entry)| ProjectRecord {
            id: idx + 1,
            title: entry.title,
            desc: entry.description,
            duration: entry.duration,
        })
        .collect();

    debug!(
        category = category.insight_key(),
        count = records.len(),
        "reordered projects"
    );
    records
}
