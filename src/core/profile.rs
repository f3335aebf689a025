use once_cell::sync::Lazy;
use tracing::debug;

use super::field_extractor::extract_contact;
use super::job_type::{infer_job_category, reorder_projects};
use super::models::{ExtractedProfile, JobCategory, LegacyProjectFields};
use super::project_parser::parse_projects;
use super::section_locator::SectionLocator;
use super::skill_extractor::{SkillMatcher, DEFAULT_SKILL_MATCHER};
use super::text::{char_len, collapse_whitespace, truncate_chars};

pub const INTRO_HEADERS: &[&str] = &[
    "자기소개서",
    "자기소개",
    "Self Introduction",
    "Intro",
    "About Me",
    "소개",
    "인사말",
];
pub const CAREER_HEADERS: &[&str] = &[
    "경력 기술서",
    "경력",
    "Work Experience",
    "Career",
    "Experience",
    "이력",
    "업무 경험",
];

const MAX_INTRO_CHARS: usize = 500;
const MAX_CAREER_CHARS: usize = 1000;
const INTRO_PREFIX_CHARS: usize = 50;
const CAREER_PREFIX_CHARS: usize = 150;
const CAREER_PREFIX_THRESHOLD: usize = 100;
const NEWCOMER_CAREER: &str = "신입 개발자로서의 첫 걸음을 준비하고 있습니다.";

static INTRO_LOCATOR: Lazy<SectionLocator> =
    Lazy::new(|| SectionLocator::new(INTRO_HEADERS).unwrap());
static CAREER_LOCATOR: Lazy<SectionLocator> =
    Lazy::new(|| SectionLocator::new(CAREER_HEADERS).unwrap());

#[derive(Debug, Clone)]
pub struct ProfileAssembler {
    skills: SkillMatcher,
}

impl Default for ProfileAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_SKILL_MATCHER.clone())
    }
}

impl ProfileAssembler {
    pub fn new(skills: SkillMatcher) -> Self {
        Self { skills }
    }

    pub fn assemble(&self, text: &str) -> ExtractedProfile {
        self.assemble_with_category(text, None)
    }

    /// `category` overrides inference; it is the only way to get business planning.
    pub fn assemble_with_category(
        &self,
        text: &str,
        category: Option<JobCategory>,
    ) -> ExtractedProfile {
        let contact = extract_contact(text);
        let skills = self.skills.extract(text);
        let entries = parse_projects(text);

        let job_type = category.unwrap_or_else(|| infer_job_category(&skills));
        let projects = reorder_projects(entries, job_type);

        let intro = non_empty(INTRO_LOCATOR.locate(text))
            .unwrap_or_else(|| synthesize_intro(text, &skills, contact.name.as_deref()));
        let career_summary =
            non_empty(CAREER_LOCATOR.locate(text)).unwrap_or_else(|| career_prefix(text));

        debug!(
            skills = skills.len(),
            projects = projects.len(),
            job_type = job_type.insight_key(),
            "assembled profile"
        );

        ExtractedProfile {
            link: contact.github.clone().unwrap_or_default(),
            name: contact.name,
            email: contact.email,
            phone: contact.phone,
            github: contact.github,
            intro: truncate_chars(&collapse_whitespace(&intro), MAX_INTRO_CHARS),
            career_summary: truncate_chars(&collapse_whitespace(&career_summary), MAX_CAREER_CHARS),
            legacy: LegacyProjectFields::from_projects(&projects),
            projects,
            skills,
            job_type,
            original: text.to_string(),
        }
    }
}

pub fn assemble_profile(text: &str) -> ExtractedProfile {
    ProfileAssembler::default().assemble(text)
}

fn non_empty(section: Option<String>) -> Option<String> {
    section.filter(|body| !body.trim().is_empty())
}

fn synthesize_intro(text: &str, skills: &[String], name: Option<&str>) -> String {
    if skills.is_empty() {
        return format!("{}...", truncate_chars(text, INTRO_PREFIX_CHARS));
    }

    let top = skills.iter().take(3).cloned().collect::<Vec<_>>().join(", ");
    format!(
        "{} 등의 기술을 보유한 {} 개발자입니다.",
        top,
        name.unwrap_or("열정적인")
    )
}

fn career_prefix(text: &str) -> String {
    if char_len(text) > CAREER_PREFIX_THRESHOLD {
        format!("{}...", truncate_chars(text, CAREER_PREFIX_CHARS))
    } else {
        NEWCOMER_CAREER.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::project_parser::MISSING_DESCRIPTION;

    const KOREAN_RESUME: &str = "이름: 김민수\n\
        이메일: minsu.kim@example.com\n\
        연락처: 010 2345 6789\n\
        GitHub: github.com/minsu-dev\n\
        [자기소개서]\n\
        사용자 경험을   중시하는\n프론트엔드 개발자입니다.\n\
        [주요 프로젝트]\n\
        1. MoodFolio 포트폴리오 생성기 (2023.03 - 2023.08)\n\
        - React와 TypeScript로 포트폴리오 자동 생성 서비스 개발\n\
        2. 사내 대시보드\n\
        - Next.js 기반 매출 지표 시각화\n\
        [경력]\n\
        2021.03 - 2023.12\n\
        한빛소프트\n\
        프론트엔드 개발자\n\
        - 결제 화면 개편\n";

    #[test]
    fn assembles_korean_resume() {
        let profile = assemble_profile(KOREAN_RESUME);

        assert_eq!(profile.name.as_deref(), Some("김민수"));
        assert_eq!(profile.email.as_deref(), Some("minsu.kim@example.com"));
        assert_eq!(profile.phone.as_deref(), Some("010-2345-6789"));
        assert_eq!(
            profile.github.as_deref(),
            Some("https://github.com/minsu-dev")
        );
        assert_eq!(profile.link, "https://github.com/minsu-dev");
        assert_eq!(profile.intro, "사용자 경험을 중시하는 프론트엔드 개발자입니다.");
        assert!(profile.skills.contains(&"React".to_string()));
        assert!(profile.skills.contains(&"TypeScript".to_string()));
        assert!(profile.skills.contains(&"Next.js".to_string()));
        assert_eq!(profile.job_type, JobCategory::Engineering);

        let titles: Vec<&str> = profile.projects.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["MoodFolio 포트폴리오 생성기", "사내 대시보드", "한빛소프트 - 프론트엔드 개발자"]
        );
        assert_eq!(profile.projects[0].duration.as_deref(), Some("2023.03 - 2023.08"));
        assert_eq!(profile.projects[2].id, 3);
        assert_eq!(profile.legacy.project1_title, "MoodFolio 포트폴리오 생성기");
        assert_eq!(profile.legacy.project3_title, "한빛소프트 - 프론트엔드 개발자");
        assert_eq!(profile.original, KOREAN_RESUME);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let assembler = ProfileAssembler::default();
        let first = serde_json::to_string(&assembler.assemble(KOREAN_RESUME)).unwrap();
        let second = serde_json::to_string(&assembler.assemble(KOREAN_RESUME)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn design_skills_move_declared_projects_ahead_of_work_history() {
        let text = "Skills: Figma, Photoshop\n\
            Work Experience\n\
            2020.01 - 2022.12\n\
            Pixel Studio\n\
            Product Designer\n\
            - Led design system\n\
            1. Brand Renewal\n\
            로고와 컬러 시스템 전면 개편\n";

        let profile = assemble_profile(text);
        assert_eq!(profile.job_type, JobCategory::Design);
        let titles: Vec<&str> = profile.projects.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Brand Renewal", "Pixel Studio - Product Designer"]);
        assert_eq!(profile.projects[0].id, 1);
        assert_eq!(profile.projects[1].id, 2);
    }

    #[test]
    fn explicit_category_overrides_inference() {
        let text = "Skills: Figma\n\
            Work Experience\n\
            2020.01 - 2022.12\n\
            Pixel Studio\n\
            Service Planner\n\
            - Ran user interviews\n\
            1. Onboarding Redesign\n\
            가입 흐름 단순화 작업 진행\n";

        let profile = ProfileAssembler::default()
            .assemble_with_category(text, Some(JobCategory::BusinessPlanning));
        assert_eq!(profile.job_type, JobCategory::BusinessPlanning);
        assert_eq!(profile.projects[0].title, "Pixel Studio - Service Planner");
    }

    #[test]
    fn exposes_at_most_six_projects() {
        let text: String = (1..=10)
            .map(|n| format!("{n}. Service Module {n}\n상세 설명 문장 {n}\n"))
            .collect();

        let profile = assemble_profile(&text);
        assert_eq!(profile.projects.len(), 6);
        assert_eq!(profile.projects[5].id, 6);
        assert_eq!(profile.projects[5].title, "Service Module 6");
    }

    #[test]
    fn bare_numbered_entry_gets_placeholder_description() {
        let profile = assemble_profile("1. My App");
        assert_eq!(profile.projects.len(), 1);
        assert_eq!(profile.projects[0].desc, MISSING_DESCRIPTION);
        assert_eq!(profile.legacy.project1_desc, MISSING_DESCRIPTION);
        assert_eq!(profile.legacy.project2_title, "");
    }

    #[test]
    fn plain_prose_yields_nulls_and_fallback_narratives() {
        let text = "I enjoy building delightful products with small teams.";
        let profile = assemble_profile(text);

        assert!(profile.name.is_none());
        assert!(profile.email.is_none());
        assert!(profile.phone.is_none());
        assert!(profile.github.is_none());
        assert_eq!(profile.link, "");
        assert!(profile.skills.is_empty());
        assert!(profile.projects.is_empty());
        assert_eq!(profile.job_type, JobCategory::Engineering);
        assert_eq!(
            profile.intro,
            "I enjoy building delightful products with small te..."
        );
        assert_eq!(profile.career_summary, NEWCOMER_CAREER);
    }

    #[test]
    fn intro_falls_back_to_top_skills_and_name() {
        let text = "이름: 홍길동\nReact, Docker, AWS, Python 사용 경험 보유";
        let profile = assemble_profile(text);
        assert_eq!(
            profile.intro,
            "React, Python, Docker 등의 기술을 보유한 홍길동 개발자입니다."
        );
    }

    #[test]
    fn long_text_without_career_header_uses_prefix() {
        let text = format!("Summary line. {}", "a".repeat(200));
        let profile = assemble_profile(&text);
        assert!(profile.career_summary.ends_with("..."));
        assert_eq!(char_len(&profile.career_summary), 153);
    }

    #[test]
    fn serializes_flattened_legacy_fields() {
        let value = serde_json::to_value(assemble_profile("1. My App")).unwrap();
        assert_eq!(value["project1_title"], "My App");
        assert_eq!(value["project1_link"], "");
        assert_eq!(value["career_summary"], NEWCOMER_CAREER);
        assert!(value["name"].is_null());
        assert_eq!(value["job_type"], "engineering");
    }
}
