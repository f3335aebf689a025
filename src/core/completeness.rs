use serde::Serialize;

use super::models::ExtractedProfile;
use super::project_parser::MISSING_DESCRIPTION;
use super::text::char_len;

const NAME_WEIGHT: f64 = 5.0;
const EMAIL_WEIGHT: f64 = 5.0;
const PHONE_WEIGHT: f64 = 5.0;
const INTRO_WEIGHT: f64 = 10.0;
const JOB_WEIGHT: f64 = 10.0;
const CAREER_WEIGHT: f64 = 10.0;
const PROJECTS_COUNT_WEIGHT: f64 = 10.0;
const PROJECTS_COMPLETE_WEIGHT: f64 = 15.0;
const SKILLS_WEIGHT: f64 = 10.0;
const GITHUB_WEIGHT: f64 = 2.5;

pub const MAX_SCORE: f64 = NAME_WEIGHT
    + EMAIL_WEIGHT
    + PHONE_WEIGHT
    + INTRO_WEIGHT
    + JOB_WEIGHT
    + CAREER_WEIGHT
    + PROJECTS_COUNT_WEIGHT
    + PROJECTS_COMPLETE_WEIGHT
    + SKILLS_WEIGHT
    + GITHUB_WEIGHT;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingField {
    pub field: &'static str,
    pub label: &'static str,
    pub weight: f64,
    pub priority: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileCompleteness {
    pub percentage: u32,
    pub score: f64,
    pub max_score: f64,
    pub missing: Vec<MissingField>,
}

pub fn score_completeness(profile: &ExtractedProfile) -> ProfileCompleteness {
    let mut score: f64 = 0.0;
    let mut missing = Vec::new();

    let mut check = |present: bool, field: &'static str, label: &'static str, weight: f64, priority: u8| {
        if present {
            score += weight;
        } else {
            missing.push(MissingField {
                field,
                label,
                weight,
                priority,
            });
        }
    };

    check(has_text(profile.name.as_deref()), "name", "이름", NAME_WEIGHT, 1);
    check(has_text(profile.email.as_deref()), "email", "이메일", EMAIL_WEIGHT, 1);
    check(has_text(profile.phone.as_deref()), "phone", "전화번호", PHONE_WEIGHT, 2);
    check(
        char_len(profile.intro.trim()) > 10,
        "intro",
        "자기소개",
        INTRO_WEIGHT,
        1,
    );
    // The job category is always resolved.
    check(true, "job", "직무", JOB_WEIGHT, 1);
    check(
        char_len(profile.career_summary.trim()) > 20,
        "career_summary",
        "경력 요약",
        CAREER_WEIGHT,
        2,
    );
    check(!profile.skills.is_empty(), "skills", "보유 기술", SKILLS_WEIGHT, 2);
    check(has_text(profile.github.as_deref()), "github", "GitHub 링크", GITHUB_WEIGHT, 3);

    if profile.projects.is_empty() {
        missing.push(MissingField {
            field: "projects_count",
            label: "프로젝트 추가",
            weight: PROJECTS_COUNT_WEIGHT,
            priority: 1,
        });
        missing.push(MissingField {
            field: "projects_complete",
            label: "프로젝트 상세 정보",
            weight: PROJECTS_COMPLETE_WEIGHT,
            priority: 1,
        });
    } else {
        score += PROJECTS_COUNT_WEIGHT;

        let described = profile
            .projects
            .iter()
            .filter(|project| !project.desc.trim().is_empty() && project.desc != MISSING_DESCRIPTION)
            .count();
        if described > 0 {
            score += PROJECTS_COMPLETE_WEIGHT * described as f64 / profile.projects.len() as f64;
        } else {
            missing.push(MissingField {
                field: "projects_complete",
                label: "프로젝트 상세 정보",
                weight: PROJECTS_COMPLETE_WEIGHT,
                priority: 1,
            });
        }
    }

    missing.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then_with(|| b.weight.total_cmp(&a.weight))
    });

    ProfileCompleteness {
        percentage: (score / MAX_SCORE * 100.0).round() as u32,
        score,
        max_score: MAX_SCORE,
        missing,
    }
}

fn has_text(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::profile::assemble_profile;

    #[test]
    fn short_prose_scores_job_and_fallback_career() {
        let profile = assemble_profile("hi");
        let result = score_completeness(&profile);

        assert!((result.score - (JOB_WEIGHT + CAREER_WEIGHT)).abs() < 0.001);
        assert!((result.max_score - 82.5).abs() < 0.001);
        assert_eq!(result.percentage, 24);

        let fields: Vec<&str> = result.missing.iter().map(|m| m.field).collect();
        assert_eq!(
            fields,
            vec![
                "projects_complete",
                "intro",
                "projects_count",
                "name",
                "email",
                "skills",
                "phone",
                "github",
            ]
        );
    }

    #[test]
    fn placeholder_descriptions_do_not_count_as_detail() {
        let profile = assemble_profile("1. My App\n2. Realtime Chat\n채팅 서버를 직접 구현했습니다\n");
        assert_eq!(profile.projects.len(), 2);

        let result = score_completeness(&profile);
        assert!(!result.missing.iter().any(|m| m.field == "projects_count"));
        assert!(!result.missing.iter().any(|m| m.field == "projects_complete"));
        let expected = JOB_WEIGHT
            + INTRO_WEIGHT
            + CAREER_WEIGHT
            + PROJECTS_COUNT_WEIGHT
            + PROJECTS_COMPLETE_WEIGHT / 2.0;
        assert!((result.score - expected).abs() < 0.001, "score {}", result.score);
    }

    #[test]
    fn complete_profile_reaches_full_score() {
        let text = "이름: 김민수\n\
            이메일: minsu@example.com\n\
            연락처: 010-1234-5678\n\
            github.com/minsu\n\
            [자기소개]\n\
            React와 TypeScript로 사용자 경험을 다듬는 개발자입니다.\n\
            [경력]\n\
            스타트업에서 3년간 프론트엔드 개발을 담당하며 디자인 시스템을 구축했습니다.\n\
            [프로젝트]\n\
            1. MoodFolio\n\
            포트폴리오 자동 생성 서비스 개발\n";

        let result = score_completeness(&assemble_profile(text));
        assert!(result.missing.is_empty(), "missing {:?}", result.missing);
        assert_eq!(result.percentage, 100);
    }
}
