use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::models::JobCategory;

const MUST_HAVE_COUNT: usize = 7;
const NICE_TO_HAVE_END: usize = 12;
const GAP_RANKS: usize = 5;
const HIGH_PRIORITY_RANKS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillDemand {
    pub skill: String,
    #[serde(default)]
    pub count: u32,
    /// Share of postings, formatted like `"84.0%"`.
    #[serde(default)]
    pub rate: String,
    #[serde(default)]
    pub importance: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordDemand {
    pub keyword: String,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub frequency: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobInsights {
    pub top_skills: Vec<SkillDemand>,
    pub top_keywords: Vec<KeywordDemand>,
    pub sample_size: u32,
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MustHaveSkill {
    pub name: String,
    pub adoption: u32,
    pub importance: String,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Rising,
    Stable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NiceToHaveSkill {
    pub name: String,
    pub trend: Trend,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GapPriority {
    High,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillGap {
    pub skill: String,
    pub priority: GapPriority,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketFit {
    pub job_key: String,
    pub sample_size: u32,
    pub last_updated: Option<String>,
    pub must_have: Vec<MustHaveSkill>,
    pub nice_to_have: Vec<NiceToHaveSkill>,
    pub strengths: Vec<String>,
    pub gaps: Vec<SkillGap>,
}

#[derive(Debug, Clone, Default)]
pub struct MarketInsightStore {
    jobs: HashMap<String, JobInsights>,
}

impl MarketInsightStore {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let jobs: HashMap<String, JobInsights> =
            serde_json::from_str(json).context("invalid market insight JSON")?;
        Ok(Self::from_jobs(jobs))
    }

    pub async fn load(path: &Path) -> anyhow::Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read market insights {}", path.display()))?;
        let store = Self::from_json(&content)
            .with_context(|| format!("failed to parse market insights {}", path.display()))?;
        info!(path = %path.display(), jobs = store.jobs.len(), "loaded market insights");
        Ok(store)
    }

    /// Known job keys whose skill table is empty get the built-in table.
    pub fn from_jobs(mut jobs: HashMap<String, JobInsights>) -> Self {
        for (key, insights) in jobs.iter_mut() {
            if !insights.top_skills.is_empty() {
                continue;
            }
            if let Some((skills, keywords)) = default_tables(key) {
                warn!(job = %key, "market insight skills missing, using built-in table");
                insights.top_skills = skills;
                if !keywords.is_empty() {
                    insights.top_keywords = keywords;
                }
            }
        }

        Self { jobs }
    }

    pub fn job(&self, category: JobCategory) -> Option<&JobInsights> {
        self.jobs.get(category.insight_key())
    }

    pub fn market_fit(&self, category: JobCategory, skills: &[String]) -> Option<MarketFit> {
        let job_key = category.insight_key();
        let insights = self.jobs.get(job_key)?;

        let must_have: Vec<MustHaveSkill> = insights
            .top_skills
            .iter()
            .take(MUST_HAVE_COUNT)
            .map(|demand| {
                let base = format!(
                    "{}개 채용공고 중 {}개에서 언급 ({})",
                    insights.sample_size, demand.count, demand.rate
                );
                let reason = match skill_context(&demand.skill, job_key) {
                    Some(context) => format!("{context} - {base}"),
                    None => base,
                };

                MustHaveSkill {
                    name: demand.skill.clone(),
                    adoption: leading_integer(&demand.rate),
                    importance: demand.importance.clone(),
                    reason,
                }
            })
            .collect();

        let nice_to_have = insights
            .top_skills
            .iter()
            .take(NICE_TO_HAVE_END)
            .skip(MUST_HAVE_COUNT)
            .map(|demand| NiceToHaveSkill {
                name: demand.skill.clone(),
                trend: if leading_integer(&demand.rate) > 5 {
                    Trend::Rising
                } else {
                    Trend::Stable
                },
                reason: format!("{}의 채용공고에서 언급", demand.rate),
            })
            .collect();

        let owned: HashSet<String> = skills.iter().map(|skill| skill.to_lowercase()).collect();
        let mut strengths = Vec::new();
        let mut gaps = Vec::new();
        for (idx, skill) in must_have.iter().enumerate() {
            let rank = idx + 1;
            if owned.contains(&skill.name.to_lowercase()) {
                strengths.push(format!(
                    "{} 보유 (필수 기술 {}위, 상위 {}%)",
                    skill.name,
                    rank,
                    100_i64 - i64::from(skill.adoption)
                ));
            } else if idx < GAP_RANKS {
                gaps.push(SkillGap {
                    skill: skill.name.clone(),
                    priority: if idx < HIGH_PRIORITY_RANKS {
                        GapPriority::High
                    } else {
                        GapPriority::Medium
                    },
                    reason: format!(
                        "{}%의 채용공고에서 요구 (필수 기술 {}위)",
                        skill.adoption, rank
                    ),
                });
            }
        }

        Some(MarketFit {
            job_key: job_key.to_string(),
            sample_size: insights.sample_size,
            last_updated: insights.last_updated.clone(),
            must_have,
            nice_to_have,
            strengths,
            gaps,
        })
    }
}

fn leading_integer(rate: &str) -> u32 {
    let digits: String = rate
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

fn skill_context(skill: &str, job_key: &str) -> Option<&'static str> {
    let context = match (skill, job_key) {
        ("Figma", "designer") => "UI/UX 디자인 작업",
        ("Figma", "service") => "와이어프레임 및 프로토타입 작성",
        ("Figma", _) => "디자인 및 기획 도구",
        ("SQL", "developer") => "데이터베이스 설계 및 쿼리 최적화",
        ("SQL", "marketer") => "마케팅 데이터 분석",
        ("SQL", "service") => "서비스 지표 분석",
        ("SQL", _) => "데이터 분석",
        ("Photoshop", "designer") => "이미지 편집 및 그래픽 디자인",
        ("Photoshop", "marketer") => "마케팅 소재 제작",
        ("Photoshop", _) => "이미지 편집",
        _ => return None,
    };
    Some(context)
}

fn skill(name: &str, count: u32, rate: &str, importance: &str) -> SkillDemand {
    SkillDemand {
        skill: name.to_string(),
        count,
        rate: rate.to_string(),
        importance: importance.to_string(),
    }
}

fn keyword(name: &str, count: u32, frequency: &str) -> KeywordDemand {
    KeywordDemand {
        keyword: name.to_string(),
        count,
        frequency: frequency.to_string(),
    }
}

fn default_tables(job_key: &str) -> Option<(Vec<SkillDemand>, Vec<KeywordDemand>)> {
    let tables = match job_key {
        "developer" => (
            vec![
                skill("React", 45, "90.0%", "critical"),
                skill("TypeScript", 40, "80.0%", "high"),
                skill("Next.js", 35, "70.0%", "high"),
                skill("Node.js", 30, "60.0%", "medium"),
                skill("Python", 25, "50.0%", "medium"),
            ],
            vec![keyword("문제 해결", 48, "96.0%"), keyword("최적화", 40, "80.0%")],
        ),
        "designer" => (
            vec![
                skill("Figma", 42, "84.0%", "critical"),
                skill("Photoshop", 35, "70.0%", "high"),
                skill("Illustrator", 30, "60.0%", "high"),
                skill("ProtoPie", 15, "30.0%", "medium"),
                skill("After Effects", 12, "24.0%", "medium"),
                skill("Zeplin", 10, "20.0%", "medium"),
            ],
            vec![
                keyword("사용자 경험", 45, "90.0%"),
                keyword("커뮤니케이션", 38, "76.0%"),
                keyword("협업", 35, "70.0%"),
                keyword("디자인 시스템", 25, "50.0%"),
            ],
        ),
        "marketer" => (
            vec![
                skill("Google Analytics (GA4)", 45, "90.0%", "critical"),
                skill("Excel", 40, "80.0%", "high"),
                skill("Meta Ads", 35, "70.0%", "high"),
                skill("SQL", 25, "50.0%", "medium"),
            ],
            Vec::new(),
        ),
        "service" => (
            vec![
                skill("서비스 기획", 42, "84.0%", "critical"),
                skill("데이터 분석", 35, "70.0%", "high"),
                skill("Figma", 30, "60.0%", "high"),
                skill("SQL", 25, "50.0%", "medium"),
                skill("Jira", 20, "40.0%", "medium"),
            ],
            vec![
                keyword("커뮤니케이션", 50, "100%"),
                keyword("논리적 사고", 45, "90%"),
            ],
        ),
        _ => return None,
    };
    Some(tables)
}

#[cfg(test)]
mod tests {
    use super::*;

    const INSIGHTS_JSON: &str = r#"{
        "developer": {
            "topSkills": [
                {"skill": "React", "count": 90, "rate": "75.0%", "importance": "critical"},
                {"skill": "TypeScript", "count": 80, "rate": "66.7%", "importance": "critical"},
                {"skill": "SQL", "count": 60, "rate": "50.0%", "importance": "high"},
                {"skill": "Docker", "count": 40, "rate": "33.3%", "importance": "high"},
                {"skill": "AWS", "count": 30, "rate": "25.0%", "importance": "medium"},
                {"skill": "Redis", "count": 20, "rate": "16.7%", "importance": "medium"},
                {"skill": "Kotlin", "count": 10, "rate": "8.3%", "importance": "low"},
                {"skill": "GraphQL", "count": 9, "rate": "7.5%", "importance": "low"},
                {"skill": "Rust", "count": 5, "rate": "4.2%", "importance": "low"}
            ],
            "topKeywords": [{"keyword": "협업", "count": 70, "frequency": "58.3%"}],
            "sampleSize": 120,
            "lastUpdated": "2025-01-15T00:00:00Z"
        },
        "designer": {"topSkills": [], "sampleSize": 50}
    }"#;

    fn store() -> MarketInsightStore {
        MarketInsightStore::from_json(INSIGHTS_JSON).unwrap()
    }

    #[test]
    fn must_have_reasons_include_sample_and_context() {
        let fit = store()
            .market_fit(JobCategory::Engineering, &[])
            .unwrap();

        assert_eq!(fit.job_key, "developer");
        assert_eq!(fit.must_have.len(), 7);
        assert_eq!(fit.must_have[0].adoption, 75);
        assert_eq!(fit.must_have[0].reason, "120개 채용공고 중 90개에서 언급 (75.0%)");
        assert_eq!(
            fit.must_have[2].reason,
            "데이터베이스 설계 및 쿼리 최적화 - 120개 채용공고 중 60개에서 언급 (50.0%)"
        );
        assert_eq!(fit.last_updated.as_deref(), Some("2025-01-15T00:00:00Z"));
    }

    #[test]
    fn nice_to_have_covers_ranks_eight_onward() {
        let fit = store().market_fit(JobCategory::Engineering, &[]).unwrap();
        let names: Vec<&str> = fit.nice_to_have.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["GraphQL", "Rust"]);
        assert_eq!(fit.nice_to_have[0].trend, Trend::Rising);
        assert_eq!(fit.nice_to_have[1].trend, Trend::Stable);
        assert_eq!(fit.nice_to_have[1].reason, "4.2%의 채용공고에서 언급");
    }

    #[test]
    fn strengths_and_gaps_follow_ownership() {
        let skills = vec!["react".to_string(), "AWS".to_string()];
        let fit = store().market_fit(JobCategory::Engineering, &skills).unwrap();

        assert_eq!(
            fit.strengths,
            vec![
                "React 보유 (필수 기술 1위, 상위 25%)".to_string(),
                "AWS 보유 (필수 기술 5위, 상위 75%)".to_string(),
            ]
        );

        let gaps: Vec<(&str, GapPriority)> = fit
            .gaps
            .iter()
            .map(|gap| (gap.skill.as_str(), gap.priority))
            .collect();
        assert_eq!(
            gaps,
            vec![
                ("TypeScript", GapPriority::High),
                ("SQL", GapPriority::High),
                ("Docker", GapPriority::Medium),
            ]
        );
        assert_eq!(fit.gaps[0].reason, "66%의 채용공고에서 요구 (필수 기술 2위)");
    }

    #[test]
    fn empty_skill_tables_get_built_in_defaults() {
        let fit = store()
            .market_fit(JobCategory::Design, &["Figma".to_string()])
            .unwrap();

        assert_eq!(fit.sample_size, 50);
        assert_eq!(fit.must_have[0].name, "Figma");
        assert!(fit.must_have[0].reason.starts_with("UI/UX 디자인 작업 - "));
        assert_eq!(fit.strengths.len(), 1);
        assert_eq!(store().job(JobCategory::Design).unwrap().top_keywords.len(), 4);
    }

    #[test]
    fn unknown_job_has_no_fit() {
        assert!(store().market_fit(JobCategory::Marketing, &[]).is_none());
    }

    #[test]
    fn leading_integer_ignores_fraction_and_garbage() {
        assert_eq!(leading_integer("84.0%"), 84);
        assert_eq!(leading_integer("100%"), 100);
        assert_eq!(leading_integer("n/a"), 0);
    }

    #[tokio::test]
    async fn load_reads_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("market-insights.json");
        tokio::fs::write(&path, INSIGHTS_JSON).await.unwrap();

        let store = MarketInsightStore::load(&path).await.unwrap();
        assert!(store.job(JobCategory::Engineering).is_some());

        let missing = MarketInsightStore::load(&dir.path().join("absent.json")).await;
        assert!(missing.is_err());
    }
}
