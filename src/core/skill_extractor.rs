use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

pub const ENGINEERING_SKILLS: &[&str] = &[
    "React", "Vue", "Angular", "JavaScript", "TypeScript", "Node.js", "Python", "Java",
    "Next.js", "Tailwind", "CSS", "Recoil", "Query", "HTML", "C++", "C#", "Swift", "Kotlin",
    "Flutter", "Django", "Spring", "Express", "MongoDB", "MySQL", "PostgreSQL", "Redis",
    "Docker", "Kubernetes", "AWS", "GCP", "Azure",
];

pub const DESIGN_SKILLS: &[&str] = &[
    "Figma", "Sketch", "Adobe XD", "Photoshop", "Illustrator", "InDesign", "After Effects",
    "Premiere", "Zeplin", "Framer", "Principle", "ProtoPie",
];

pub const MARKETING_SKILLS: &[&str] = &[
    "GA", "Google Analytics", "SEO", "SEM", "Facebook Ads", "Google Ads", "Instagram",
    "Marketing", "Branding", "Content", "Social Media",
];

pub const BUSINESS_SKILLS: &[&str] = &[
    "Jira", "Notion", "Confluence", "Slack", "Trello", "Asana", "Excel", "PowerPoint", "SQL",
    "Tableau", "Data Analysis",
];

/// Every domain list concatenated; scan order decides output order.
pub fn default_vocabulary() -> Vec<&'static str> {
    [ENGINEERING_SKILLS, DESIGN_SKILLS, MARKETING_SKILLS, BUSINESS_SKILLS].concat()
}

pub static DEFAULT_SKILL_MATCHER: Lazy<SkillMatcher> =
    Lazy::new(|| SkillMatcher::new(&default_vocabulary()).unwrap());

#[derive(Debug, Clone)]
struct SkillPattern {
    name: String,
    regex: Regex,
    // Boundaries are only enforced on sides that end in a word character,
    // otherwise "C++" could never be followed by a space.
    bounded_start: bool,
    bounded_end: bool,
}

#[derive(Debug, Clone)]
pub struct SkillMatcher {
    patterns: Vec<SkillPattern>,
}

impl SkillMatcher {
    pub fn new(vocabulary: &[&str]) -> Result<Self, regex::Error> {
        let mut seen = HashSet::new();
        let mut patterns = Vec::with_capacity(vocabulary.len());

        for entry in vocabulary {
            let name = entry.trim();
            if name.is_empty() || !seen.insert(name.to_lowercase()) {
                continue;
            }

            let regex = Regex::new(&format!("(?i){}", regex::escape(name)))?;
            patterns.push(SkillPattern {
                name: name.to_string(),
                regex,
                bounded_start: name.chars().next().is_some_and(is_ascii_word),
                bounded_end: name.chars().next_back().is_some_and(is_ascii_word),
            });
        }

        Ok(Self { patterns })
    }

    pub fn extract(&self, text: &str) -> Vec<String> {
        self.patterns
            .iter()
            .filter(|pattern| pattern.occurs_in(text))
            .map(|pattern| pattern.name.clone())
            .collect()
    }
}

impl SkillPattern {
    fn occurs_in(&self, text: &str) -> bool {
        self.regex.find_iter(text).any(|m| {
            let before_ok = !self.bounded_start
                || !text[..m.start()].chars().next_back().is_some_and(is_ascii_word);
            let after_ok =
                !self.bounded_end || !text[m.end()..].chars().next().is_some_and(is_ascii_word);
            before_ok && after_ok
        })
    }
}

fn is_ascii_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

pub fn extract_skills(text: &str) -> Vec<String> {
    DEFAULT_SKILL_MATCHER.extract(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_variants_collapse_to_one_entry() {
        let skills = extract_skills("react, React and REACT everywhere");
        assert_eq!(skills.iter().filter(|s| s.as_str() == "React").count(), 1);
    }

    #[test]
    fn metacharacters_are_matched_literally() {
        let skills = extract_skills("Languages: C++, C# and Python");
        assert!(skills.contains(&"C++".to_string()));
        assert!(skills.contains(&"C#".to_string()));
        assert!(skills.contains(&"Python".to_string()));
        assert!(!skills.contains(&"Java".to_string()));
    }

    #[test]
    fn dotted_names_do_not_match_arbitrary_characters() {
        let skills = extract_skills("Built APIs with NodeXjs");
        assert!(!skills.contains(&"Node.js".to_string()));
        assert!(extract_skills("Built APIs with Node.js").contains(&"Node.js".to_string()));
    }

    #[test]
    fn requires_whole_word_matches() {
        let skills = extract_skills("JavaScript developer, fluent in languages");
        assert!(skills.contains(&"JavaScript".to_string()));
        assert!(!skills.contains(&"Java".to_string()));
        assert!(!skills.contains(&"GA".to_string()));
    }

    #[test]
    fn hangul_neighbours_count_as_boundaries() {
        let skills = extract_skills("React와 Figma를 사용했습니다");
        assert_eq!(skills, vec!["React".to_string(), "Figma".to_string()]);
    }

    #[test]
    fn output_follows_vocabulary_order() {
        let skills = extract_skills("Figma, Docker, React");
        assert_eq!(
            skills,
            vec!["React".to_string(), "Docker".to_string(), "Figma".to_string()]
        );
    }

    #[test]
    fn custom_vocabulary_is_deduplicated_case_insensitively() {
        let matcher = SkillMatcher::new(&["Rust", "rust", "Go"]).unwrap();
        assert_eq!(matcher.extract("Rust and Go"), vec!["Rust".to_string(), "Go".to_string()]);
    }

    #[test]
    fn no_matches_yields_empty_list() {
        assert!(extract_skills("이력서 본문에 기술 언급이 없습니다").is_empty());
    }
}
