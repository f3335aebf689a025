use once_cell::sync::Lazy;
use regex::Regex;

use super::text::char_len;

static NEXT_SECTION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:^|\n)\s*[●\[■]").unwrap());
static LEADING_PUNCT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*[:\-]\s*").unwrap());

#[derive(Debug, Clone)]
pub struct SectionLocator {
    header_re: Regex,
}

impl SectionLocator {
    pub fn new(aliases: &[&str]) -> Result<Self, regex::Error> {
        // Longest alias first so "자기소개서" wins over its prefix "자기소개".
        let mut sorted: Vec<&str> = aliases
            .iter()
            .copied()
            .filter(|alias| !alias.trim().is_empty())
            .collect();
        sorted.sort_by_key(|alias| std::cmp::Reverse(char_len(alias)));

        let alternation = sorted
            .iter()
            .map(|alias| regex::escape(alias))
            .collect::<Vec<_>>()
            .join("|");

        let header_re = Regex::new(&format!(
            r"(?i)(?:^|\n)(?:\s*[●■*\[\-]*\s*)?(?:{alternation})(?:\s*[\]):]*)"
        ))?;

        Ok(Self { header_re })
    }

    pub fn locate(&self, text: &str) -> Option<String> {
        let header = self.header_re.find(text)?;
        let rest = &text[header.end()..];

        let content = match NEXT_SECTION_RE.find(rest) {
            Some(next) => &rest[..next.start()],
            None => rest,
        };

        Some(LEADING_PUNCT_RE.replace(content, "").trim().to_string())
    }
}

pub fn locate_section(text: &str, aliases: &[&str]) -> Option<String> {
    SectionLocator::new(aliases).ok()?.locate(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_body_up_to_next_decorated_header() {
        let text = "이름: 김민수\n\n[자기소개]\n사용자 경험을 중시하는 개발자입니다.\n\n[경력]\n2020.01 - 2022.12";
        assert_eq!(
            locate_section(text, &["자기소개"]),
            Some("사용자 경험을 중시하는 개발자입니다.".to_string())
        );
    }

    #[test]
    fn prefers_longest_alias_at_same_position() {
        let text = "자기소개서\n저는 백엔드 개발자입니다.\n■ 경력\n회사 A\n자기소개 영상 링크 첨부";
        assert_eq!(
            locate_section(text, &["자기소개", "자기소개서"]),
            Some("저는 백엔드 개발자입니다.".to_string())
        );
    }

    #[test]
    fn strips_leading_colon_and_runs_to_end_without_next_header() {
        let text = "Intro: curious engineer who ships\nloves tooling";
        assert_eq!(
            locate_section(text, &["Intro"]),
            Some("curious engineer who ships\nloves tooling".to_string())
        );
    }

    #[test]
    fn matches_headers_case_insensitively_with_bullets() {
        let text = "● ABOUT ME\nDesigner focused on motion.\n● Skills\nFigma";
        assert_eq!(
            locate_section(text, &["About Me"]),
            Some("Designer focused on motion.".to_string())
        );
    }

    #[test]
    fn missing_header_yields_none() {
        assert_eq!(locate_section("just some text", &["경력", "Career"]), None);
    }

    #[test]
    fn aliases_with_metacharacters_are_literal() {
        let locator = SectionLocator::new(&["Projects (selected)"]).unwrap();
        assert_eq!(
            locator.locate("Projects (selected)\nA compiler"),
            Some("A compiler".to_string())
        );
    }
}
