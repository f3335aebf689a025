use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::models::{ProjectEntry, ProjectSource};
use super::text::{char_len, collapse_whitespace, truncate_chars};

pub const MAX_PROJECTS: usize = 6;
pub const MISSING_DESCRIPTION: &str = "프로젝트에 대한 설명이 이력서에 상세히 명시되지 않았습니다.";
pub const WORK_EXPERIENCE_PLACEHOLDER: &str = "업무 경험";
pub const LABELED_PROJECT_PLACEHOLDER: &str = "프로젝트를 성공적으로 완수했습니다.";
pub const SECTION_LINE_PLACEHOLDER: &str = "프로젝트 경험";

const MAX_DESCRIPTION_CHARS: usize = 300;
const MIN_DESCRIPTION_CHARS: usize = 5;
const WORK_DESCRIPTION_CHARS: usize = 200;
const MAX_TITLE_CHARS: usize = 80;
const WORK_SECTION_WINDOW: usize = 2000;
const BULLET_DESCRIPTION_CHARS: usize = 100;
const SECTION_WINDOW_MIN: usize = 50;
const SECTION_WINDOW_MAX: usize = 1000;
const SECTION_TITLE_CHARS: usize = 50;

const NON_PROJECT_HEADERS: &[&str] = &[
    "Education", "Skill", "Experience", "Contact", "Profile", "Intro", "About", "학력", "기술",
    "자격증", "어학", "수상", "경력", "활동", "소개", "자기소개", "자기소개서", "지원동기",
    "성장과정", "성격", "장단점", "포부", "Self Introduction", "Motivation", "Personality",
    "Aspiration", "Growth",
];

static PROJECT_SECTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:\[|■|●|^)\s*(?:주요)?\s*(?:프로젝트|Projects?|경험|[A-Za-z\s]+Experience)\s*(?:\]|:|\n)",
    )
    .unwrap()
});
static NUMBERED_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\n)\s*\d+[.)\s]\s*([^\n]+)").unwrap());
static TITLE_DURATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\(([^)]*(?:\d{4}[./-]\d{1,2}[^)]*|\d+\s*개월|\d+\s*months?)[^)]*)\)").unwrap()
});
static QUOTED_DESCRIPTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^(.+?)\s*["“]([^"”]+)["”]\s*$"#).unwrap());
static TRAILING_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\(?\d{4}[./-].*$").unwrap());
static LEADING_YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}").unwrap());
static DATE_ONLY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\d.\-\s~]+$").unwrap());
static DESCRIPTION_DURATION_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(
            r"(?i)(?:기간|period|duration)\s*[:：]?\s*([\d./-]+\s*[-~]\s*[\d./-]+|\d+\s*개월|\d+\s*months?)",
        )
        .unwrap(),
        Regex::new(r"(\d{4}[./-]\d{1,2}\s*[-~]\s*\d{4}[./-]\d{1,2})").unwrap(),
        Regex::new(r"(?i)(\d{4}[./-]\d{1,2}\s*[-~]\s*(?:현재|present|진행중))").unwrap(),
        Regex::new(r"(\d+\s*개월)").unwrap(),
        Regex::new(r"(?i)(\d+\s*months?)").unwrap(),
    ]
});
static MONTH_COUNT_PAREN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*\(\s*\d+\s*(?:개월|months?)\s*\)").unwrap());
static LINE_BULLET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^(?:■|-|●|\*)\s*").unwrap());
static FIELD_LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:내용|상세\s?활동|기간|비고|역할):").unwrap());

static WORK_SECTION_START_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Work Experience|경력|Career").unwrap());
static WORK_SECTION_END_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Education|학력|Skill|기술|Core Competencies").unwrap());
static WORK_ENTRY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{4}\.\d{2}\s*-\s*(?:Present|\d{4}\.\d{2}))(?s:.){0,100}?\n([^\n]+)\n([^\n]+)")
        .unwrap()
});
static PAREN_NOISE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\([^)]+\)").unwrap());
static PAREN_NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\(\d+").unwrap());
static WORK_BULLET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[•●\-]\s*([^\n]+)").unwrap());
static WORK_BULLET_PREFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[•●\-]\s*").unwrap());

static BULLETED_ENTRY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[-•]\s*([A-Za-z가-힣0-9\s]+)\s*\(([^)]+)\):\s*([^\n]+)").unwrap()
});
static LABELED_PROJECT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"프로젝트[:\s]*([^\n]{10,50})").unwrap());
static SECTION_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\[?\s*(?:주요)?\s*(?:프로젝트|Projects?|경험|Experience)\s*\]?\s*[:\n]").unwrap()
});
static SECTION_LINE_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-•*\d.()\s]+").unwrap());

pub type Strategy = fn(&str) -> Vec<ProjectEntry>;

/// Tried in order once numbered lists and work history produced nothing.
pub const FALLBACK_STRATEGIES: &[(&str, Strategy)] = &[
    ("bulleted", bulleted_entries as Strategy),
    ("labeled", labeled_entries as Strategy),
    ("section_lines", section_line_entries as Strategy),
];

pub fn parse_projects(text: &str) -> Vec<ProjectEntry> {
    let section = narrow_to_project_section(text);
    let mut entries = numbered_list_entries(section);
    debug!(count = entries.len(), "numbered project entries");

    if entries.len() < MAX_PROJECTS {
        let work = work_experience_entries(text, MAX_PROJECTS - entries.len());
        debug!(count = work.len(), "work experience entries");
        entries.extend(work);
    }

    if entries.is_empty() {
        for (name, strategy) in FALLBACK_STRATEGIES {
            entries = strategy(text);
            if !entries.is_empty() {
                debug!(strategy = *name, count = entries.len(), "fallback project entries");
                break;
            }
        }
    }

    entries
}

pub fn narrow_to_project_section(text: &str) -> &str {
    match PROJECT_SECTION_RE.find(text) {
        Some(header) => &text[header.start()..],
        None => text,
    }
}

struct TitleParts {
    title: String,
    inline_description: String,
    duration: Option<String>,
}

pub fn numbered_list_entries(text: &str) -> Vec<ProjectEntry> {
    let lines: Vec<(usize, usize, &str)> = NUMBERED_LINE_RE
        .captures_iter(text)
        .filter_map(|captures| {
            let whole = captures.get(0)?;
            let rest = captures.get(1)?;
            Some((whole.start(), whole.end(), rest.as_str()))
        })
        .collect();

    let mut entries = Vec::new();
    for (idx, (_, end, raw_title)) in lines.iter().enumerate() {
        let parts = split_title_line(raw_title);
        if !is_project_title(&parts.title) {
            continue;
        }

        let body_end = lines.get(idx + 1).map(|(start, _, _)| *start).unwrap_or(text.len());
        let body = text[*end..body_end].trim();
        let (description, duration) = clean_description(body, parts.duration);

        let description = if parts.inline_description.is_empty() {
            description
        } else if description.is_empty() {
            parts.inline_description
        } else {
            format!("{} {}", parts.inline_description, description)
        };

        let description = if char_len(&description) < MIN_DESCRIPTION_CHARS {
            MISSING_DESCRIPTION.to_string()
        } else {
            truncate_chars(&description, MAX_DESCRIPTION_CHARS)
        };

        entries.push(
            ProjectEntry::new(
                truncate_chars(&parts.title, MAX_TITLE_CHARS),
                description,
                ProjectSource::NumberedList,
            )
                .with_duration(duration),
        );
    }

    entries
}

fn split_title_line(raw: &str) -> TitleParts {
    let mut title = raw.trim().to_string();
    let mut inline_description = String::new();
    let mut duration = None;

    let embedded = TITLE_DURATION_RE.captures(&title).and_then(|captures| {
        Some((
            captures.get(0)?.as_str().to_string(),
            captures.get(1)?.as_str().trim().to_string(),
        ))
    });
    if let Some((whole, period)) = embedded {
        duration = Some(period);
        title = title.replacen(&whole, "", 1).trim().to_string();
    }

    let quoted = QUOTED_DESCRIPTION_RE.captures(&title).and_then(|captures| {
        Some((
            captures.get(1)?.as_str().trim().to_string(),
            captures.get(2)?.as_str().trim().to_string(),
        ))
    });
    if let Some((head, quote)) = quoted {
        title = head;
        inline_description = quote;
    } else if (title.contains(" - ") || title.contains(": ")) && char_len(&title) > 20 {
        // Shorter-head-or-long-tail heuristic; titles that legitimately contain a
        // separator can be split too.
        for separator in [" - ", ": "] {
            if !title.contains(separator) {
                continue;
            }

            let parts: Vec<&str> = title.split(separator).collect();
            if char_len(parts[0]) < char_len(parts[1]) || char_len(parts[1]) > 10 {
                let head = parts[0].trim().to_string();
                inline_description = parts[1..].join(separator).trim().to_string();
                title = head;
                break;
            }
        }
    }

    let without_date = TRAILING_DATE_RE.replace(&title, "").trim().to_string();

    TitleParts {
        title: without_date,
        inline_description,
        duration,
    }
}

fn is_project_title(title: &str) -> bool {
    if char_len(title) <= 2 || LEADING_YEAR_RE.is_match(title) || DATE_ONLY_RE.is_match(title) {
        return false;
    }

    !is_section_header(title)
}

fn is_section_header(title: &str) -> bool {
    let lower = title.to_lowercase();
    NON_PROJECT_HEADERS.iter().any(|header| {
        let header = header.to_lowercase();
        lower == header
            || lower.starts_with(&header)
            || lower.ends_with(&header)
            || (char_len(&header) > 2 && lower.contains(&header))
    })
}

fn clean_description(body: &str, title_duration: Option<String>) -> (String, Option<String>) {
    let mut description = body.to_string();
    let mut duration = title_duration;

    if duration.is_none() {
        for pattern in DESCRIPTION_DURATION_RES.iter() {
            let found = pattern.captures(&description).and_then(|captures| {
                Some((
                    captures.get(0)?.as_str().to_string(),
                    captures.get(1)?.as_str().trim().to_string(),
                ))
            });
            if let Some((whole, period)) = found {
                duration = Some(period);
                description = description.replacen(&whole, "", 1).trim().to_string();
                break;
            }
        }
    }

    let description = MONTH_COUNT_PAREN_RE.replace_all(&description, "");
    let description = LINE_BULLET_RE.replace_all(&description, "");
    let description = FIELD_LABEL_RE.replace_all(&description, "");

    (collapse_whitespace(&description), duration)
}

pub fn work_experience_entries(text: &str, limit: usize) -> Vec<ProjectEntry> {
    if limit == 0 {
        return Vec::new();
    }

    let Some(section) = locate_work_section(text) else {
        return Vec::new();
    };

    let blocks: Vec<_> = WORK_ENTRY_RE.captures_iter(section).collect();
    debug!(count = blocks.len(), "work experience blocks");

    let mut entries = Vec::new();
    for (idx, captures) in blocks.iter().enumerate() {
        if entries.len() >= limit {
            break;
        }

        let (Some(whole), Some(period), Some(company), Some(position)) =
            (captures.get(0), captures.get(1), captures.get(2), captures.get(3))
        else {
            continue;
        };

        let company = PAREN_NOISE_RE.replace(company.as_str(), "").trim().to_string();
        let position = position.as_str().trim().to_string();
        if PAREN_NUMBER_RE.is_match(&company) || PAREN_NUMBER_RE.is_match(&position) {
            continue;
        }

        let title = format!("{company} - {position}");
        if char_len(&title) <= 5 {
            continue;
        }

        let body_end = blocks
            .get(idx + 1)
            .and_then(|next| next.get(0))
            .map(|m| m.start())
            .unwrap_or(section.len());
        let body = section[whole.end()..body_end].trim();

        let bullets: Vec<String> = WORK_BULLET_RE
            .find_iter(body)
            .map(|m| WORK_BULLET_PREFIX_RE.replace(m.as_str(), "").trim().to_string())
            .collect();
        let description = if bullets.is_empty() {
            truncate_chars(body, WORK_DESCRIPTION_CHARS)
        } else {
            truncate_chars(&bullets.join(" | "), WORK_DESCRIPTION_CHARS)
        };
        let description = if description.is_empty() {
            WORK_EXPERIENCE_PLACEHOLDER.to_string()
        } else {
            description
        };

        entries.push(
            ProjectEntry::new(
                truncate_chars(&title, MAX_TITLE_CHARS),
                description,
                ProjectSource::WorkExperience,
            )
            .with_duration(Some(period.as_str().trim().to_string())),
        );
    }

    entries
}

/// Body after the first work header whose end marker (or end of text) lies
/// within the next 2000 characters.
fn locate_work_section(text: &str) -> Option<&str> {
    for start in WORK_SECTION_START_RE.find_iter(text) {
        let rest = &text[start.end()..];
        let window_end = rest
            .char_indices()
            .nth(WORK_SECTION_WINDOW)
            .map(|(byte_idx, _)| byte_idx);

        match (WORK_SECTION_END_RE.find(rest), window_end) {
            (Some(end), Some(limit)) if end.start() <= limit => return Some(&rest[..end.start()]),
            (Some(end), None) => return Some(&rest[..end.start()]),
            (None, None) => return Some(rest),
            _ => continue,
        }
    }

    None
}

/// `- Title (Info): Description` lines anywhere in the text.
pub fn bulleted_entries(text: &str) -> Vec<ProjectEntry> {
    BULLETED_ENTRY_RE
        .captures_iter(text)
        .filter_map(|captures| {
            let title = captures.get(1)?.as_str().trim();
            if title.is_empty() {
                return None;
            }

            let info = captures.get(2)?.as_str();
            let detail = captures.get(3)?.as_str();
            let description = truncate_chars(&format!("{info} - {detail}"), BULLET_DESCRIPTION_CHARS);
            Some(ProjectEntry::new(
                truncate_chars(title, MAX_TITLE_CHARS),
                description,
                ProjectSource::BulletedEntry,
            ))
        })
        .collect()
}

pub fn labeled_entries(text: &str) -> Vec<ProjectEntry> {
    LABELED_PROJECT_RE
        .captures_iter(text)
        .filter_map(|captures| {
            let title = captures.get(1)?.as_str().trim();
            Some(ProjectEntry::new(
                title,
                LABELED_PROJECT_PLACEHOLDER,
                ProjectSource::LabeledLine,
            ))
        })
        .collect()
}

pub fn section_line_entries(text: &str) -> Vec<ProjectEntry> {
    let Some(section) = locate_project_section_body(text) else {
        return Vec::new();
    };

    section
        .split('\n')
        .filter(|line| char_len(line.trim()) > 10)
        .filter_map(|line| {
            let cleaned = SECTION_LINE_PREFIX_RE.replace(line.trim(), "").to_string();
            if char_len(&cleaned) <= 5 {
                return None;
            }

            Some(ProjectEntry::new(
                truncate_chars(&cleaned, SECTION_TITLE_CHARS),
                SECTION_LINE_PLACEHOLDER,
                ProjectSource::SectionText,
            ))
        })
        .collect()
}

fn locate_project_section_body(text: &str) -> Option<&str> {
    SECTION_HEADER_RE.find_iter(text).find_map(|header| {
        let rest = &text[header.end()..];
        if char_len(rest) < SECTION_WINDOW_MIN {
            return None;
        }

        let end = rest
            .char_indices()
            .nth(SECTION_WINDOW_MAX)
            .map(|(byte_idx, _)| byte_idx)
            .unwrap_or(rest.len());
        Some(&rest[..end])
    })
}
