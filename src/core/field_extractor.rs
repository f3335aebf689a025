use once_cell::sync::Lazy;
use regex::Regex;

use super::models::ExtractedContact;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-zA-Z0-9._-]+@[a-zA-Z0-9._-]+\.[a-zA-Z0-9_-]+)").unwrap());
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{2,3}[-\s]?\d{3,4}[-\s]?\d{4})").unwrap());
static WHITESPACE_CHAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s").unwrap());
static GITHUB_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(https?://)?(github\.com/[a-zA-Z0-9_-]+)").unwrap());
// Label-only on purpose: without "이름:" the name stays unknown.
static NAME_LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"이름[:\s]+([가-힣a-zA-Z0-9]{2,10})").unwrap());

pub fn extract_email(text: &str) -> Option<String> {
    EMAIL_RE
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
}

/// First phone-shaped digit run, whitespace separators rewritten to hyphens.
pub fn extract_phone(text: &str) -> Option<String> {
    let captures = PHONE_RE.captures(text)?;
    let raw = captures.get(1)?.as_str();
    Some(WHITESPACE_CHAR_RE.replace_all(raw, "-").into_owned())
}

pub fn extract_github(text: &str) -> Option<String> {
    let matched = GITHUB_RE.find(text)?.as_str();
    if matched.to_ascii_lowercase().starts_with("http") {
        Some(matched.to_string())
    } else {
        Some(format!("https://{matched}"))
    }
}

pub fn extract_labeled_name(text: &str) -> Option<String> {
    NAME_LABEL_RE
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
}

pub fn extract_contact(text: &str) -> ExtractedContact {
    ExtractedContact {
        name: extract_labeled_name(text),
        email: extract_email(text),
        phone: extract_phone(text),
        github: extract_github(text),
    }
}
