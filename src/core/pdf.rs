use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use super::ocr::TesseractCliOcrService;
use super::text::char_len;

static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"https?://[^\s<>'"\)]+"#).unwrap());

const MIN_TEXT_LAYER_CHARS: usize = 50;

pub struct PdfTextExtractor {
    ocr_service: TesseractCliOcrService,
}

impl PdfTextExtractor {
    pub fn new(ocr_service: TesseractCliOcrService) -> Self {
        Self { ocr_service }
    }

    /// The flag reports whether OCR ran.
    pub async fn extract_text_with_ocr_fallback(
        &self,
        data: &[u8],
    ) -> anyhow::Result<(String, bool)> {
        let text = match self.extract_pdf_text(data) {
            Ok(mut text) => {
                let links = extract_hyperlinks(data);
                if !links.is_empty() {
                    text.push('\n');
                    text.push_str(&links.join("\n"));
                }

                if char_len(text.trim()) >= MIN_TEXT_LAYER_CHARS {
                    return Ok((text, false));
                }
                debug!(chars = char_len(text.trim()), "pdf text layer too thin, running ocr");
                text
            }
            Err(err) => {
                warn!(error = %err, "pdf text extraction failed, running ocr");
                String::new()
            }
        };

        let ocr_text = self.ocr_service.extract_text(data).await?;
        if ocr_text.trim().is_empty() {
            // Keep whatever the text layer had rather than nothing.
            return Ok((text, true));
        }

        Ok((ocr_text, true))
    }

    fn extract_pdf_text(&self, data: &[u8]) -> anyhow::Result<String> {
        let text = pdf_extract::extract_text_from_mem(data)?;
        Ok(text)
    }
}

pub fn extract_hyperlinks(data: &[u8]) -> Vec<String> {
    let raw = String::from_utf8_lossy(data);
    let mut links: Vec<String> = Vec::new();
    for m in URL_RE.find_iter(&raw) {
        let value = m.as_str().to_string();
        if !links
            .iter()
            .any(|existing: &String| existing.eq_ignore_ascii_case(&value))
        {
            links.push(value);
        }
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hyperlinks_are_deduplicated_case_insensitively() {
        let raw = b"<< /URI (https://github.com/minsu) >> /URI (https://GitHub.com/Minsu) \
            /URI (http://moodfolio.example/p/1)";
        assert_eq!(
            extract_hyperlinks(raw),
            vec![
                "https://github.com/minsu".to_string(),
                "http://moodfolio.example/p/1".to_string(),
            ]
        );
    }

    #[test]
    fn bytes_without_links_yield_nothing() {
        assert!(extract_hyperlinks(b"%PDF-1.4 no links").is_empty());
    }
}
