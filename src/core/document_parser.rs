use std::io::{Cursor, Read};

use base64::Engine;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{debug, warn};

use super::models::DocumentText;
use super::pdf::PdfTextExtractor;

pub struct DocumentTextExtractor {
    pdf_text_extractor: PdfTextExtractor,
}

impl DocumentTextExtractor {
    pub fn new(pdf_text_extractor: PdfTextExtractor) -> Self {
        Self { pdf_text_extractor }
    }

    /// Never fails; problems end up in [`DocumentText::errors`].
    pub async fn extract(&self, file_name: &str, data: &[u8]) -> DocumentText {
        let mut document = DocumentText::default();

        match file_extension(file_name).as_str() {
            "pdf" => match self
                .pdf_text_extractor
                .extract_text_with_ocr_fallback(data)
                .await
            {
                Ok((text, used_ocr)) => {
                    document.ocr_used = used_ocr;
                    document.text = text;
                }
                Err(err) => document.errors.push(format!("Parse error: {err}")),
            },
            "docx" => {
                match extract_docx_text(data) {
                    Ok(text) => document.text = text,
                    Err(err) => document.errors.push(format!("Parse error: {err}")),
                }
                match extract_docx_images(data) {
                    Ok(images) => document.images = images,
                    Err(err) => warn!(file = file_name, error = %err, "docx images skipped"),
                }
            }
            "txt" | "md" => document.text = String::from_utf8_lossy(data).into_owned(),
            _ => document
                .errors
                .push(format!("Unsupported file type: {file_name}")),
        }

        debug!(
            file = file_name,
            chars = document.text.chars().count(),
            images = document.images.len(),
            ocr_used = document.ocr_used,
            "document text extracted"
        );
        document
    }
}

pub fn file_type_label(file_name: &str) -> String {
    let extension = file_extension(file_name);
    if extension.is_empty() {
        "unknown".to_string()
    } else {
        extension.to_ascii_uppercase()
    }
}

fn file_extension(file_name: &str) -> String {
    std::path::Path::new(file_name)
        .extension()
        .and_then(|v| v.to_str())
        .map(|v| v.to_ascii_lowercase())
        .unwrap_or_default()
}

fn extract_docx_text(data: &[u8]) -> anyhow::Result<String> {
    let cursor = Cursor::new(data);
    let mut archive = zip::ZipArchive::new(cursor)?;

    let mut document_file = archive.by_name("word/document.xml")?;
    let mut xml = String::new();
    document_file.read_to_string(&mut xml)?;

    let mut reader = Reader::from_str(&xml);

    let mut buf = Vec::new();
    let mut current = String::new();
    let mut lines = Vec::new();
    let mut in_paragraph = false;
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:p" => {
                    in_paragraph = true;
                    current.clear();
                }
                b"w:t" => in_text = true,
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:p" => {
                    if !current.trim().is_empty() {
                        lines.push(current.trim_end().to_string());
                    }
                    current.clear();
                    in_paragraph = false;
                }
                b"w:t" => in_text = false,
                _ => {}
            },
            Ok(Event::Empty(e)) if in_paragraph => match e.name().as_ref() {
                b"w:tab" => current.push('\t'),
                b"w:br" | b"w:cr" => current.push('\n'),
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if in_paragraph && in_text {
                    let value = e.xml_content()?.into_owned();
                    current.push_str(&value);
                }
            }
            Ok(Event::GeneralRef(e)) => {
                if in_paragraph && in_text {
                    if let Some(ch) = e.resolve_char_ref()? {
                        current.push(ch);
                    } else if let Some(value) = resolve_predefined_entity(&e.decode()?) {
                        current.push_str(value);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(err.into()),
            _ => {}
        }

        buf.clear();
    }

    Ok(lines.join("\n"))
}

fn extract_docx_images(data: &[u8]) -> anyhow::Result<Vec<String>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data))?;
    let mut media: Vec<String> = archive
        .file_names()
        .filter(|name| name.starts_with("word/media/"))
        .map(str::to_string)
        .collect();
    media.sort();

    let mut images = Vec::with_capacity(media.len());
    for name in media {
        let Some(mime) = image_mime_type(&name) else {
            continue;
        };

        let mut bytes = Vec::new();
        archive.by_name(&name)?.read_to_end(&mut bytes)?;
        let payload = base64::engine::general_purpose::STANDARD.encode(&bytes);
        images.push(format!("data:{mime};base64,{payload}"));
    }

    Ok(images)
}

fn image_mime_type(name: &str) -> Option<&'static str> {
    let mime = match file_extension(name).as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "tif" | "tiff" => "image/tiff",
        "webp" => "image/webp",
        "emf" => "image/x-emf",
        "wmf" => "image/x-wmf",
        _ => return None,
    };
    Some(mime)
}
