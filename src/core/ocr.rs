use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use anyhow::Context;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use super::models::RuntimeSettings;

#[derive(Clone)]
pub struct TesseractCliOcrService {
    pub tesseract_executable_path: String,
    pub language: String,
    pub timeout: Duration,
}

impl TesseractCliOcrService {
    pub fn new(tesseract_executable_path: String, language: String, timeout: Duration) -> Self {
        Self {
            tesseract_executable_path,
            language,
            timeout,
        }
    }

    pub fn from_settings(settings: &RuntimeSettings) -> Self {
        let executable = if settings.tesseract_path.trim().is_empty() {
            "tesseract".to_string()
        } else {
            settings.tesseract_path.clone()
        };
        let language = if settings.ocr_language.trim().is_empty() {
            "kor+eng".to_string()
        } else {
            settings.ocr_language.clone()
        };

        Self::new(
            executable,
            language,
            Duration::from_secs(settings.ocr_timeout_seconds.max(1)),
        )
    }

    /// Timeouts and non-zero exits yield empty text; only local I/O failures are errors.
    pub async fn extract_text(&self, pdf_bytes: &[u8]) -> anyhow::Result<String> {
        let temp_dir = tempfile::Builder::new()
            .prefix("moodfolio-ocr-")
            .tempdir()
            .context("failed to create OCR temp dir")?;

        let input_path: PathBuf = temp_dir.path().join("resume.pdf");
        tokio::fs::write(&input_path, pdf_bytes)
            .await
            .context("failed to stage PDF for OCR")?;

        let mut command = Command::new(&self.tesseract_executable_path);
        command
            .arg(&input_path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match timeout(self.timeout, command.output()).await {
            Ok(result) => result.with_context(|| {
                format!("failed to run {}", self.tesseract_executable_path)
            })?,
            Err(_) => {
                warn!(timeout_secs = self.timeout.as_secs(), "tesseract timed out");
                return Ok(String::new());
            }
        };

        if !output.status.success() {
            warn!(status = %output.status, "tesseract exited unsuccessfully");
            return Ok(String::new());
        }

        let text = String::from_utf8_lossy(&output.stdout).to_string();
        debug!(chars = text.chars().count(), "ocr text extracted");
        Ok(text)
    }
}
