use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use super::models::RuntimeSettings;

pub const TESSERACT_PATH_ENV: &str = "MOODFOLIO_TESSERACT_PATH";
pub const OCR_LANGUAGE_ENV: &str = "MOODFOLIO_OCR_LANG";
pub const INSIGHTS_PATH_ENV: &str = "MOODFOLIO_INSIGHTS_PATH";

pub struct SettingsStore {
    file_path: PathBuf,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::new_with_path(settings_path())
    }

    pub fn new_with_path(file_path: PathBuf) -> Self {
        Self { file_path }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Missing file means defaults.
    pub async fn load(&self) -> anyhow::Result<RuntimeSettings> {
        if !tokio::fs::try_exists(&self.file_path)
            .await
            .unwrap_or(false)
        {
            debug!(path = %self.file_path.display(), "no settings file, using defaults");
            return Ok(RuntimeSettings::default());
        }

        let content = tokio::fs::read_to_string(&self.file_path)
            .await
            .with_context(|| {
                format!("failed to read settings file {}", self.file_path.display())
            })?;

        let parsed = serde_json::from_str::<RuntimeSettings>(&content).with_context(|| {
            format!("invalid JSON in settings file {}", self.file_path.display())
        })?;

        Ok(parsed)
    }

    pub async fn load_effective(&self) -> anyhow::Result<RuntimeSettings> {
        let settings = self.load().await?;
        Ok(apply_env_overrides(settings, |key| std::env::var(key).ok()))
    }

    pub async fn save(&self, settings: &RuntimeSettings) -> anyhow::Result<()> {
        if let Some(parent) = self.file_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(settings)?;
        tokio::fs::write(&self.file_path, json).await?;
        Ok(())
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

pub fn apply_env_overrides(
    mut settings: RuntimeSettings,
    lookup: impl Fn(&str) -> Option<String>,
) -> RuntimeSettings {
    let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(path) = non_blank(TESSERACT_PATH_ENV) {
        settings.tesseract_path = path;
    }
    if let Some(language) = non_blank(OCR_LANGUAGE_ENV) {
        settings.ocr_language = language;
    }
    if let Some(path) = non_blank(INSIGHTS_PATH_ENV) {
        settings.insights_path = Some(path);
    }

    settings
}

fn settings_path() -> PathBuf {
    app_data_root().join("settings.json")
}

pub fn app_data_root() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Ok(local_app_data) = std::env::var("LOCALAPPDATA") {
            return PathBuf::from(local_app_data).join("MoodFolio");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = dirs::home_dir() {
            return home
                .join("Library")
                .join("Application Support")
                .join("MoodFolio");
        }
    }

    if let Some(path) = dirs::data_local_dir() {
        return path.join("MoodFolio");
    }

    PathBuf::from(".").join("MoodFolio")
}
