use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

use super::completeness::{score_completeness, ProfileCompleteness};
use super::document_parser::{file_type_label, DocumentTextExtractor};
use super::errors::CoreError;
use super::insights::{MarketFit, MarketInsightStore};
use super::models::{ExtractedProfile, JobCategory, RuntimeSettings};
use super::ocr::TesseractCliOcrService;
use super::pdf::PdfTextExtractor;
use super::profile::ProfileAssembler;

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    #[serde(flatten)]
    pub profile: ExtractedProfile,
    pub completeness: ProfileCompleteness,
    pub market_fit: Option<MarketFit>,
    pub images: Vec<String>,
    pub ocr_used: bool,
    pub errors: Vec<String>,
}

pub struct ResumeAnalysisService {
    settings: RuntimeSettings,
    assembler: ProfileAssembler,
    insights: Option<MarketInsightStore>,
}

impl ResumeAnalysisService {
    pub fn new(settings: RuntimeSettings, insights: Option<MarketInsightStore>) -> Self {
        Self {
            settings,
            assembler: ProfileAssembler::default(),
            insights,
        }
    }

    // A broken insight file only disables market fit.
    pub async fn from_settings(settings: RuntimeSettings) -> Self {
        let insights = match settings.insights_path.as_deref() {
            Some(path) if !path.trim().is_empty() => {
                match MarketInsightStore::load(Path::new(path)).await {
                    Ok(store) => Some(store),
                    Err(err) => {
                        warn!(error = %format!("{err:#}"), "continuing without market insights");
                        None
                    }
                }
            }
            _ => None,
        };

        Self::new(settings, insights)
    }

    pub fn settings(&self) -> &RuntimeSettings {
        &self.settings
    }

    pub fn has_insights(&self) -> bool {
        self.insights.is_some()
    }

    pub fn analyze_text(
        &self,
        text: &str,
        category: Option<JobCategory>,
    ) -> anyhow::Result<ExtractedProfile> {
        if text.trim().is_empty() {
            return Err(CoreError::InvalidRequest("resume text is empty".to_string()).into());
        }

        let profile = self.assembler.assemble_with_category(text, category);
        info!(
            job_type = profile.job_type.insight_key(),
            projects = profile.projects.len(),
            skills = profile.skills.len(),
            "resume analyzed"
        );
        Ok(profile)
    }

    pub async fn analyze_file(
        &self,
        file_name: &str,
        data: &[u8],
        category: Option<JobCategory>,
    ) -> anyhow::Result<AnalysisReport> {
        if data.len() > self.settings.max_file_size_bytes {
            return Err(CoreError::FileTooLarge {
                file_name: file_name.to_string(),
                size: data.len(),
                limit: self.settings.max_file_size_bytes,
            }
            .into());
        }

        let document = self.build_extractor().extract(file_name, data).await;
        if document.text.trim().is_empty() {
            if !document.errors.is_empty() {
                warn!(file = file_name, errors = ?document.errors, "text extraction failed");
            }
            return Err(CoreError::EmptyDocument {
                file_name: file_name.to_string(),
                file_type: file_type_label(file_name),
            }
            .into());
        }

        let profile = self.analyze_text(&document.text, category)?;
        let completeness = score_completeness(&profile);
        let market_fit = self
            .insights
            .as_ref()
            .and_then(|store| store.market_fit(profile.job_type, &profile.skills));

        info!(
            file = file_name,
            completeness = completeness.percentage,
            ocr_used = document.ocr_used,
            market_fit = market_fit.is_some(),
            "resume report ready"
        );

        Ok(AnalysisReport {
            profile,
            completeness,
            market_fit,
            images: document.images,
            ocr_used: document.ocr_used,
            errors: document.errors,
        })
    }

    pub fn market_fit(&self, category: JobCategory, skills: &[String]) -> anyhow::Result<MarketFit> {
        let store = self.insights.as_ref().ok_or_else(|| {
            CoreError::InsightsUnavailable("no market insight data loaded".to_string())
        })?;

        store.market_fit(category, skills).ok_or_else(|| {
            CoreError::InsightsUnavailable(format!("no data for {}", category.insight_key())).into()
        })
    }

    fn build_extractor(&self) -> DocumentTextExtractor {
        let ocr = TesseractCliOcrService::from_settings(&self.settings);
        DocumentTextExtractor::new(PdfTextExtractor::new(ocr))
    }
}

pub fn is_client_error(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<CoreError>()
        .is_some_and(CoreError::is_client_error)
}
