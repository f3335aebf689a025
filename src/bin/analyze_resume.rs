use std::path::Path;

use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use moodfolio_lib::core::models::JobCategory;
use moodfolio_lib::core::service::{is_client_error, ResumeAnalysisService};
use moodfolio_lib::core::settings_store::SettingsStore;

const USAGE: &str = "Usage: analyze_resume <path-to-resume.pdf|docx|txt|md> [--category <job>]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("moodfolio_lib=info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (path, category) = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(message) => {
            eprintln!("{message}");
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
    };

    if !Path::new(&path).exists() {
        eprintln!("File not found: {path}");
        std::process::exit(2);
    }

    let file_name = Path::new(&path)
        .file_name()
        .and_then(|v| v.to_str())
        .unwrap_or("resume.txt")
        .to_string();

    let bytes = tokio::fs::read(&path).await?;

    let settings = SettingsStore::new().load_effective().await.unwrap_or_else(|err| {
        error!(error = %format!("{err:#}"), "failed to load settings, using defaults");
        moodfolio_lib::core::models::RuntimeSettings::default()
    });
    let service = ResumeAnalysisService::from_settings(settings).await;

    match service.analyze_file(&file_name, &bytes, category).await {
        Ok(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Err(err) => {
            if is_client_error(&err) {
                error!(error = %err, "resume rejected");
            } else {
                error!(error = %format!("{err:#}"), "analysis failed");
            }
            std::process::exit(3);
        }
    }
}

fn parse_args(args: &[String]) -> Result<(String, Option<JobCategory>), String> {
    let mut path = None;
    let mut category = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--category" => {
                let value = iter
                    .next()
                    .ok_or_else(|| "--category needs a value".to_string())?;
                category = Some(
                    JobCategory::parse(value)
                        .ok_or_else(|| format!("Unknown job category: {value}"))?,
                );
            }
            other if path.is_none() => path = Some(other.to_string()),
            other => return Err(format!("Unexpected argument: {other}")),
        }
    }

    path.map(|path| (path, category))
        .ok_or_else(|| "Missing resume path".to_string())
}
