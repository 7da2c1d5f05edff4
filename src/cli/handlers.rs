// src/cli/handlers.rs
use std::path::{Path, PathBuf};
use anyhow::Result;
use serde::Serialize;

use crate::api::{ApiClient, RetryPolicy};
use crate::cli::commands::{CliCommand, ReportSource};
use crate::cli::render::{self, ConsoleNotifier};
use crate::controllers::{
    download_report, AnalyzeController, BulkController, BulkPiiController, InsightsController,
    PassphraseController,
};
use crate::core::config::Config;
use crate::utils::ReportKind;

/// All page controllers for one run of the program.
pub struct Session {
    pub analyze: AnalyzeController,
    pub passphrase: PassphraseController,
    pub bulk: BulkController,
    pub bulk_pii: BulkPiiController,
    pub insights: InsightsController,
    pub notifier: ConsoleNotifier,
    client: ApiClient,
    download_dir: PathBuf,
    json: bool,
}

impl Session {
    pub fn new(client: ApiClient, config: &Config, json: bool) -> Self {
        let requests = RetryPolicy::new(config.max_retries, config.retry_delay);
        let uploads = RetryPolicy::new(config.max_retries, config.upload_retry_delay);
        let download_dir = config.download_directory.clone();

        Self {
            analyze: AnalyzeController::new(client.clone(), requests, config.min_password_length),
            passphrase: PassphraseController::new(client.clone(), requests),
            bulk: BulkController::new(client.clone(), uploads, config.max_upload_size, download_dir.clone()),
            bulk_pii: BulkPiiController::new(client.clone(), uploads, config.max_upload_size, download_dir.clone()),
            insights: InsightsController::new(client.clone(), requests),
            notifier: ConsoleNotifier::new(json),
            client,
            download_dir,
            json,
        }
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }
}

fn emit<T: Serialize>(json: bool, value: &T, render: fn(&T) -> String) -> Result<()> {
    if json {
        println!("{}", render::to_json(value)?);
    } else {
        print!("{}", render(value));
    }
    Ok(())
}

fn report_saved(json: bool, path: &Path) -> Result<()> {
    if json {
        println!("{}", render::to_json(&serde_json::json!({ "report": path }))?);
    } else {
        println!("📁 Report saved to {}", path.display());
    }
    Ok(())
}

/// Run one subcommand. Errors are already formatted for the user.
pub async fn run_command(session: &mut Session, command: CliCommand) -> Result<()> {
    match command {
        CliCommand::Analyze { password } => {
            let password = match password {
                Some(password) => password,
                None => crate::cli::menu::prompt_password().await?,
            };
            handle_analyze(session, &password).await
        }
        CliCommand::Passphrase { phrases } => handle_passphrase(session, &phrases).await,
        CliCommand::Bulk { file, download } => handle_bulk(session, &file, download).await,
        CliCommand::BulkPii { file, download } => handle_bulk_pii(session, &file, download).await,
        CliCommand::Insights => handle_insights(session).await,
        CliCommand::Download { reference, kind } => handle_download(session, &reference, kind).await,
    }
}

pub async fn handle_analyze(session: &mut Session, password: &str) -> Result<()> {
    let result = session.analyze.submit(password, &session.notifier).await?;
    emit(session.json, result, render::analysis)
}

pub async fn handle_passphrase(session: &mut Session, phrases: &[String]) -> Result<()> {
    let result = session.passphrase.submit(phrases, &session.notifier).await?;
    emit(session.json, result, render::passphrase)
}

pub async fn handle_bulk(session: &mut Session, file: &Path, download: bool) -> Result<()> {
    session.bulk.select_file(file)?;
    let result = session.bulk.analyze(&session.notifier).await?;
    emit(session.json, result, render::bulk)?;

    if download {
        let path = session.bulk.download_report(&session.notifier).await?;
        report_saved(session.json, &path)?;
    }
    Ok(())
}

pub async fn handle_bulk_pii(session: &mut Session, file: &Path, download: bool) -> Result<()> {
    session.bulk_pii.select_file(file)?;
    let result = session.bulk_pii.analyze(&session.notifier).await?;
    emit(session.json, result, render::bulk_pii)?;

    if download {
        let path = session.bulk_pii.download_report(&session.notifier).await?;
        report_saved(session.json, &path)?;
    }
    Ok(())
}

pub async fn handle_insights(session: &mut Session) -> Result<()> {
    let result = session.insights.load().await?;
    if result.insights.is_empty() && !session.json {
        println!("No insights available right now.");
        return Ok(());
    }
    emit(session.json, result, render::insights)
}

pub async fn handle_download(session: &Session, reference: &str, source: ReportSource) -> Result<()> {
    let endpoints = session.client.endpoints();
    let (base, kind) = match source {
        ReportSource::Bulk => (&endpoints.bulk, ReportKind::PasswordAnalysis),
        ReportSource::Pii => (&endpoints.bulk_pii, ReportKind::PiiAnalysis),
    };

    let path = download_report(&session.client, base, reference, kind, &session.download_dir, &session.notifier).await?;
    report_saved(session.json, &path)
}
