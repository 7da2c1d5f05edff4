// src/cli/menu.rs
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use anyhow::{bail, Result};
use inquire::{Confirm, InquireError, Password, PasswordDisplayMode, Select, Text};

use crate::cli::handlers::{self, Session};
use crate::cli::render;

const ANALYZE: &str = "🔍  Analyze a password";
const PASSPHRASE: &str = "🔐  Generate a passphrase";
const BULK: &str = "📊  Bulk password analysis";
const BULK_PII: &str = "🕵️  Bulk PII analysis";
const DOWNLOAD: &str = "📥  Download a report";
const INSIGHTS: &str = "💡  Security insights";
const EXIT: &str = "❌  Exit";

const PASSWORD_REPORT: &str = "Password analysis report";
const PII_REPORT: &str = "PII analysis report";

// inquire blocks the thread; keep it off the runtime
async fn blocking<T, F>(prompt: F) -> Result<Option<T>>
where
    F: FnOnce() -> Result<Option<T>, InquireError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(prompt).await? {
        Ok(answer) => Ok(answer),
        // Ctrl+C inside a prompt counts as backing out of it
        Err(InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn ask_password() -> Result<Option<String>> {
    blocking(|| {
        Password::new("Password to analyze:")
            .with_display_mode(PasswordDisplayMode::Hidden)
            .without_confirmation()
            .prompt_skippable()
    })
    .await
}

pub async fn prompt_password() -> Result<String> {
    match ask_password().await? {
        Some(password) => Ok(password),
        None => bail!("No password entered"),
    }
}

async fn prompt_phrases() -> Result<Vec<String>> {
    let mut phrases = Vec::new();
    loop {
        let label = format!("Phrase {} (leave empty to finish):", phrases.len() + 1);
        let phrase = blocking(move || Text::new(&label).prompt_skippable()).await?;

        match phrase {
            Some(phrase) if !phrase.trim().is_empty() => phrases.push(phrase),
            _ => return Ok(phrases),
        }
    }
}

async fn prompt_path(label: &'static str, help: String) -> Result<Option<PathBuf>> {
    let path = blocking(move || Text::new(label).with_help_message(&help).prompt_skippable()).await?;
    Ok(path.map(|p| p.trim().to_string()).filter(|p| !p.is_empty()).map(PathBuf::from))
}

async fn confirm(label: &'static str) -> Result<bool> {
    let answer = blocking(move || Confirm::new(label).with_default(true).prompt_skippable()).await?;
    Ok(answer.unwrap_or(false))
}

// Menu actions print their own failures; only prompt errors escape
fn report(outcome: Result<()>) {
    if let Err(e) = outcome {
        log::debug!("Menu action failed: {}", e);
        println!("{}", render::error_line(&e.to_string()));
    }
}

pub async fn run_cli_menu(session: &mut Session, should_exit: Arc<AtomicBool>) -> Result<()> {
    println!("🦀🔐 Welcome to");
    println!("╔══════════════════════════════════════╗");
    println!("║        🦀 PASSWORD AUDIT CLIENT      ║");
    println!("╚══════════════════════════════════════╝");

    // Insights are optional; a failure only leaves them out
    if let Ok(result) = session.insights.load().await {
        print!("{}", render::insights(result));
    }

    while !should_exit.load(Ordering::SeqCst) {
        let options = vec![ANALYZE, PASSPHRASE, BULK, BULK_PII, DOWNLOAD, INSIGHTS, EXIT];

        let selection = blocking(move || {
            Select::new("Choose an option:", options)
                .with_help_message("Use arrow keys to navigate, Enter to select. Ctrl+C to exit.")
                .with_page_size(10)
                .prompt_skippable()
        })
        .await?;

        if should_exit.load(Ordering::SeqCst) {
            break;
        }

        match selection {
            Some(ANALYZE) => {
                if let Some(password) = ask_password().await? {
                    report(handlers::handle_analyze(session, &password).await);
                }
            }
            Some(PASSPHRASE) => {
                let phrases = prompt_phrases().await?;
                report(handlers::handle_passphrase(session, &phrases).await);
            }
            Some(BULK) => {
                let help = format!("Accepted: {}", session.bulk.selection().policy());
                if let Some(path) = prompt_path("Path to the password list:", help).await? {
                    report(handlers::handle_bulk(session, &path, false).await);
                    if session.bulk.state().result().is_some() && confirm("Download the report now?").await? {
                        report(download_latest(session, PASSWORD_REPORT).await);
                    }
                }
            }
            Some(BULK_PII) => {
                let help = format!("Accepted: {}", session.bulk_pii.selection().policy());
                if let Some(path) = prompt_path("Path to the password list:", help).await? {
                    report(handlers::handle_bulk_pii(session, &path, false).await);
                    if session.bulk_pii.state().result().is_some() && confirm("Download the report now?").await? {
                        report(download_latest(session, PII_REPORT).await);
                    }
                }
            }
            Some(DOWNLOAD) => {
                let mut available = Vec::new();
                if session.bulk.state().result().is_some() {
                    available.push(PASSWORD_REPORT);
                }
                if session.bulk_pii.state().result().is_some() {
                    available.push(PII_REPORT);
                }

                if available.is_empty() {
                    println!("⚠️ Run a bulk analysis first; there is no report to download yet.");
                    continue;
                }

                let choice = blocking(move || Select::new("Which report?", available).prompt_skippable()).await?;
                if let Some(choice) = choice {
                    report(download_latest(session, choice).await);
                }
            }
            Some(INSIGHTS) => report(handlers::handle_insights(session).await),
            Some(EXIT) | None => break,
            Some(_) => continue,
        }
        println!();
    }

    println!("👋 Goodbye! Reports are saved in {}", session.download_dir().display());
    Ok(())
}

async fn download_latest(session: &Session, which: &str) -> Result<()> {
    let path = if which == PII_REPORT {
        session.bulk_pii.download_report(&session.notifier).await?
    } else {
        session.bulk.download_report(&session.notifier).await?
    };
    println!("📁 Report saved to {}", path.display());
    Ok(())
}
