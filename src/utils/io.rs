// src/utils/io.rs
use std::fs;
use std::path::{Path, PathBuf};
use chrono::{NaiveDate, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Report is empty")]
    Empty,
}

/// Which audit produced a downloadable report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    PasswordAnalysis,
    PiiAnalysis,
}

impl ReportKind {
    fn prefix(&self) -> &'static str {
        match self {
            ReportKind::PasswordAnalysis => "password-analysis-report",
            ReportKind::PiiAnalysis => "pii-analysis-report",
        }
    }

    pub fn file_name_for(&self, date: NaiveDate) -> String {
        format!("{}-{}.csv", self.prefix(), date.format("%Y-%m-%d"))
    }

    /// Today's report name, dated in UTC
    pub fn file_name(&self) -> String {
        self.file_name_for(Utc::now().date_naive())
    }
}

/// Write a downloaded report into `dir`, creating it if needed.
///
/// Returns the path that was written.
pub fn save_report(dir: &Path, kind: ReportKind, bytes: &[u8]) -> Result<PathBuf, ReportError> {
    if bytes.is_empty() {
        return Err(ReportError::Empty);
    }

    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }

    let path = dir.join(kind.file_name());
    fs::write(&path, bytes)?;

    log::info!("Saved {} bytes to {}", bytes.len(), path.display());
    Ok(path)
}
