// src/validation.rs
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::utils::MIB;

/// A file the user picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
}

impl SelectedFile {
    pub fn from_path(path: &Path) -> Result<Self, ValidationError> {
        let metadata = std::fs::metadata(path)
            .map_err(|e| ValidationError::Unreadable(path.display().to_string(), e.to_string()))?;

        if !metadata.is_file() {
            return Err(ValidationError::NotAFile(path.display().to_string()));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            path: path.to_path_buf(),
            name,
            size: metadata.len(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadRejection {
    #[error("Please upload {0}")]
    UnsupportedType(String),

    #[error("File size exceeds the limit of {0}MB")]
    TooLarge(u64),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a password")]
    EmptyPassword,

    #[error("Password must be at least {0} characters long")]
    PasswordTooShort(usize),

    #[error("Please enter at least one phrase")]
    NoPhrases,

    #[error("Please select a file to analyze")]
    NoFile,

    #[error("Cannot read {0}: {1}")]
    Unreadable(String, String),

    #[error("{0} is not a regular file")]
    NotAFile(String),

    #[error("{0}")]
    Rejected(#[from] UploadRejection),
}

/// Which files an upload endpoint accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    allowed_extensions: BTreeSet<String>,
    max_size: u64,
    type_label: String,
}

impl UploadPolicy {
    pub fn new<I, S>(allowed_extensions: I, max_size: u64, type_label: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|ext| ext.as_ref().to_lowercase())
                .collect(),
            max_size,
            type_label: type_label.to_string(),
        }
    }

    /// CSV or Excel, for the bulk strength audit
    pub fn bulk(max_size: u64) -> Self {
        Self::new(["csv", "xlsx", "xls"], max_size, "a CSV or Excel file")
    }

    /// CSV only, for the PII audit
    pub fn bulk_pii(max_size: u64) -> Self {
        Self::new(["csv"], max_size, "a CSV file")
    }

    pub fn check(&self, name: &str, size: u64) -> Result<(), UploadRejection> {
        let allowed = file_extension(name)
            .map(|ext| self.allowed_extensions.contains(&ext.to_lowercase()))
            .unwrap_or(false);

        if !allowed {
            return Err(UploadRejection::UnsupportedType(self.type_label.clone()));
        }

        if size > self.max_size {
            return Err(UploadRejection::TooLarge(self.max_size / MIB));
        }

        Ok(())
    }
}

impl fmt::Display for UploadPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let extensions: Vec<String> = self.allowed_extensions.iter().map(|e| format!(".{}", e)).collect();
        write!(f, "{} up to {}MB", extensions.join(", "), self.max_size / MIB)
    }
}

// Text after the last dot, if there is any
fn file_extension(name: &str) -> Option<&str> {
    match name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => Some(ext),
        _ => None,
    }
}

/// The file currently queued for upload.
///
/// A rejected candidate always clears the previous selection.
#[derive(Debug, Clone)]
pub struct FileSelection {
    policy: UploadPolicy,
    file: Option<SelectedFile>,
}

impl FileSelection {
    pub fn new(policy: UploadPolicy) -> Self {
        Self { policy, file: None }
    }

    pub fn select(&mut self, candidate: SelectedFile) -> Result<&SelectedFile, UploadRejection> {
        if let Err(rejection) = self.policy.check(&candidate.name, candidate.size) {
            log::info!("Rejected upload candidate {}: {}", candidate.name, rejection);
            self.file = None;
            return Err(rejection);
        }

        Ok(self.file.insert(candidate))
    }

    pub fn clear(&mut self) {
        self.file = None;
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }
}

pub fn validate_password(password: &str, min_length: usize) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::EmptyPassword);
    }

    if password.chars().count() < min_length {
        return Err(ValidationError::PasswordTooShort(min_length));
    }

    Ok(())
}

/// Trim phrases and drop the blank ones.
pub fn clean_phrases<S: AsRef<str>>(phrases: &[S]) -> Result<Vec<String>, ValidationError> {
    let cleaned: Vec<String> = phrases
        .iter()
        .map(|p| p.as_ref().trim())
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();

    if cleaned.is_empty() {
        return Err(ValidationError::NoPhrases);
    }

    Ok(cleaned)
}
