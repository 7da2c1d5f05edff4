// src/controllers/bulk.rs
use std::path::{Path, PathBuf};

use crate::api::types::BulkAnalysisResult;
use crate::api::{ApiClient, RetryPolicy, Upload};
use crate::utils::ReportKind;
use crate::validation::{FileSelection, SelectedFile, UploadPolicy, ValidationError};

use super::{download_report, ControllerError, Notifier, PageState, Toast};

/// Strength audit of an uploaded password list.
pub struct BulkController {
    client: ApiClient,
    retry: RetryPolicy,
    selection: FileSelection,
    download_dir: PathBuf,
    state: PageState<BulkAnalysisResult>,
}

impl BulkController {
    pub fn new(client: ApiClient, retry: RetryPolicy, max_upload_size: u64, download_dir: PathBuf) -> Self {
        Self {
            client,
            retry,
            selection: FileSelection::new(UploadPolicy::bulk(max_upload_size)),
            download_dir,
            state: PageState::default(),
        }
    }

    pub fn state(&self) -> &PageState<BulkAnalysisResult> {
        &self.state
    }

    pub fn selection(&self) -> &FileSelection {
        &self.selection
    }

    pub fn select_file(&mut self, path: &Path) -> Result<&SelectedFile, ControllerError> {
        select_into(&mut self.selection, &mut self.state, path)
    }

    pub async fn analyze(&mut self, notifier: &dyn Notifier) -> Result<&BulkAnalysisResult, ControllerError> {
        self.state.ensure_idle()?;

        let file = match self.selection.file() {
            Some(file) => file.clone(),
            None => return Err(self.state.reject(ValidationError::NoFile)),
        };

        let request = self.state.begin()?;
        log::info!("Uploading {} ({} bytes) for bulk analysis", file.name, file.size);

        let upload = match Upload::read(&file).await {
            Ok(upload) => upload,
            Err(err) => {
                log::error!("Error reading {}: {}", file.name, err);
                let message = err.user_message();
                notifier.notify(Toast::error("Analysis Failed", message.clone()));
                request.fail(message.clone());
                return Err(ControllerError::Request(message));
            }
        };

        let client = &self.client;
        let outcome = self.retry
            .run_with_notify(
                || client.bulk_analysis(&upload),
                |attempt, max| notifier.notify(Toast::retrying("upload", attempt, max)),
            )
            .await;

        match outcome {
            Ok(result) => {
                log::info!(
                    "Bulk analysis complete: {} weak, {} moderate, {} strong",
                    result.weak_passwords,
                    result.moderate_passwords,
                    result.strong_passwords
                );
                notifier.notify(Toast::info(
                    "Analysis Complete",
                    format!("Successfully analyzed {} passwords.", result.total_passwords_analyzed),
                ));
                Ok(request.succeed(result))
            }
            Err(err) => {
                log::error!("Error analyzing file {}: {}", file.name, err);
                let message = err.user_message();
                notifier.notify(Toast::error("Analysis Failed", message.clone()));
                request.fail(message.clone());
                Err(ControllerError::Request(message))
            }
        }
    }

    /// Save the latest report into the download directory.
    pub async fn download_report(&self, notifier: &dyn Notifier) -> Result<PathBuf, ControllerError> {
        let result = self.state.result().ok_or(ControllerError::NoReport)?;

        download_report(
            &self.client,
            &self.client.endpoints().bulk,
            &result.download_link,
            ReportKind::PasswordAnalysis,
            &self.download_dir,
            notifier,
        )
        .await
    }
}

// Shared with the PII page: a bad candidate clears the selection and
// surfaces as the page error.
pub(super) fn select_into<'s, T>(
    selection: &'s mut FileSelection,
    state: &mut PageState<T>,
    path: &Path,
) -> Result<&'s SelectedFile, ControllerError> {
    let candidate = match SelectedFile::from_path(path) {
        Ok(candidate) => candidate,
        Err(err) => {
            selection.clear();
            return Err(state.reject(err));
        }
    };

    match selection.select(candidate) {
        Ok(file) => Ok(file),
        Err(rejection) => Err(state.reject(rejection.into())),
    }
}
