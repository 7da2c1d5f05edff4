// src/controllers/bulk_pii.rs
use std::path::{Path, PathBuf};

use crate::api::types::BulkPiiResult;
use crate::api::{ApiClient, RetryPolicy, Upload};
use crate::utils::ReportKind;
use crate::validation::{FileSelection, SelectedFile, UploadPolicy, ValidationError};

use super::bulk::select_into;
use super::{download_report, ControllerError, Notifier, PageState, Toast};

/// Checks an uploaded list for passwords built from personal data.
pub struct BulkPiiController {
    client: ApiClient,
    retry: RetryPolicy,
    selection: FileSelection,
    download_dir: PathBuf,
    state: PageState<BulkPiiResult>,
}

impl BulkPiiController {
    pub fn new(client: ApiClient, retry: RetryPolicy, max_upload_size: u64, download_dir: PathBuf) -> Self {
        Self {
            client,
            retry,
            selection: FileSelection::new(UploadPolicy::bulk_pii(max_upload_size)),
            download_dir,
            state: PageState::default(),
        }
    }

    pub fn state(&self) -> &PageState<BulkPiiResult> {
        &self.state
    }

    pub fn selection(&self) -> &FileSelection {
        &self.selection
    }

    pub fn select_file(&mut self, path: &Path) -> Result<&SelectedFile, ControllerError> {
        select_into(&mut self.selection, &mut self.state, path)
    }

    pub async fn analyze(&mut self, notifier: &dyn Notifier) -> Result<&BulkPiiResult, ControllerError> {
        self.state.ensure_idle()?;

        let file = match self.selection.file() {
            Some(file) => file.clone(),
            None => return Err(self.state.reject(ValidationError::NoFile)),
        };

        let request = self.state.begin()?;
        log::info!("Uploading {} ({} bytes) for PII analysis", file.name, file.size);

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
                || client.bulk_pii(&upload),
                |attempt, max| notifier.notify(Toast::retrying("upload", attempt, max)),
            )
            .await;

        match outcome {
            Ok(result) => {
                let stats = &result.statistics;
                if !stats.is_consistent() {
                    log::warn!(
                        "PII statistics do not add up: {} matched + {} not matched != {} total",
                        stats.matched_passwords,
                        stats.not_matched_passwords,
                        stats.total_passwords
                    );
                }

                notifier.notify(Toast::info(
                    "Analysis Complete",
                    format!("Successfully analyzed {} passwords.", stats.total_passwords),
                ));
                Ok(request.succeed(result))
            }
            Err(err) => {
                log::error!("Error analyzing file {} for PII: {}", file.name, err);
                let message = err.user_message();
                notifier.notify(Toast::error("Analysis Failed", message.clone()));
                request.fail(message.clone());
                Err(ControllerError::Request(message))
            }
        }
    }

    pub async fn download_report(&self, notifier: &dyn Notifier) -> Result<PathBuf, ControllerError> {
        let result = self.state.result().ok_or(ControllerError::NoReport)?;

        download_report(
            &self.client,
            &self.client.endpoints().bulk_pii,
            &result.download_url,
            ReportKind::PiiAnalysis,
            &self.download_dir,
            notifier,
        )
        .await
    }
}
