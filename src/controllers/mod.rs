// src/controllers/mod.rs
//
// One controller per feature. Each owns its page state; nothing is shared
// between flows.
use std::path::{Path, PathBuf};
use reqwest::Url;
use thiserror::Error;

use crate::api::ApiClient;
use crate::utils::{save_report, ReportError, ReportKind};
use crate::validation::ValidationError;

pub mod analyze;
pub mod bulk;
pub mod bulk_pii;
pub mod insights;
pub mod passphrase;

pub use analyze::AnalyzeController;
pub use bulk::BulkController;
pub use bulk_pii::BulkPiiController;
pub use insights::InsightsController;
pub use passphrase::PassphraseController;

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("A request is already in progress")]
    Busy,

    #[error("{0}")]
    Invalid(#[from] ValidationError),

    /// Already formatted for the user
    #[error("{0}")]
    Request(String),

    #[error("No report available to download")]
    NoReport,

    #[error("Failed to save report: {0}")]
    Report(#[from] ReportError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastVariant {
    Default,
    Destructive,
}

/// A transient notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub variant: ToastVariant,
}

impl Toast {
    pub fn info(title: &str, description: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            description: description.into(),
            variant: ToastVariant::Default,
        }
    }

    pub fn error(title: &str, description: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            description: description.into(),
            variant: ToastVariant::Destructive,
        }
    }

    pub fn retrying(what: &str, attempt: u32, max_retries: u32) -> Self {
        Self::error("Connection issue", format!("Retrying {} ({}/{})...", what, attempt, max_retries))
    }
}

pub trait Notifier {
    fn notify(&self, toast: Toast);
}

/// Loading flag, last result and last error of one page.
#[derive(Debug, Clone)]
pub struct PageState<T> {
    loading: bool,
    result: Option<T>,
    error: Option<String>,
}

impl<T> Default for PageState<T> {
    fn default() -> Self {
        Self {
            loading: false,
            result: None,
            error: None,
        }
    }
}

impl<T> PageState<T> {
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn result(&self) -> Option<&T> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Refuse to start while a request is in flight.
    pub fn ensure_idle(&self) -> Result<(), ControllerError> {
        if self.loading {
            return Err(ControllerError::Busy);
        }
        Ok(())
    }

    /// Mark the page as loading until the returned request is settled.
    ///
    /// Dropping the `InFlight` unsettled (a cancelled future) puts the page
    /// back to idle.
    pub fn begin(&mut self) -> Result<InFlight<'_, T>, ControllerError> {
        self.ensure_idle()?;
        self.loading = true;
        self.error = None;
        Ok(InFlight { state: Some(self) })
    }

    fn succeed(&mut self, value: T) -> &T {
        self.loading = false;
        self.error = None;
        self.result.insert(value)
    }

    fn fail(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
    }

    /// Record a validation failure without touching the last result.
    pub fn reject(&mut self, err: ValidationError) -> ControllerError {
        self.fail(err.to_string());
        ControllerError::Invalid(err)
    }
}

/// A request started by [`PageState::begin`].
pub struct InFlight<'a, T> {
    state: Option<&'a mut PageState<T>>,
}

impl<'a, T> InFlight<'a, T> {
    pub fn succeed(mut self, value: T) -> &'a T {
        match self.state.take() {
            Some(state) => state.succeed(value),
            None => unreachable!("settled twice"),
        }
    }

    pub fn fail(mut self, message: impl Into<String>) {
        if let Some(state) = self.state.take() {
            state.fail(message);
        }
    }

    /// Fail and forget the last result as well.
    pub fn fail_and_clear(mut self, message: impl Into<String>) {
        if let Some(state) = self.state.take() {
            state.fail(message);
            state.result = None;
        }
    }
}

impl<T> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        if let Some(state) = self.state.take() {
            log::debug!("Request abandoned before completion");
            state.loading = false;
        }
    }
}

// Shared by both upload pages
pub(crate) async fn download_report(
    client: &ApiClient,
    base: &Url,
    reference: &str,
    kind: ReportKind,
    download_dir: &Path,
    notifier: &dyn Notifier,
) -> Result<PathBuf, ControllerError> {
    notifier.notify(Toast::info("Preparing download", "Your report is being prepared..."));

    let saved = match client.download(base, reference).await {
        Ok(bytes) => save_report(download_dir, kind, &bytes).map_err(ControllerError::from),
        Err(err) => {
            log::error!("Error downloading report: {}", err);
            Err(ControllerError::Request(err.user_message()))
        }
    };

    match saved {
        Ok(path) => {
            notifier.notify(Toast::info("Download complete", "Your report has been downloaded successfully."));
            Ok(path)
        }
        Err(err) => {
            notifier.notify(Toast::error(
                "Download failed",
                "There was an error downloading your report. Please try again.",
            ));
            Err(err)
        }
    }
}
