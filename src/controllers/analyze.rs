// src/controllers/analyze.rs
use crate::api::types::PasswordAnalysisResult;
use crate::api::{ApiClient, RetryPolicy};
use crate::validation::validate_password;

use super::{ControllerError, Notifier, PageState, Toast};

pub struct AnalyzeController {
    client: ApiClient,
    retry: RetryPolicy,
    min_password_length: usize,
    state: PageState<PasswordAnalysisResult>,
}

impl AnalyzeController {
    pub fn new(client: ApiClient, retry: RetryPolicy, min_password_length: usize) -> Self {
        Self {
            client,
            retry,
            min_password_length,
            state: PageState::default(),
        }
    }

    pub fn state(&self) -> &PageState<PasswordAnalysisResult> {
        &self.state
    }

    pub async fn submit(
        &mut self,
        password: &str,
        notifier: &dyn Notifier,
    ) -> Result<&PasswordAnalysisResult, ControllerError> {
        self.state.ensure_idle()?;

        if let Err(err) = validate_password(password, self.min_password_length) {
            return Err(self.state.reject(err));
        }

        let request = self.state.begin()?;
        log::info!("Submitting password for analysis");

        let client = &self.client;
        let outcome = self.retry
            .run_with_notify(
                || client.analyse(password),
                |attempt, max| notifier.notify(Toast::retrying("request", attempt, max)),
            )
            .await;

        match outcome {
            Ok(result) => {
                log::info!("Analysis complete");
                notifier.notify(Toast::info("Analysis Complete", "Your password has been analyzed."));
                Ok(request.succeed(result))
            }
            Err(err) => {
                log::error!("Error analyzing password: {}", err);
                let message = err.user_message();
                notifier.notify(Toast::error("Error", "Failed to analyze password. Please try again."));
                request.fail(message.clone());
                Err(ControllerError::Request(message))
            }
        }
    }
}
