// src/controllers/passphrase.rs
use crate::api::types::PassphraseResult;
use crate::api::{ApiClient, RetryPolicy};
use crate::validation::clean_phrases;

use super::{ControllerError, Notifier, PageState, Toast};

pub struct PassphraseController {
    client: ApiClient,
    retry: RetryPolicy,
    state: PageState<PassphraseResult>,
}

impl PassphraseController {
    pub fn new(client: ApiClient, retry: RetryPolicy) -> Self {
        Self {
            client,
            retry,
            state: PageState::default(),
        }
    }

    pub fn state(&self) -> &PageState<PassphraseResult> {
        &self.state
    }

    /// Blank entries are dropped before sending.
    pub async fn submit<S: AsRef<str>>(
        &mut self,
        phrases: &[S],
        notifier: &dyn Notifier,
    ) -> Result<&PassphraseResult, ControllerError> {
        self.state.ensure_idle()?;

        let phrases = match clean_phrases(phrases) {
            Ok(phrases) => phrases,
            Err(err) => return Err(self.state.reject(err)),
        };

        let request = self.state.begin()?;
        log::info!("Requesting passphrase from {} phrase(s)", phrases.len());

        let client = &self.client;
        let outcome = self.retry
            .run_with_notify(
                || client.generate_passphrase(&phrases),
                |attempt, max| notifier.notify(Toast::retrying("request", attempt, max)),
            )
            .await;

        match outcome {
            Ok(result) => {
                notifier.notify(Toast::info(
                    "Password Generated",
                    "Your secure password has been successfully generated.",
                ));
                Ok(request.succeed(result))
            }
            Err(err) => {
                log::error!("Error generating passphrase: {}", err);
                let message = err.user_message();
                notifier.notify(Toast::error("Error", "Failed to generate password. Please try again."));
                request.fail(message.clone());
                Err(ControllerError::Request(message))
            }
        }
    }
}
