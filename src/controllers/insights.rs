// src/controllers/insights.rs
use crate::api::types::InsightsResult;
use crate::api::{ApiClient, RetryPolicy};

use super::{ControllerError, PageState};

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load security insights. Please try again later.";

/// Insights are decoration: failures are logged and the section is hidden,
/// no toast is raised.
pub struct InsightsController {
    client: ApiClient,
    retry: RetryPolicy,
    state: PageState<InsightsResult>,
}

impl InsightsController {
    pub fn new(client: ApiClient, retry: RetryPolicy) -> Self {
        Self {
            client,
            retry,
            state: PageState::default(),
        }
    }

    pub fn state(&self) -> &PageState<InsightsResult> {
        &self.state
    }

    pub async fn load(&mut self) -> Result<&InsightsResult, ControllerError> {
        let request = self.state.begin()?;

        let client = &self.client;
        match self.retry.run(|| client.insights()).await {
            Ok(result) => {
                log::info!("Loaded {} insight(s)", result.insights.len());
                Ok(request.succeed(result))
            }
            Err(err) => {
                log::error!("Error fetching insights: {}", err);
                request.fail_and_clear(LOAD_FAILED_MESSAGE);
                Err(ControllerError::Request(LOAD_FAILED_MESSAGE.to_string()))
            }
        }
    }
}
