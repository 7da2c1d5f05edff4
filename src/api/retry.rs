// src/api/retry.rs
use std::future::Future;
use std::time::Duration;

use super::error::ApiError;

/// Linear retry for requests that never got a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, retry_delay: Duration) -> Self {
        Self { max_retries, retry_delay }
    }

    pub async fn run<T, F, Fut>(&self, request: F) -> Result<T, ApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        self.run_with_notify(request, |_, _| {}).await
    }

    /// Run `request` until it succeeds, fails for a non-network reason, or
    /// `max_retries` attempts have been made.
    ///
    /// `on_retry(attempt, max_retries)` fires before each wait, with attempt
    /// numbers starting at 1.
    pub async fn run_with_notify<T, F, Fut, R>(&self, mut request: F, mut on_retry: R) -> Result<T, ApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
        R: FnMut(u32, u32),
    {
        let mut attempt: u32 = 0;

        loop {
            let err = match request().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            attempt += 1;

            if attempt >= self.max_retries || !err.is_retryable() {
                if err.is_retryable() {
                    log::warn!("Giving up after {} attempt(s): {}", attempt, err);
                }
                return Err(err);
            }

            log::info!("Retrying request ({}/{}) after: {}", attempt, self.max_retries, err);
            on_retry(attempt, self.max_retries);

            tokio::time::sleep(self.retry_delay).await;
        }
    }
}
