use crate::domain::model::{DirectionsRequest, DirectionsResponse};
use crate::domain::ports::DirectionsRepository;
use crate::utils::error::DirectionsError;
use std::time::Duration;

/// Caller-side retry for server and transport failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one.
    pub attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            attempts: 0,
            delay: Duration::ZERO,
        }
    }

    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self { attempts, delay }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

pub async fn fetch_with_retry<R: DirectionsRepository + ?Sized>(
    repository: &R,
    request: &DirectionsRequest,
    policy: RetryPolicy,
) -> Result<DirectionsResponse, DirectionsError> {
    let mut attempt = 0;
    loop {
        match repository.fetch(request).await {
            Ok(response) => return Ok(response),
            Err(e) if e.is_retryable() && attempt < policy.attempts => {
                attempt += 1;
                tracing::warn!(
                    "⚠️ Directions fetch failed ({}), retry {}/{} in {:?}",
                    e,
                    attempt,
                    policy.attempts,
                    policy.delay
                );
                tokio::time::sleep(policy.delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
