use crate::core::polyline::Precision;
use crate::core::retry::RetryPolicy;
use crate::domain::model::{DirectionsRequest, DirectionsResponse};
use crate::utils::error::DirectionsError;
use async_trait::async_trait;
use std::time::Duration;

/// Source of directions. One production implementation talks to the HTTP
/// API; the scripted one replays canned replies for tests.
#[async_trait]
pub trait DirectionsRepository: Send + Sync {
    /// Issues at most one outbound call. Never retries.
    async fn fetch(
        &self,
        request: &DirectionsRequest,
    ) -> Result<DirectionsResponse, DirectionsError>;

    /// Precision the returned geometries are encoded with.
    fn precision(&self) -> Precision {
        Precision::FIVE
    }
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn access_token(&self) -> Option<&str>;
    fn timeout(&self) -> Duration;
    fn precision(&self) -> Precision;
    fn retry_policy(&self) -> RetryPolicy;
}
