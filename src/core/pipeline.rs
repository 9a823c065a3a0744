use crate::core::normalizer;
use crate::core::presenter;
use crate::core::retry::{fetch_with_retry, RetryPolicy};
use crate::domain::model::{DirectionsRequest, DisplayPath, Profile};
use crate::domain::ports::DirectionsRepository;
use crate::utils::error::DirectionsError;

/// normalize → fetch → decode → present
pub struct RoutePipeline<R: DirectionsRepository> {
    repository: R,
    retry: RetryPolicy,
}

impl<R: DirectionsRepository> RoutePipeline<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            retry: RetryPolicy::none(),
        }
    }

    pub fn with_retry(repository: R, retry: RetryPolicy) -> Self {
        Self { repository, retry }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub async fn run(&self, request: &DirectionsRequest) -> Result<DisplayPath, DirectionsError> {
        tracing::info!(
            "Requesting {} directions {} -> {}",
            request.profile(),
            request.origin(),
            request.destination()
        );

        let response = fetch_with_retry(&self.repository, request, self.retry).await?;
        tracing::debug!(
            "Directions response {:?} with {} route(s)",
            response.status,
            response.routes.len()
        );

        let path = presenter::present_best(&response, self.repository.precision())?;
        tracing::info!(
            "Route ready: {} points, {:.0} m, {:.0} s",
            path.points.len(),
            path.distance_m,
            path.duration_s
        );
        Ok(path)
    }

    /// 從兩個輸入欄位的文字直接規劃路線
    pub async fn plan(
        &self,
        start: &str,
        end: &str,
        profile: Profile,
    ) -> Result<DisplayPath, DirectionsError> {
        let request = normalizer::normalize(start, end, profile)?;
        self.run(&request).await
    }
}
