use crate::core::polyline::Precision;
use crate::domain::model::{DirectionsRequest, DirectionsResponse};
use crate::domain::ports::DirectionsRepository;
use crate::utils::error::DirectionsError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

struct ScriptedReply {
    delay: Duration,
    outcome: Result<DirectionsResponse, DirectionsError>,
}

/// In-memory repository that replays queued replies in order.
///
/// Clones share the same script and request log.
#[derive(Clone)]
pub struct ScriptedDirections {
    replies: Arc<Mutex<VecDeque<ScriptedReply>>>,
    requests: Arc<Mutex<Vec<DirectionsRequest>>>,
    completed: Arc<AtomicUsize>,
    precision: Precision,
}

impl ScriptedDirections {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            completed: Arc::new(AtomicUsize::new(0)),
            precision: Precision::FIVE,
        }
    }

    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    pub async fn push_reply(&self, outcome: Result<DirectionsResponse, DirectionsError>) {
        self.push_delayed_reply(Duration::ZERO, outcome).await;
    }

    /// The reply is returned only after `delay`, simulating a slow network.
    pub async fn push_delayed_reply(
        &self,
        delay: Duration,
        outcome: Result<DirectionsResponse, DirectionsError>,
    ) {
        self.replies
            .lock()
            .await
            .push_back(ScriptedReply { delay, outcome });
    }

    pub async fn requests(&self) -> Vec<DirectionsRequest> {
        self.requests.lock().await.clone()
    }

    /// Fetches that ran to completion, i.e. were not aborted mid-delay.
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

impl Default for ScriptedDirections {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DirectionsRepository for ScriptedDirections {
    async fn fetch(
        &self,
        request: &DirectionsRequest,
    ) -> Result<DirectionsResponse, DirectionsError> {
        self.requests.lock().await.push(request.clone());

        // 先取出回覆再釋放鎖，延遲期間不佔用
        let reply = self.replies.lock().await.pop_front();
        let Some(reply) = reply else {
            return Err(DirectionsError::transport("no scripted reply left"));
        };

        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }
        self.completed.fetch_add(1, Ordering::SeqCst);
        reply.outcome
    }

    fn precision(&self) -> Precision {
        self.precision
    }
}
