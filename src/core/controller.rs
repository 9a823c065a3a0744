//! Last-request-wins ownership of the in-flight directions request.
//!
//! A button press calls [`RouteController::submit`]. The previous task, if
//! any, is aborted and a new one spawned under a fresh generation number.
//! A task publishes its outcome only while holding the generation lock and
//! only if its generation is still current, so once `submit` returns no
//! older result can reach the receiver.

use crate::core::pipeline::RoutePipeline;
use crate::domain::model::{DirectionsRequest, DisplayPath};
use crate::domain::ports::DirectionsRepository;
use crate::utils::error::DirectionsError;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[derive(Debug)]
pub struct RouteUpdate {
    pub generation: u64,
    pub outcome: Result<DisplayPath, DirectionsError>,
}

struct InFlight {
    generation: u64,
    handle: JoinHandle<()>,
}

pub struct RouteController<R: DirectionsRepository + 'static> {
    pipeline: Arc<RoutePipeline<R>>,
    current: Arc<Mutex<u64>>,
    in_flight: Option<InFlight>,
    updates: mpsc::UnboundedSender<RouteUpdate>,
}

impl<R: DirectionsRepository + 'static> RouteController<R> {
    /// Returns the controller and the receiving end the renderer listens on.
    pub fn new(pipeline: RoutePipeline<R>) -> (Self, mpsc::UnboundedReceiver<RouteUpdate>) {
        let (updates, receiver) = mpsc::unbounded_channel();
        let controller = Self {
            pipeline: Arc::new(pipeline),
            current: Arc::new(Mutex::new(0)),
            in_flight: None,
            updates,
        };
        (controller, receiver)
    }

    /// Starts a request, superseding whatever is in flight. Must be called
    /// from within a tokio runtime.
    pub fn submit(&mut self, request: DirectionsRequest) -> u64 {
        let generation = self.advance();
        self.abort_in_flight();

        let pipeline = Arc::clone(&self.pipeline);
        let current = Arc::clone(&self.current);
        let updates = self.updates.clone();

        let handle = tokio::spawn(async move {
            let outcome = pipeline.run(&request).await;
            if let Err(e) = &outcome {
                tracing::warn!("Route request #{} failed: {}", generation, e);
            }

            let Ok(latest) = current.lock() else {
                return;
            };
            if *latest != generation {
                tracing::debug!("Dropping stale route result #{}", generation);
                return;
            }
            // 接收端已關閉代表畫面不再需要結果
            let _ = updates.send(RouteUpdate {
                generation,
                outcome,
            });
        });

        self.in_flight = Some(InFlight { generation, handle });
        generation
    }

    /// Aborts the in-flight request without starting a new one.
    pub fn cancel(&mut self) {
        self.advance();
        self.abort_in_flight();
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
            .as_ref()
            .map(|f| !f.handle.is_finished())
            .unwrap_or(false)
    }

    pub fn current_generation(&self) -> u64 {
        self.current.lock().map(|g| *g).unwrap_or_default()
    }

    fn advance(&self) -> u64 {
        match self.current.lock() {
            Ok(mut generation) => {
                *generation += 1;
                *generation
            }
            Err(poisoned) => {
                let mut generation = poisoned.into_inner();
                *generation += 1;
                *generation
            }
        }
    }

    fn abort_in_flight(&mut self) {
        if let Some(previous) = self.in_flight.take() {
            if !previous.handle.is_finished() {
                tracing::debug!("Cancelling stale route request #{}", previous.generation);
            }
            previous.handle.abort();
        }
    }
}

impl<R: DirectionsRepository + 'static> Drop for RouteController<R> {
    fn drop(&mut self) {
        self.abort_in_flight();
    }
}
