// Request pipeline - wraps every outbound backend call
//
// For each call:
// 1. begin() on the request tracker (RequestGuard)
// 2. await the call future
// 3. on failure: classify, publish an error notification, return the
//    classified error (never the raw transport error)
// 4. end() on the tracker when the guard drops, on every exit path
//
// The call future must be lazy (an async block): nothing goes on the wire
// until the pipeline polls it, which is after begin().

use std::future::Future;
use std::sync::Arc;

use super::error::{ApiError, Failure};
use crate::notify::{Notification, Notifier};
use crate::tracker::{RequestGuard, RequestTracker};

#[derive(Clone)]
pub struct RequestPipeline {
    tracker: Arc<dyn RequestTracker>,
    notifier: Arc<dyn Notifier>,
}

impl RequestPipeline {
    pub fn new(tracker: Arc<dyn RequestTracker>, notifier: Arc<dyn Notifier>) -> Self {
        Self { tracker, notifier }
    }

    /// Run one backend call through the pipeline
    pub async fn run<T, F>(&self, method: &str, url: &str, call: F) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, Failure>>,
    {
        let _guard = RequestGuard::begin(self.tracker.clone());
        tracing::debug!(method, url, "Request started");

        match call.await {
            Ok(value) => {
                tracing::debug!(method, url, "Request succeeded");
                Ok(value)
            }
            Err(failure) => {
                let error = ApiError::classify(&failure);
                tracing::warn!(
                    method,
                    url,
                    status = failure.status,
                    "Request failed: {}",
                    error
                );
                if let Some(detail) = &failure.detail {
                    tracing::debug!(method, url, "Transport detail: {}", detail);
                }
                self.notifier.notify(Notification::error(error.to_string()));
                Err(error)
            }
        }
    }
}
