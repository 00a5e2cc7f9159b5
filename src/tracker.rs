// Global request tracker - aggregate busy/idle signal for in-flight requests
//
// One tracker is constructed at startup and shared (Arc) with the request
// pipeline. Views and the CLI read the busy flag or subscribe to transitions.
//
// Invariant: busy == (in_flight > 0) after every begin()/end(), including
// overlapping requests and end() calls coming from failure paths.

use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// Counter of in-flight requests with a derived busy flag
pub trait RequestTracker: Send + Sync {
    /// A request started
    fn begin(&self);

    /// A request finished (success, failure, or cancellation). Clamped at zero.
    fn end(&self);

    /// Number of requests currently in flight
    fn in_flight(&self) -> usize;

    fn is_busy(&self) -> bool {
        self.in_flight() > 0
    }
}

/// Default tracker: mutex-guarded counter plus a watch channel for transitions
#[derive(Debug)]
pub struct LoadingTracker {
    count: Mutex<usize>,
    busy: watch::Sender<bool>,
}

impl LoadingTracker {
    pub fn new() -> Self {
        let (busy, _) = watch::channel(false);
        Self {
            count: Mutex::new(0),
            busy,
        }
    }

    /// Receiver that is notified only when busy flips
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.busy.subscribe()
    }

    /// Publish the busy flag derived from `count`. Caller holds the count lock,
    /// so the published value can never disagree with the counter.
    fn publish(&self, count: usize) {
        let busy = count > 0;
        let changed = self.busy.send_if_modified(|current| {
            if *current != busy {
                *current = busy;
                true
            } else {
                false
            }
        });
        if changed {
            tracing::trace!(busy, in_flight = count, "Request tracker transition");
        }
    }
}

impl Default for LoadingTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestTracker for LoadingTracker {
    fn begin(&self) {
        let mut count = self.count.lock().unwrap_or_else(|e| e.into_inner());
        *count += 1;
        self.publish(*count);
    }

    fn end(&self) {
        let mut count = self.count.lock().unwrap_or_else(|e| e.into_inner());
        if *count == 0 {
            tracing::debug!("Request tracker end() without matching begin(), clamped at zero");
        }
        *count = count.saturating_sub(1);
        self.publish(*count);
    }

    fn in_flight(&self) -> usize {
        *self.count.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Scoped begin/end pair: `begin()` on construction, `end()` on drop
///
/// Drop runs on every exit path of the owning future, so the tracker is
/// released on success, on error, on panic unwinding, and when the future is
/// dropped before completion.
#[must_use = "dropping the guard immediately ends the tracked request"]
pub struct RequestGuard {
    tracker: Arc<dyn RequestTracker>,
}

impl RequestGuard {
    pub fn begin(tracker: Arc<dyn RequestTracker>) -> Self {
        tracker.begin();
        Self { tracker }
    }
}

impl Drop for RequestGuard {
    fn drop(&mut self) {
        self.tracker.end();
    }
}
