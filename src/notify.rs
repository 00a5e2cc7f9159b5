//! Notification sink for transient user-facing messages
//!
//! Each notification carries a severity, a title, a body, and a display
//! duration. Titles and durations default per severity and can be overridden
//! per notification; the per-severity durations themselves come from config.
//!
//! The pipeline and views depend on the [`Notifier`] trait; the application
//! wires in a single [`NotificationCenter`].

use chrono::{DateTime, Utc};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tokio::sync::broadcast;

/// Subscriber channel capacity; slow subscribers lag instead of blocking senders
const BROADCAST_CAPACITY: usize = 64;

/// Pending toasts kept before expired ones are pruned, then the oldest dropped
const PENDING_LIMIT: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Info,
    Warn,
}

impl Severity {
    pub fn default_title(&self) -> &'static str {
        match self {
            Severity::Success => "Success",
            Severity::Error => "Error",
            Severity::Info => "Information",
            Severity::Warn => "Warning",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Info => "info",
            Severity::Warn => "warn",
        }
    }
}

/// Display durations per severity
#[derive(Debug, Clone, PartialEq)]
pub struct Durations {
    pub success: Duration,
    pub info: Duration,
    pub warn: Duration,
    pub error: Duration,
}

impl Default for Durations {
    fn default() -> Self {
        Self {
            success: Duration::from_millis(3000),
            info: Duration::from_millis(3000),
            warn: Duration::from_millis(4000),
            error: Duration::from_millis(5000),
        }
    }
}

impl Durations {
    pub fn for_severity(&self, severity: Severity) -> Duration {
        match severity {
            Severity::Success => self.success,
            Severity::Info => self.info,
            Severity::Warn => self.warn,
            Severity::Error => self.error,
        }
    }
}

/// A notification request
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub severity: Severity,
    pub title: String,
    pub body: String,
    /// Explicit display duration; `None` uses the sink's per-severity default
    pub duration: Option<Duration>,
    /// Optional key so a single notification can be cleared
    pub key: Option<String>,
}

impl Notification {
    pub fn new(severity: Severity, body: impl Into<String>) -> Self {
        Self {
            severity,
            title: severity.default_title().to_string(),
            body: body.into(),
            duration: None,
            key: None,
        }
    }

    #[allow(dead_code)]
    pub fn success(body: impl Into<String>) -> Self {
        Self::new(Severity::Success, body)
    }

    pub fn error(body: impl Into<String>) -> Self {
        Self::new(Severity::Error, body)
    }

    #[allow(dead_code)]
    pub fn info(body: impl Into<String>) -> Self {
        Self::new(Severity::Info, body)
    }

    #[allow(dead_code)]
    pub fn warn(body: impl Into<String>) -> Self {
        Self::new(Severity::Warn, body)
    }

    #[allow(dead_code)]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[allow(dead_code)]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    #[allow(dead_code)]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

/// Anything that can display notifications
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);

    /// Clear every pending notification (`None`) or those carrying `key`
    #[allow(dead_code)]
    fn clear(&self, key: Option<&str>);
}

/// A notification accepted by the sink, with its resolved display duration
#[derive(Debug, Clone)]
pub struct Toast {
    pub notification: Notification,
    pub duration: Duration,
    pub timestamp: DateTime<Utc>,
    created_at: Instant,
}

impl Toast {
    /// Whether the display duration has elapsed
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.duration
    }

    /// Single-line rendering: `[HH:MM:SS] Title: body`
    pub fn line(&self) -> String {
        format!(
            "[{}] {}: {}",
            self.timestamp.format("%H:%M:%S"),
            self.notification.title,
            self.notification.body
        )
    }
}

/// In-process notification sink
///
/// Keeps pending toasts in arrival order (no deduplication) and pushes each
/// accepted toast to broadcast subscribers.
pub struct NotificationCenter {
    durations: Durations,
    pending: Mutex<Vec<Toast>>,
    sender: broadcast::Sender<Toast>,
}

impl NotificationCenter {
    pub fn new(durations: Durations) -> Self {
        let (sender, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            durations,
            pending: Mutex::new(Vec::new()),
            sender,
        }
    }

    #[allow(dead_code)]
    pub fn subscribe(&self) -> broadcast::Receiver<Toast> {
        self.sender.subscribe()
    }

    /// Pending toasts that have not expired yet; expired ones are dropped
    #[allow(dead_code)]
    pub fn active(&self) -> Vec<Toast> {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        pending.retain(|toast| !toast.is_expired());
        pending.clone()
    }

    /// Take every pending toast regardless of expiry
    pub fn drain(&self) -> Vec<Toast> {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *pending)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.pending.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(Durations::default())
    }
}

impl Notifier for NotificationCenter {
    fn notify(&self, notification: Notification) {
        let duration = notification
            .duration
            .unwrap_or_else(|| self.durations.for_severity(notification.severity));

        tracing::debug!(
            severity = notification.severity.as_str(),
            title = %notification.title,
            "Notification: {}",
            notification.body
        );

        let toast = Toast {
            notification,
            duration,
            timestamp: Utc::now(),
            created_at: Instant::now(),
        };

        {
            let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
            if pending.len() >= PENDING_LIMIT {
                pending.retain(|toast| !toast.is_expired());
            }
            if pending.len() >= PENDING_LIMIT {
                let excess = pending.len() + 1 - PENDING_LIMIT;
                pending.drain(..excess);
            }
            pending.push(toast.clone());
        }

        // No subscribers is fine
        let _ = self.sender.send(toast);
    }

    fn clear(&self, key: Option<&str>) {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        match key {
            None => pending.clear(),
            Some(key) => pending.retain(|toast| toast.notification.key.as_deref() != Some(key)),
        }
    }
}
