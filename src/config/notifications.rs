//! Notification display durations, in milliseconds per severity

use serde::Deserialize;
use std::time::Duration;

use crate::notify::Durations;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationsConfig {
    pub success_ms: u64,
    pub info_ms: u64,
    pub warn_ms: u64,
    pub error_ms: u64,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        let d = Durations::default();
        Self {
            success_ms: d.success.as_millis() as u64,
            info_ms: d.info.as_millis() as u64,
            warn_ms: d.warn.as_millis() as u64,
            error_ms: d.error.as_millis() as u64,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileNotifications {
    pub success_ms: Option<u64>,
    pub info_ms: Option<u64>,
    pub warn_ms: Option<u64>,
    pub error_ms: Option<u64>,
}

impl NotificationsConfig {
    pub fn from_file(file: Option<FileNotifications>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            success_ms: file.success_ms.unwrap_or(defaults.success_ms),
            info_ms: file.info_ms.unwrap_or(defaults.info_ms),
            warn_ms: file.warn_ms.unwrap_or(defaults.warn_ms),
            error_ms: file.error_ms.unwrap_or(defaults.error_ms),
        }
    }

    pub fn durations(&self) -> Durations {
        Durations {
            success: Duration::from_millis(self.success_ms),
            info: Duration::from_millis(self.info_ms),
            warn: Duration::from_millis(self.warn_ms),
            error: Duration::from_millis(self.error_ms),
        }
    }
}
