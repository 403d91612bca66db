//! Notification dispatcher configuration.

use serde::{Deserialize, Serialize};

/// Settings for notification creation and retention.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Window within which identical (user, sender, type) events collapse
    /// into one stored notification.
    #[serde(default = "default_dedup_window")]
    pub dedup_window_seconds: u64,
    /// Number of days after which notifications may be purged.
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
    /// Default page size for notification listings.
    #[serde(default = "default_list_limit")]
    pub list_limit: u32,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            dedup_window_seconds: default_dedup_window(),
            retention_days: default_retention_days(),
            list_limit: default_list_limit(),
        }
    }
}

impl NotificationConfig {
    /// The dedup window as a `chrono::Duration`.
    pub fn dedup_window(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.dedup_window_seconds as i64)
    }
}

fn default_dedup_window() -> u64 {
    5
}

fn default_retention_days() -> u32 {
    30
}

fn default_list_limit() -> u32 {
    50
}
