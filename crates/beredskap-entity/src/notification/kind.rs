//! Notification type enumeration.

use serde::{Deserialize, Serialize};

/// Type of a notification. Part of the deduplication key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A new chat message.
    Message,
    /// Someone requested one of the user's offers.
    ResourceRequest,
    /// A message flagged as an emergency.
    Emergency,
    /// Request outcomes and other system notices.
    System,
}

impl NotificationKind {
    /// Return the kind as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::ResourceRequest => "resource_request",
            Self::Emergency => "emergency",
            Self::System => "system",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
