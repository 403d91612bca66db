//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use beredskap_core::types::id::{NotificationId, UserId};

use super::kind::NotificationKind;

/// A notification delivered to one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: NotificationId,
    /// The recipient user.
    pub user_id: UserId,
    /// Notification type.
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: NotificationKind,
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub content: String,
    /// Display name of whoever caused it.
    pub sender_name: Option<String>,
    /// Client route to open.
    pub action_url: Option<String>,
    /// Whether the user has read this notification.
    pub is_read: bool,
    /// When the notification was read.
    pub read_at: Option<DateTime<Utc>>,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Check if the notification has been read.
    pub fn is_unread(&self) -> bool {
        !self.is_read
    }
}

/// A notification about to be created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewNotification {
    /// The recipient user.
    pub user_id: UserId,
    /// Notification type.
    pub kind: NotificationKind,
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub content: String,
    /// Display name of whoever caused it.
    pub sender_name: Option<String>,
    /// Client route to open.
    pub action_url: Option<String>,
}

impl NewNotification {
    /// Key under which concurrent inserts are serialized.
    ///
    /// Two notifications collide when user, sender name, and type are equal.
    pub fn dedup_key(&self) -> String {
        format!(
            "notification:{}:{}:{}",
            self.user_id,
            self.sender_name.as_deref().unwrap_or(""),
            self.kind
        )
    }

    /// Whether `existing` is a duplicate of this notification.
    pub fn duplicates(&self, existing: &Notification) -> bool {
        existing.user_id == self.user_id
            && existing.kind == self.kind
            && existing.sender_name == self.sender_name
    }

    /// Materialize the unread row this insert will produce.
    pub fn into_notification(self, now: DateTime<Utc>) -> Notification {
        Notification {
            id: NotificationId::new(),
            user_id: self.user_id,
            kind: self.kind,
            title: self.title,
            content: self.content,
            sender_name: self.sender_name,
            action_url: self.action_url,
            is_read: false,
            read_at: None,
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new(kind: NotificationKind, sender: Option<&str>) -> NewNotification {
        NewNotification {
            user_id: UserId::new(),
            kind,
            title: "Ny förfrågan".into(),
            content: "Anna vill låna tält".into(),
            sender_name: sender.map(String::from),
            action_url: None,
        }
    }

    #[test]
    fn test_dedup_key_distinguishes_type_and_sender() {
        let a = new(NotificationKind::Message, Some("Anna"));
        let mut b = a.clone();
        assert_eq!(a.dedup_key(), b.dedup_key());

        b.kind = NotificationKind::Emergency;
        assert_ne!(a.dedup_key(), b.dedup_key());

        let mut c = a.clone();
        c.sender_name = Some("Bo".into());
        assert_ne!(a.dedup_key(), c.dedup_key());
    }

    #[test]
    fn test_duplicates() {
        let n = new(NotificationKind::ResourceRequest, Some("Anna"));
        let stored = n.clone().into_notification(Utc::now());
        assert!(n.duplicates(&stored));
        assert!(!new(NotificationKind::ResourceRequest, None).duplicates(&stored));
    }

    #[test]
    fn test_serializes_kind_as_type() {
        let stored = new(NotificationKind::ResourceRequest, None).into_notification(Utc::now());
        let json = serde_json::to_value(&stored).unwrap();
        assert_eq!(json["type"], "resource_request");
        assert_eq!(json["is_read"], false);
    }
}
