//! Notification store.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use beredskap_core::result::AppResult;
use beredskap_core::types::id::{NotificationId, UserId};
use beredskap_entity::notification::{NewNotification, Notification};

/// Result of a deduplicated insert.
#[derive(Debug, Clone)]
pub struct DedupOutcome {
    /// The stored notification, new or pre-existing.
    pub notification: Notification,
    /// False when an existing notification inside the window was returned.
    pub created: bool,
}

/// Persistence for notifications.
#[async_trait]
pub trait NotificationStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert unless a notification with the same user, sender name, and
    /// type was created after `now - window`. Atomic per dedup key.
    async fn insert_deduplicated(
        &self,
        notification: NewNotification,
        window: Duration,
        now: DateTime<Utc>,
    ) -> AppResult<DedupOutcome>;

    /// Find a notification by id.
    async fn find_notification(&self, id: NotificationId) -> AppResult<Option<Notification>>;

    /// A user's notifications, newest first.
    async fn list_notifications(
        &self,
        user_id: UserId,
        unread_only: bool,
        limit: i64,
    ) -> AppResult<Vec<Notification>>;

    /// Mark one notification read. Returns rows changed.
    async fn mark_notification_read(&self, id: NotificationId, now: DateTime<Utc>)
    -> AppResult<u64>;

    /// Mark all of a user's notifications read. Returns rows changed.
    async fn mark_all_notifications_read(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> AppResult<u64>;

    /// Committed unread count.
    async fn count_unread_notifications(&self, user_id: UserId) -> AppResult<i64>;

    /// Delete notifications created before `cutoff`. Returns rows deleted.
    async fn purge_notifications_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64>;
}
