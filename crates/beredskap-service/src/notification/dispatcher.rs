//! Notification dispatcher: persists deduplicated notifications and serves
//! a user's inbox.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use beredskap_core::config::NotificationConfig;
use beredskap_core::error::AppError;
use beredskap_core::events::DomainEvent;
use beredskap_core::result::AppResult;
use beredskap_core::types::id::NotificationId;
use beredskap_database::store::{DedupOutcome, NotificationStore};
use beredskap_entity::notification::{NewNotification, Notification};

use super::formatter::NotificationFormatter;
use crate::context::RequestContext;
use crate::validation::page_limit;

/// Turns domain events into notifications, at most one per
/// (user, sender name, type) inside the dedup window.
#[derive(Debug, Clone)]
pub struct NotificationDispatcher {
    /// Notification store.
    store: Arc<dyn NotificationStore>,
    /// Dedup window, retention, and page size.
    config: NotificationConfig,
}

impl NotificationDispatcher {
    /// Creates a new notification dispatcher.
    pub fn new(store: Arc<dyn NotificationStore>, config: NotificationConfig) -> Self {
        Self { store, config }
    }

    /// Create one notification unless a duplicate exists inside the window,
    /// in which case the existing one is returned unchanged.
    pub async fn notify_user(&self, notification: NewNotification) -> AppResult<DedupOutcome> {
        let key = notification.dedup_key();
        let outcome = self
            .store
            .insert_deduplicated(notification, self.config.dedup_window(), Utc::now())
            .await?;
        if outcome.created {
            debug!(
                notification_id = %outcome.notification.id,
                user_id = %outcome.notification.user_id,
                kind = %outcome.notification.kind,
                "Notification created"
            );
        } else {
            debug!(key = %key, "Duplicate notification suppressed");
        }
        Ok(outcome)
    }

    /// Notify every recipient of `event`. Returns the stored notifications.
    pub async fn notify(&self, event: &DomainEvent) -> AppResult<Vec<Notification>> {
        let pending = NotificationFormatter::format(event);
        let mut stored = Vec::with_capacity(pending.len());
        for notification in pending {
            stored.push(self.notify_user(notification).await?.notification);
        }
        Ok(stored)
    }

    /// Notify without failing the caller. Errors are logged and dropped.
    pub async fn dispatch(&self, event: &DomainEvent) {
        if let Err(e) = self.notify(event).await {
            warn!(
                event_id = %event.id,
                actor_id = %event.actor_id,
                error = %e,
                "Notification dispatch failed"
            );
        }
    }

    /// The caller's notifications, newest first.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        unread_only: bool,
        limit: Option<u32>,
    ) -> AppResult<Vec<Notification>> {
        self.store
            .list_notifications(
                ctx.user_id,
                unread_only,
                page_limit(limit, self.config.list_limit),
            )
            .await
    }

    /// Marks one of the caller's notifications read. Idempotent.
    pub async fn mark_read(&self, ctx: &RequestContext, id: NotificationId) -> AppResult<u64> {
        let notification = self
            .store
            .find_notification(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Notification {id} not found")))?;
        if !ctx.is(notification.user_id) {
            return Err(AppError::authorization(
                "Cannot mark another user's notification",
            ));
        }
        self.store.mark_notification_read(id, Utc::now()).await
    }

    /// Marks all of the caller's notifications read. Idempotent.
    pub async fn mark_all_read(&self, ctx: &RequestContext) -> AppResult<u64> {
        let changed = self
            .store
            .mark_all_notifications_read(ctx.user_id, Utc::now())
            .await?;
        info!(user_id = %ctx.user_id, changed, "Marked all notifications read");
        Ok(changed)
    }

    /// Committed unread count. Never cached.
    pub async fn unread_count(&self, ctx: &RequestContext) -> AppResult<i64> {
        self.store.count_unread_notifications(ctx.user_id).await
    }

    /// Deletes notifications older than `days` days.
    pub async fn purge_older_than(&self, days: u32) -> AppResult<u64> {
        let cutoff = Utc::now() - chrono::Duration::days(i64::from(days));
        let purged = self.store.purge_notifications_before(cutoff).await?;
        info!(days, purged, "Purged old notifications");
        Ok(purged)
    }

    /// Run the retention purge every `every`, using the configured retention.
    pub fn spawn_retention(self: Arc<Self>, every: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                if let Err(e) = self.purge_older_than(self.config.retention_days).await {
                    error!(error = %e, "Notification retention purge failed");
                }
            }
        })
    }
}
