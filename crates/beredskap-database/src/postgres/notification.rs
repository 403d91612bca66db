//! Notification queries.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use beredskap_core::result::AppResult;
use beredskap_core::types::id::{NotificationId, UserId};
use beredskap_entity::notification::{NewNotification, Notification};

use super::{PgStore, db_err};
use crate::store::{DedupOutcome, NotificationStore};

#[async_trait]
impl NotificationStore for PgStore {
    async fn insert_deduplicated(
        &self,
        notification: NewNotification,
        window: Duration,
        now: DateTime<Utc>,
    ) -> AppResult<DedupOutcome> {
        let mut tx = self.pool.begin().await.map_err(db_err("Failed to begin transaction"))?;

        // Serializes concurrent inserts for the same key until commit.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(notification.dedup_key())
            .execute(&mut *tx)
            .await
            .map_err(db_err("Failed to take notification lock"))?;

        let existing = sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE user_id = $1 AND type = $2 \
             AND sender_name IS NOT DISTINCT FROM $3 AND created_at > $4 \
             ORDER BY created_at DESC, id DESC LIMIT 1",
        )
        .bind(notification.user_id)
        .bind(notification.kind)
        .bind(&notification.sender_name)
        .bind(now - window)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err("Failed to look up recent notification"))?;

        if let Some(existing) = existing {
            tx.commit().await?;
            return Ok(DedupOutcome {
                notification: existing,
                created: false,
            });
        }

        let row = notification.into_notification(now);
        let stored = sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (id, user_id, type, title, content, sender_name, action_url, \
             is_read, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
        )
        .bind(row.id)
        .bind(row.user_id)
        .bind(row.kind)
        .bind(&row.title)
        .bind(&row.content)
        .bind(&row.sender_name)
        .bind(&row.action_url)
        .bind(row.is_read)
        .bind(row.created_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err("Failed to insert notification"))?;

        tx.commit().await?;
        Ok(DedupOutcome {
            notification: stored,
            created: true,
        })
    }

    async fn find_notification(&self, id: NotificationId) -> AppResult<Option<Notification>> {
        sqlx::query_as::<_, Notification>("SELECT * FROM notifications WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find notification"))
    }

    async fn list_notifications(
        &self,
        user_id: UserId,
        unread_only: bool,
        limit: i64,
    ) -> AppResult<Vec<Notification>> {
        sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE user_id = $1 AND ($2 = FALSE OR is_read = FALSE) \
             ORDER BY created_at DESC, id DESC LIMIT $3",
        )
        .bind(user_id)
        .bind(unread_only)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to list notifications"))
    }

    async fn mark_notification_read(
        &self,
        id: NotificationId,
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE, read_at = $2 WHERE id = $1 AND is_read = FALSE",
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(db_err("Failed to mark notification read"))?;
        Ok(result.rows_affected())
    }

    async fn mark_all_notifications_read(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE, read_at = $2 WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(db_err("Failed to mark all notifications read"))?;
        Ok(result.rows_affected())
    }

    async fn count_unread_notifications(&self, user_id: UserId) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to count unread notifications"))
    }

    async fn purge_notifications_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM notifications WHERE created_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(db_err("Failed to purge notifications"))?;
        Ok(result.rows_affected())
    }
}
