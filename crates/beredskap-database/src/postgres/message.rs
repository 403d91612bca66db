//! Message queries.
//!
//! Every read and bulk update is scoped by the same WHERE fragment built from
//! a [`MessageFilter`], so community rows never leak into a direct
//! conversation or the other way round.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use beredskap_core::result::AppResult;
use beredskap_core::types::id::{MessageId, UserId};
use beredskap_entity::message::{Message, MessageFilter};

use super::{PgStore, db_err};
use crate::store::{MessageCursor, MessageStore};

/// WHERE fragment for `filter` using placeholders `$1..`, plus its binds.
fn filter_sql(filter: &MessageFilter) -> (&'static str, Vec<Uuid>) {
    match *filter {
        MessageFilter::Direct { user_id, peer_id } => (
            "community_id IS NULL AND ((sender_id = $1 AND recipient_id = $2) \
             OR (sender_id = $2 AND recipient_id = $1))",
            vec![user_id.into_uuid(), peer_id.into_uuid()],
        ),
        MessageFilter::Community { community_id } => (
            "recipient_id IS NULL AND community_id = $1",
            vec![community_id.into_uuid()],
        ),
    }
}

#[async_trait]
impl MessageStore for PgStore {
    async fn insert_message(&self, message: &Message) -> AppResult<Message> {
        sqlx::query_as::<_, Message>(
            "INSERT INTO messages (id, sender_id, content, recipient_id, community_id, is_emergency, \
             is_read, read_at, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
        )
        .bind(message.id)
        .bind(message.sender_id)
        .bind(&message.content)
        .bind(message.recipient_id())
        .bind(message.community_id())
        .bind(message.is_emergency)
        .bind(message.is_read)
        .bind(message.read_at)
        .bind(message.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to insert message"))
    }

    async fn find_message(&self, id: MessageId) -> AppResult<Option<Message>> {
        sqlx::query_as::<_, Message>("SELECT * FROM messages WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find message"))
    }

    async fn list_messages(&self, filter: &MessageFilter, limit: i64) -> AppResult<Vec<Message>> {
        let (clause, binds) = filter_sql(filter);
        let n = binds.len();
        let sql = format!(
            "SELECT * FROM (SELECT * FROM messages WHERE {clause} \
             ORDER BY created_at DESC, id DESC LIMIT ${}) recent \
             ORDER BY created_at ASC, id ASC",
            n + 1
        );
        let mut query = sqlx::query_as::<_, Message>(&sql);
        for id in binds {
            query = query.bind(id);
        }
        query
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err("Failed to list messages"))
    }

    async fn list_messages_after(
        &self,
        filter: &MessageFilter,
        cursor: MessageCursor,
        limit: i64,
    ) -> AppResult<Vec<Message>> {
        let (clause, binds) = filter_sql(filter);
        let n = binds.len();
        let sql = format!(
            "SELECT * FROM messages WHERE {clause} AND (created_at, id) > (${}, ${}) \
             ORDER BY created_at ASC, id ASC LIMIT ${}",
            n + 1,
            n + 2,
            n + 3
        );
        let mut query = sqlx::query_as::<_, Message>(&sql);
        for id in binds {
            query = query.bind(id);
        }
        query
            .bind(cursor.created_at)
            .bind(cursor.id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err("Failed to replay messages"))
    }

    async fn mark_message_read(&self, id: MessageId, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE messages SET is_read = TRUE, read_at = $2 WHERE id = $1 AND is_read = FALSE",
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(db_err("Failed to mark message read"))?;
        Ok(result.rows_affected())
    }

    async fn mark_conversation_read(
        &self,
        filter: &MessageFilter,
        reader: UserId,
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        let (clause, binds) = filter_sql(filter);
        let n = binds.len();
        let sql = format!(
            "UPDATE messages SET is_read = TRUE, read_at = ${} \
             WHERE {clause} AND is_read = FALSE AND sender_id <> ${}",
            n + 1,
            n + 2
        );
        let mut query = sqlx::query(&sql);
        for id in binds {
            query = query.bind(id);
        }
        let result = query
            .bind(now)
            .bind(reader)
            .execute(&self.pool)
            .await
            .map_err(db_err("Failed to mark conversation read"))?;
        Ok(result.rows_affected())
    }

    async fn count_unread_messages(
        &self,
        filter: &MessageFilter,
        reader: UserId,
    ) -> AppResult<i64> {
        let (clause, binds) = filter_sql(filter);
        let sql = format!(
            "SELECT COUNT(*) FROM messages WHERE {clause} AND is_read = FALSE AND sender_id <> ${}",
            binds.len() + 1
        );
        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        for id in binds {
            query = query.bind(id);
        }
        query
            .bind(reader)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err("Failed to count unread messages"))
    }
}
