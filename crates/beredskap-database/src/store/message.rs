//! Message store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use beredskap_core::result::AppResult;
use beredskap_core::types::id::{MessageId, UserId};
use beredskap_entity::message::{Message, MessageFilter};

/// Position in a conversation's (created_at, id) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MessageCursor {
    /// Creation time of the last seen message.
    pub created_at: DateTime<Utc>,
    /// Id of the last seen message.
    pub id: MessageId,
}

impl MessageCursor {
    /// Cursor positioned at `msg`.
    pub fn at(msg: &Message) -> Self {
        Self {
            created_at: msg.created_at,
            id: msg.id,
        }
    }

    /// Whether `msg` sorts after this cursor.
    pub fn precedes(&self, msg: &Message) -> bool {
        *self < Self::at(msg)
    }
}

/// Persistence for chat messages. Every read goes through a [`MessageFilter`].
#[async_trait]
pub trait MessageStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a message.
    async fn insert_message(&self, message: &Message) -> AppResult<Message>;

    /// Find a message by id.
    async fn find_message(&self, id: MessageId) -> AppResult<Option<Message>>;

    /// The most recent `limit` matching messages, oldest first.
    async fn list_messages(&self, filter: &MessageFilter, limit: i64) -> AppResult<Vec<Message>>;

    /// Up to `limit` matching messages after `cursor`, oldest first.
    async fn list_messages_after(
        &self,
        filter: &MessageFilter,
        cursor: MessageCursor,
        limit: i64,
    ) -> AppResult<Vec<Message>>;

    /// Mark one message read. Returns rows changed.
    async fn mark_message_read(&self, id: MessageId, now: DateTime<Utc>) -> AppResult<u64>;

    /// Mark every unread matching message not sent by `reader` read.
    async fn mark_conversation_read(
        &self,
        filter: &MessageFilter,
        reader: UserId,
        now: DateTime<Utc>,
    ) -> AppResult<u64>;

    /// Unread matching messages not sent by `reader`.
    async fn count_unread_messages(&self, filter: &MessageFilter, reader: UserId)
    -> AppResult<i64>;
}
