//! Chat message entity model.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

use beredskap_core::types::id::{CommunityId, MessageId, UserId};

use super::target::MessageTarget;

/// A persisted chat message.
///
/// The address is a [`MessageTarget`], so a message carries exactly one of
/// recipient and community. Rows violating that fail to decode.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "MessageRecord")]
pub struct Message {
    /// Unique message identifier.
    pub id: MessageId,
    /// Author.
    pub sender_id: UserId,
    /// Message body.
    pub content: String,
    target: MessageTarget,
    /// Flagged as an emergency by the sender.
    pub is_emergency: bool,
    /// Whether the message has been read.
    pub is_read: bool,
    /// When the message was read.
    pub read_at: Option<DateTime<Utc>>,
    /// When the message was sent.
    pub created_at: DateTime<Utc>,
}

/// Wire and row shape of a message.
#[derive(Serialize)]
struct MessageRecord {
    id: MessageId,
    sender_id: UserId,
    content: String,
    recipient_id: Option<UserId>,
    community_id: Option<CommunityId>,
    is_emergency: bool,
    is_read: bool,
    read_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<Message> for MessageRecord {
    fn from(msg: Message) -> Self {
        Self {
            id: msg.id,
            sender_id: msg.sender_id,
            content: msg.content,
            recipient_id: msg.target.recipient_id(),
            community_id: msg.target.community_id(),
            is_emergency: msg.is_emergency,
            is_read: msg.is_read,
            read_at: msg.read_at,
            created_at: msg.created_at,
        }
    }
}

impl Message {
    /// Build an unread message addressed to `target`.
    pub fn new(
        sender_id: UserId,
        content: String,
        target: MessageTarget,
        is_emergency: bool,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: MessageId::new(),
            sender_id,
            content,
            target,
            is_emergency,
            is_read: false,
            read_at: None,
            created_at: now,
        }
    }

    /// The message's address.
    pub fn target(&self) -> MessageTarget {
        self.target
    }

    /// Recipient of a direct message.
    pub fn recipient_id(&self) -> Option<UserId> {
        self.target.recipient_id()
    }

    /// Community of a community message.
    pub fn community_id(&self) -> Option<CommunityId> {
        self.target.community_id()
    }

    /// Mark read at `now`. Returns false when already read.
    pub fn mark_read(&mut self, now: DateTime<Utc>) -> bool {
        if self.is_read {
            return false;
        }
        self.is_read = true;
        self.read_at = Some(now);
        true
    }

    /// Short preview used in notification bodies.
    pub fn preview(&self, max_chars: usize) -> String {
        let mut chars = self.content.chars();
        let head: String = chars.by_ref().take(max_chars).collect();
        if chars.next().is_some() {
            format!("{head}...")
        } else {
            head
        }
    }
}

impl<'r> FromRow<'r, PgRow> for Message {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let recipient_id: Option<UserId> = row.try_get("recipient_id")?;
        let community_id: Option<CommunityId> = row.try_get("community_id")?;
        let target = match (recipient_id, community_id) {
            (Some(user_id), None) => MessageTarget::Direct(user_id),
            (None, Some(community_id)) => MessageTarget::Community(community_id),
            _ => {
                return Err(sqlx::Error::ColumnDecode {
                    index: "recipient_id".to_string(),
                    source: "message must have exactly one of recipient_id and community_id"
                        .into(),
                });
            }
        };

        Ok(Self {
            id: row.try_get("id")?,
            sender_id: row.try_get("sender_id")?,
            content: row.try_get("content")?,
            target,
            is_emergency: row.try_get("is_emergency")?,
            is_read: row.try_get("is_read")?,
            read_at: row.try_get("read_at")?,
            created_at: row.try_get("created_at")?,
        })
    }
}
