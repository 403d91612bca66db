//! Chat message domain events.

use serde::{Deserialize, Serialize};

use crate::types::id::{CommunityId, MessageId, UserId};

/// Events emitted when a chat message is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MessageEvent {
    /// A direct message between two users.
    DirectSent {
        /// The stored message.
        message_id: MessageId,
        /// Sender.
        sender_id: UserId,
        /// Display name of the sender.
        sender_name: String,
        /// Recipient.
        recipient_id: UserId,
        /// Shortened message body.
        preview: String,
        /// Whether the sender flagged the message as an emergency.
        is_emergency: bool,
    },
    /// A message posted to a community channel.
    CommunitySent {
        /// The stored message.
        message_id: MessageId,
        /// Sender.
        sender_id: UserId,
        /// Display name of the sender.
        sender_name: String,
        /// Community channel.
        community_id: CommunityId,
        /// Members to notify. Never contains the sender.
        recipients: Vec<UserId>,
        /// Shortened message body.
        preview: String,
        /// Whether the sender flagged the message as an emergency.
        is_emergency: bool,
    },
}
