//! Channel keys.

use std::fmt;

use serde::{Deserialize, Serialize};

use beredskap_core::types::id::{CommunityId, UserId};
use beredskap_entity::message::{Message, MessageFilter, MessageTarget};

/// One broadcast channel per conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id")]
pub enum ChannelKey {
    /// A direct conversation. The pair is stored in ascending order so both
    /// participants land on the same channel.
    Direct(UserId, UserId),
    /// A community channel.
    Community(CommunityId),
}

impl ChannelKey {
    /// Channel for the direct conversation between `a` and `b`.
    pub fn direct(a: UserId, b: UserId) -> Self {
        if a <= b {
            Self::Direct(a, b)
        } else {
            Self::Direct(b, a)
        }
    }

    /// Channel a persisted message is published on.
    pub fn for_message(msg: &Message) -> Self {
        match msg.target() {
            MessageTarget::Direct(recipient_id) => Self::direct(msg.sender_id, recipient_id),
            MessageTarget::Community(community_id) => Self::Community(community_id),
        }
    }

    /// Channel carrying every message `filter` can match.
    pub fn for_filter(filter: &MessageFilter) -> Self {
        match *filter {
            MessageFilter::Direct { user_id, peer_id } => Self::direct(user_id, peer_id),
            MessageFilter::Community { community_id } => Self::Community(community_id),
        }
    }
}

impl fmt::Display for ChannelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct(a, b) => write!(f, "direct:{a}:{b}"),
            Self::Community(id) => write!(f, "community:{id}"),
        }
    }
}
