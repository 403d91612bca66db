//! Message addressing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use beredskap_core::types::id::{CommunityId, UserId};

/// Where a message is addressed. Exactly one of the two, by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum MessageTarget {
    /// A single recipient.
    Direct(UserId),
    /// Every member of a community.
    Community(CommunityId),
}

impl MessageTarget {
    /// Recipient of a direct message.
    pub fn recipient_id(&self) -> Option<UserId> {
        match self {
            Self::Direct(user_id) => Some(*user_id),
            Self::Community(_) => None,
        }
    }

    /// Community of a community message.
    pub fn community_id(&self) -> Option<CommunityId> {
        match self {
            Self::Direct(_) => None,
            Self::Community(community_id) => Some(*community_id),
        }
    }
}

/// Renders as `direct:<uuid>` or `community:<uuid>`.
impl fmt::Display for MessageTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct(id) => write!(f, "direct:{id}"),
            Self::Community(id) => write!(f, "community:{id}"),
        }
    }
}

/// Error returned when parsing a [`MessageTarget`] fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTargetError(String);

impl fmt::Display for ParseTargetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid message target: {}", self.0)
    }
}

impl std::error::Error for ParseTargetError {}

impl FromStr for MessageTarget {
    type Err = ParseTargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, id) = s
            .split_once(':')
            .ok_or_else(|| ParseTargetError(s.to_string()))?;
        let id = Uuid::parse_str(id).map_err(|_| ParseTargetError(s.to_string()))?;
        match kind {
            "direct" => Ok(Self::Direct(UserId::from_uuid(id))),
            "community" => Ok(Self::Community(CommunityId::from_uuid(id))),
            _ => Err(ParseTargetError(s.to_string())),
        }
    }
}
