//! Read filter shared by listing, unread counting, and subscriptions.

use beredskap_core::types::id::{CommunityId, UserId};

use super::model::Message;
use super::target::MessageTarget;

/// Which messages a user sees for one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageFilter {
    /// The direct conversation between `user_id` and `peer_id`. Community rows never match.
    Direct {
        /// The reading user.
        user_id: UserId,
        /// The other participant.
        peer_id: UserId,
    },
    /// A community channel. Direct rows never match.
    Community {
        /// The community.
        community_id: CommunityId,
    },
}

impl MessageFilter {
    /// Filter for `user_id` reading `target`.
    pub fn new(user_id: UserId, target: MessageTarget) -> Self {
        match target {
            MessageTarget::Direct(peer_id) => Self::Direct { user_id, peer_id },
            MessageTarget::Community(community_id) => Self::Community { community_id },
        }
    }

    /// Whether `msg` belongs to this conversation.
    pub fn matches(&self, msg: &Message) -> bool {
        match (self, msg.target()) {
            (Self::Direct { user_id, peer_id }, MessageTarget::Direct(recipient_id)) => {
                (msg.sender_id == *user_id && recipient_id == *peer_id)
                    || (msg.sender_id == *peer_id && recipient_id == *user_id)
            }
            (Self::Community { community_id }, MessageTarget::Community(target)) => {
                target == *community_id
            }
            _ => false,
        }
    }

    /// Whether `msg` is in this conversation, unread, and not written by `reader`.
    pub fn is_unread_for(&self, msg: &Message, reader: UserId) -> bool {
        self.matches(msg) && !msg.is_read && msg.sender_id != reader
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn msg(sender: UserId, target: MessageTarget) -> Message {
        Message::new(sender, "hej".into(), target, false, Utc::now())
    }

    #[test]
    fn test_direct_filter_matches_both_directions() {
        let (a, b, c) = (UserId::new(), UserId::new(), UserId::new());
        let filter = MessageFilter::new(a, MessageTarget::Direct(b));

        assert!(filter.matches(&msg(a, MessageTarget::Direct(b))));
        assert!(filter.matches(&msg(b, MessageTarget::Direct(a))));
        assert!(!filter.matches(&msg(c, MessageTarget::Direct(a))));
        assert!(!filter.matches(&msg(a, MessageTarget::Direct(c))));
    }

    #[test]
    fn test_filters_never_cross_kinds() {
        let a = UserId::new();
        let community = CommunityId::new();
        let community_msg = msg(a, MessageTarget::Community(community));
        let direct_msg = msg(a, MessageTarget::Direct(UserId::new()));

        let community_filter = MessageFilter::new(a, MessageTarget::Community(community));
        assert!(community_filter.matches(&community_msg));
        assert!(!community_filter.matches(&direct_msg));

        let direct_filter = MessageFilter::new(a, direct_msg.target());
        assert!(direct_filter.matches(&direct_msg));
        assert!(!direct_filter.matches(&community_msg));
    }

    #[test]
    fn test_own_messages_are_never_unread() {
        let (a, b) = (UserId::new(), UserId::new());
        let filter = MessageFilter::new(a, MessageTarget::Direct(b));
        assert!(!filter.is_unread_for(&msg(a, MessageTarget::Direct(b)), a));
        assert!(filter.is_unread_for(&msg(b, MessageTarget::Direct(a)), a));
    }
}
