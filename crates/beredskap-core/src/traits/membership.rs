//! Community membership gate.
//!
//! Membership is owned by an external collaborator. The sharing and
//! messaging services only ask questions through this trait.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::id::{CommunityId, UserId};

/// Answers "is user X a member/admin of community Y".
#[async_trait]
pub trait MembershipGate: Send + Sync + std::fmt::Debug + 'static {
    /// Whether the user belongs to the community.
    async fn is_member(&self, community_id: CommunityId, user_id: UserId) -> AppResult<bool>;

    /// All member ids of the community, admins included.
    async fn list_members(&self, community_id: CommunityId) -> AppResult<Vec<UserId>>;

    /// Whether the user administers the community.
    async fn is_admin(&self, community_id: CommunityId, user_id: UserId) -> AppResult<bool>;
}
