//! Cached view over the community membership gate.

use std::sync::Arc;

use tracing::debug;

use beredskap_cache::CacheManager;
use beredskap_core::error::AppError;
use beredskap_core::result::AppResult;
use beredskap_core::traits::MembershipGate;
use beredskap_core::types::id::{CommunityId, UserId};

/// Answers membership questions for the services.
///
/// Access checks always ask the gate. Only the member list used for
/// notification fan-out is served from the cache.
#[derive(Debug, Clone)]
pub struct CommunityDirectory {
    gate: Arc<dyn MembershipGate>,
    cache: CacheManager,
}

impl CommunityDirectory {
    /// Creates a directory over `gate`.
    pub fn new(gate: Arc<dyn MembershipGate>, cache: CacheManager) -> Self {
        Self { gate, cache }
    }

    /// Fail with `Authorization` unless `user_id` belongs to the community.
    pub async fn require_member(&self, community_id: CommunityId, user_id: UserId) -> AppResult<()> {
        if self.gate.is_member(community_id, user_id).await? {
            Ok(())
        } else {
            Err(AppError::authorization(format!(
                "User {user_id} is not a member of community {community_id}"
            )))
        }
    }

    /// All members of the community.
    pub async fn members(&self, community_id: CommunityId) -> AppResult<Vec<UserId>> {
        if let Some(members) = self.cache.community_members(community_id).await {
            debug!(community_id = %community_id, "Member list served from cache");
            return Ok(members);
        }
        let members = self.gate.list_members(community_id).await?;
        self.cache
            .put_community_members(community_id, &members)
            .await;
        Ok(members)
    }

    /// Members to notify about activity by `sender_id`. Never contains the sender.
    pub async fn members_except(
        &self,
        community_id: CommunityId,
        sender_id: UserId,
    ) -> AppResult<Vec<UserId>> {
        let mut members = self.members(community_id).await?;
        members.retain(|id| *id != sender_id);
        Ok(members)
    }
}
