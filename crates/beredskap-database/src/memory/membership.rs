//! In-memory community membership.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use beredskap_core::config::MemberSeed;
use beredskap_core::result::AppResult;
use beredskap_core::traits::MembershipGate;
use beredskap_core::types::id::{CommunityId, UserId};

/// Membership gate backed by a map. Populated by tests and dev seeding.
#[derive(Debug, Clone, Default)]
pub struct MemoryMembershipGate {
    /// community -> (user -> is_admin), in join order.
    communities: Arc<RwLock<HashMap<CommunityId, Vec<(UserId, bool)>>>>,
}

impl MemoryMembershipGate {
    /// Creates a gate with no communities.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a gate holding the configured members. A repeated entry
    /// keeps its first position and takes the last admin flag.
    pub fn with_members(seeds: &[MemberSeed]) -> Self {
        let mut communities: HashMap<CommunityId, Vec<(UserId, bool)>> = HashMap::new();
        for seed in seeds {
            let members = communities.entry(seed.community_id).or_default();
            match members.iter_mut().find(|(id, _)| *id == seed.user_id) {
                Some(entry) => entry.1 = seed.is_admin,
                None => members.push((seed.user_id, seed.is_admin)),
            }
        }
        Self {
            communities: Arc::new(RwLock::new(communities)),
        }
    }

    /// Add a member. Re-adding updates the admin flag.
    pub async fn add_member(&self, community_id: CommunityId, user_id: UserId, is_admin: bool) {
        let mut communities = self.communities.write().await;
        let members = communities.entry(community_id).or_default();
        match members.iter_mut().find(|(id, _)| *id == user_id) {
            Some(entry) => entry.1 = is_admin,
            None => members.push((user_id, is_admin)),
        }
    }

    /// Remove a member. Returns whether they were present.
    pub async fn remove_member(&self, community_id: CommunityId, user_id: UserId) -> bool {
        let mut communities = self.communities.write().await;
        let Some(members) = communities.get_mut(&community_id) else {
            return false;
        };
        let before = members.len();
        members.retain(|(id, _)| *id != user_id);
        members.len() != before
    }
}

#[async_trait]
impl MembershipGate for MemoryMembershipGate {
    async fn is_member(&self, community_id: CommunityId, user_id: UserId) -> AppResult<bool> {
        let communities = self.communities.read().await;
        Ok(communities
            .get(&community_id)
            .is_some_and(|members| members.iter().any(|(id, _)| *id == user_id)))
    }

    async fn list_members(&self, community_id: CommunityId) -> AppResult<Vec<UserId>> {
        let communities = self.communities.read().await;
        Ok(communities
            .get(&community_id)
            .map(|members| members.iter().map(|(id, _)| *id).collect())
            .unwrap_or_default())
    }

    async fn is_admin(&self, community_id: CommunityId, user_id: UserId) -> AppResult<bool> {
        let communities = self.communities.read().await;
        Ok(communities.get(&community_id).is_some_and(|members| {
            members
                .iter()
                .any(|(id, admin)| *id == user_id && *admin)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_membership_roundtrip() {
        let gate = MemoryMembershipGate::new();
        let community = CommunityId::new();
        let (anna, bo) = (UserId::new(), UserId::new());

        gate.add_member(community, anna, true).await;
        gate.add_member(community, bo, false).await;

        assert!(gate.is_member(community, bo).await.unwrap());
        assert!(gate.is_admin(community, anna).await.unwrap());
        assert!(!gate.is_admin(community, bo).await.unwrap());
        assert_eq!(gate.list_members(community).await.unwrap(), vec![anna, bo]);

        assert!(gate.remove_member(community, bo).await);
        assert!(!gate.is_member(community, bo).await.unwrap());
        assert!(!gate.is_member(CommunityId::new(), anna).await.unwrap());
    }

    #[tokio::test]
    async fn test_with_members_loads_seeds() {
        let (north, south) = (CommunityId::new(), CommunityId::new());
        let (anna, bo) = (UserId::new(), UserId::new());
        let seed = |community_id, user_id, is_admin| MemberSeed {
            community_id,
            user_id,
            is_admin,
        };
        let gate = MemoryMembershipGate::with_members(&[
            seed(north, anna, false),
            seed(north, bo, false),
            seed(south, bo, true),
            seed(north, anna, true),
        ]);

        assert_eq!(gate.list_members(north).await.unwrap(), vec![anna, bo]);
        assert!(gate.is_admin(north, anna).await.unwrap());
        assert!(gate.is_admin(south, bo).await.unwrap());
        assert!(!gate.is_member(south, anna).await.unwrap());
    }
}
