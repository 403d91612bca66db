//! Community membership backed by the `community_members` table.

use async_trait::async_trait;
use sqlx::PgPool;

use beredskap_core::result::AppResult;
use beredskap_core::traits::MembershipGate;
use beredskap_core::types::id::{CommunityId, UserId};

use super::db_err;

/// Membership gate reading `community_members`.
#[derive(Debug, Clone)]
pub struct PgMembershipGate {
    pool: PgPool,
}

impl PgMembershipGate {
    /// Create a gate over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipGate for PgMembershipGate {
    async fn is_member(&self, community_id: CommunityId, user_id: UserId) -> AppResult<bool> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM community_members WHERE community_id = $1 AND user_id = $2)",
        )
        .bind(community_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to check membership"))
    }

    async fn list_members(&self, community_id: CommunityId) -> AppResult<Vec<UserId>> {
        sqlx::query_scalar(
            "SELECT user_id FROM community_members WHERE community_id = $1 ORDER BY joined_at, user_id",
        )
        .bind(community_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to list community members"))
    }

    async fn is_admin(&self, community_id: CommunityId, user_id: UserId) -> AppResult<bool> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM community_members WHERE community_id = $1 \
             AND user_id = $2 AND role = 'admin')",
        )
        .bind(community_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to check community admin"))
    }
}
