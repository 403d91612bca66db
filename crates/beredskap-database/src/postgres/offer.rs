//! Offer queries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use beredskap_core::error::AppError;
use beredskap_core::result::AppResult;
use beredskap_core::types::id::{CommunityId, OfferId, UserId};
use beredskap_entity::offer::{OfferListing, OfferStatus, OfferUpdate, SharedResource};

use super::{PgStore, db_err};
use crate::store::OfferStore;

#[async_trait]
impl OfferStore for PgStore {
    async fn insert_offer(&self, offer: &SharedResource) -> AppResult<SharedResource> {
        sqlx::query_as::<_, SharedResource>(
            "INSERT INTO shared_resources (id, owner_id, community_id, catalog_resource_id, shared_quantity, \
             available_until, status, location, notes, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING *",
        )
        .bind(offer.id)
        .bind(offer.owner_id)
        .bind(offer.community_id)
        .bind(offer.catalog_resource_id)
        .bind(offer.shared_quantity)
        .bind(offer.available_until)
        .bind(offer.status)
        .bind(&offer.location)
        .bind(&offer.notes)
        .bind(offer.created_at)
        .bind(offer.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to insert offer"))
    }

    async fn find_offer(&self, id: OfferId) -> AppResult<Option<SharedResource>> {
        sqlx::query_as::<_, SharedResource>("SELECT * FROM shared_resources WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find offer"))
    }

    async fn list_offers(
        &self,
        community_id: CommunityId,
        viewer_id: UserId,
        exclude: &[OfferStatus],
    ) -> AppResult<Vec<OfferListing>> {
        let excluded: Vec<&str> = exclude.iter().map(OfferStatus::as_str).collect();
        sqlx::query_as::<_, OfferListing>(
            "SELECT o.*, c.name AS resource_name, c.category AS resource_category, \
             EXISTS (SELECT 1 FROM resource_requests r WHERE r.shared_resource_id = o.id \
                     AND r.requester_id = $2 AND r.status IN ('pending', 'approved')) AS has_active_request, \
             (SELECT COUNT(*) FROM resource_requests r WHERE r.shared_resource_id = o.id \
                     AND r.status = 'pending') AS pending_request_count \
             FROM shared_resources o \
             JOIN catalog_resources c ON c.id = o.catalog_resource_id \
             WHERE o.community_id = $1 AND NOT (o.status::text = ANY($3)) \
             ORDER BY o.created_at DESC, o.id DESC",
        )
        .bind(community_id)
        .bind(viewer_id)
        .bind(&excluded)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to list offers"))
    }

    async fn update_offer(
        &self,
        id: OfferId,
        update: OfferUpdate,
        now: DateTime<Utc>,
    ) -> AppResult<SharedResource> {
        let mut tx = self.pool.begin().await.map_err(db_err("Failed to begin transaction"))?;

        let mut offer = sqlx::query_as::<_, SharedResource>(
            "SELECT * FROM shared_resources WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err("Failed to lock offer"))?
        .ok_or_else(|| AppError::not_found(format!("Offer {id} not found")))?;

        if update.shared_quantity.is_some_and(|q| q != offer.shared_quantity) {
            let requested: bool = sqlx::query_scalar(
                "SELECT EXISTS (SELECT 1 FROM resource_requests WHERE shared_resource_id = $1)",
            )
            .bind(id)
            .fetch_one(&mut *tx)
            .await
            .map_err(db_err("Failed to check requests"))?;
            if requested {
                return Err(AppError::conflict(
                    "Quantity cannot change once the offer has been requested",
                ));
            }
        }

        update.apply(&mut offer, now);
        let updated = sqlx::query_as::<_, SharedResource>(
            "UPDATE shared_resources SET shared_quantity = $2, available_until = $3, location = $4, \
             notes = $5, updated_at = $6 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(offer.shared_quantity)
        .bind(offer.available_until)
        .bind(&offer.location)
        .bind(&offer.notes)
        .bind(offer.updated_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err("Failed to update offer"))?;

        tx.commit().await?;
        Ok(updated)
    }

    async fn delete_offer(&self, id: OfferId) -> AppResult<()> {
        let mut tx = self.pool.begin().await.map_err(db_err("Failed to begin transaction"))?;

        let locked: Option<OfferId> =
            sqlx::query_scalar("SELECT id FROM shared_resources WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_err("Failed to lock offer"))?;
        if locked.is_none() {
            return Err(AppError::not_found(format!("Offer {id} not found")));
        }

        let active: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM resource_requests WHERE shared_resource_id = $1 \
             AND status IN ('pending', 'approved'))",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err("Failed to check active requests"))?;
        if active {
            return Err(AppError::conflict("Offer has an active request"));
        }

        sqlx::query("DELETE FROM resource_requests WHERE shared_resource_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_err("Failed to delete requests"))?;
        sqlx::query("DELETE FROM shared_resources WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_err("Failed to delete offer"))?;

        tx.commit().await?;
        Ok(())
    }
}
