//! Request queries and transitions.

use async_trait::async_trait;

use beredskap_core::error::AppError;
use beredskap_core::result::AppResult;
use beredskap_core::types::id::{OfferId, RequestId, UserId};
use beredskap_entity::offer::{OfferStatus, SharedResource};
use beredskap_entity::request::{ResourceRequest, TransitionCommand};

use super::{PgStore, db_err};
use crate::store::request::resolve_offer_status;
use crate::store::{RequestStore, TransitionOutcome};

#[async_trait]
impl RequestStore for PgStore {
    async fn insert_request(&self, request: &ResourceRequest) -> AppResult<ResourceRequest> {
        let offer_id = request.shared_resource_id;
        let mut tx = self.pool.begin().await.map_err(db_err("Failed to begin transaction"))?;

        let status: OfferStatus =
            sqlx::query_scalar("SELECT status FROM shared_resources WHERE id = $1 FOR UPDATE")
                .bind(offer_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_err("Failed to lock offer"))?
                .ok_or_else(|| AppError::not_found(format!("Offer {offer_id} not found")))?;
        if status != OfferStatus::Available {
            return Err(AppError::conflict(format!(
                "Offer {offer_id} was {status} concurrently"
            )));
        }

        // uq_resource_requests_active rejects a second active request for the pair.
        let inserted = sqlx::query_as::<_, ResourceRequest>(
            "INSERT INTO resource_requests (id, shared_resource_id, requester_id, requested_quantity, \
             status, message, requested_at, version) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(request.id)
        .bind(offer_id)
        .bind(request.requester_id)
        .bind(request.requested_quantity)
        .bind(request.status)
        .bind(&request.message)
        .bind(request.requested_at)
        .bind(request.version)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err("An active request for this offer already exists"))?;

        tx.commit().await?;
        Ok(inserted)
    }

    async fn find_request(&self, id: RequestId) -> AppResult<Option<ResourceRequest>> {
        sqlx::query_as::<_, ResourceRequest>("SELECT * FROM resource_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find request"))
    }

    async fn find_active_request(
        &self,
        offer_id: OfferId,
        requester_id: UserId,
    ) -> AppResult<Option<ResourceRequest>> {
        sqlx::query_as::<_, ResourceRequest>(
            "SELECT * FROM resource_requests WHERE shared_resource_id = $1 AND requester_id = $2 \
             AND status IN ('pending', 'approved')",
        )
        .bind(offer_id)
        .bind(requester_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to find active request"))
    }

    async fn list_requests_by_offer(&self, offer_id: OfferId) -> AppResult<Vec<ResourceRequest>> {
        sqlx::query_as::<_, ResourceRequest>(
            "SELECT * FROM resource_requests WHERE shared_resource_id = $1 \
             ORDER BY requested_at DESC, id DESC",
        )
        .bind(offer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to list requests for offer"))
    }

    async fn list_requests_by_requester(
        &self,
        requester_id: UserId,
    ) -> AppResult<Vec<ResourceRequest>> {
        sqlx::query_as::<_, ResourceRequest>(
            "SELECT * FROM resource_requests WHERE requester_id = $1 \
             ORDER BY requested_at DESC, id DESC",
        )
        .bind(requester_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to list requests for requester"))
    }

    async fn apply_transition(&self, cmd: &TransitionCommand) -> AppResult<TransitionOutcome> {
        let mut tx = self.pool.begin().await.map_err(db_err("Failed to begin transaction"))?;

        // Offer before request, the same order insert and delete take.
        let mut offer = sqlx::query_as::<_, SharedResource>(
            "SELECT o.* FROM shared_resources o \
             JOIN resource_requests r ON r.shared_resource_id = o.id \
             WHERE r.id = $1 FOR UPDATE OF o",
        )
        .bind(cmd.request_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err("Failed to lock offer"))?
        .ok_or_else(|| AppError::not_found(format!("Request {} not found", cmd.request_id)))?;

        let current = sqlx::query_as::<_, ResourceRequest>(
            "SELECT * FROM resource_requests WHERE id = $1 FOR UPDATE",
        )
        .bind(cmd.request_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err("Failed to lock request"))?
        .ok_or_else(|| AppError::not_found(format!("Request {} not found", cmd.request_id)))?;

        if current.status != cmd.expected_status || current.version != cmd.expected_version {
            return Err(AppError::conflict(format!(
                "Request {} changed concurrently",
                cmd.request_id
            )));
        }

        let held_elsewhere: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM resource_requests WHERE shared_resource_id = $1 \
             AND id <> $2 AND status = 'approved')",
        )
        .bind(offer.id)
        .bind(cmd.request_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err("Failed to check approved requests"))?;

        if let Some(status) = resolve_offer_status(cmd.offer_effect(), &offer, held_elsewhere)? {
            offer = sqlx::query_as::<_, SharedResource>(
                "UPDATE shared_resources SET status = $2, updated_at = $3 WHERE id = $1 RETURNING *",
            )
            .bind(offer.id)
            .bind(status)
            .bind(cmd.at)
            .fetch_one(&mut *tx)
            .await
            .map_err(db_err("Failed to update offer status"))?;
        }

        let next = current.transitioned(cmd);
        let request = sqlx::query_as::<_, ResourceRequest>(
            "UPDATE resource_requests SET status = $2, response_message = $3, responded_at = $4, \
             completed_at = $5, version = $6 WHERE id = $1 RETURNING *",
        )
        .bind(next.id)
        .bind(next.status)
        .bind(&next.response_message)
        .bind(next.responded_at)
        .bind(next.completed_at)
        .bind(next.version)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err("Failed to update request"))?;

        tx.commit().await?;
        Ok(TransitionOutcome { request, offer })
    }
}
