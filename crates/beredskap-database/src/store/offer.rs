//! Offer store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use beredskap_core::result::AppResult;
use beredskap_core::types::id::{CommunityId, OfferId, UserId};
use beredskap_entity::offer::{OfferListing, OfferStatus, OfferUpdate, SharedResource};

/// Persistence for offers. Status is written only by
/// [`RequestStore::apply_transition`](super::RequestStore::apply_transition).
#[async_trait]
pub trait OfferStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a new offer.
    async fn insert_offer(&self, offer: &SharedResource) -> AppResult<SharedResource>;

    /// Find an offer by id.
    async fn find_offer(&self, id: OfferId) -> AppResult<Option<SharedResource>>;

    /// Offers in a community whose status is not in `exclude`, newest first,
    /// annotated for `viewer_id`.
    async fn list_offers(
        &self,
        community_id: CommunityId,
        viewer_id: UserId,
        exclude: &[OfferStatus],
    ) -> AppResult<Vec<OfferListing>>;

    /// Apply owner edits atomically.
    ///
    /// Fails with `NotFound` if the offer is gone and with `Conflict` if the
    /// update changes the quantity while any request references the offer.
    async fn update_offer(
        &self,
        id: OfferId,
        update: OfferUpdate,
        now: DateTime<Utc>,
    ) -> AppResult<SharedResource>;

    /// Delete an offer and its non-active requests atomically.
    ///
    /// Fails with `Conflict` if a pending or approved request exists.
    async fn delete_offer(&self, id: OfferId) -> AppResult<()>;
}
