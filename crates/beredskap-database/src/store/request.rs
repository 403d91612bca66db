//! Request store and the atomic transition primitive.

use async_trait::async_trait;

use beredskap_core::error::AppError;
use beredskap_core::result::AppResult;
use beredskap_core::types::id::{OfferId, RequestId, UserId};
use beredskap_entity::offer::{OfferStatus, SharedResource};
use beredskap_entity::request::{OfferEffect, ResourceRequest, TransitionCommand};

/// Rows written by one committed transition.
#[derive(Debug, Clone)]
pub struct TransitionOutcome {
    /// The request after the transition.
    pub request: ResourceRequest,
    /// The offer after the coupled status change.
    pub offer: SharedResource,
}

/// Persistence for requests.
#[async_trait]
pub trait RequestStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a pending request.
    ///
    /// With the offer locked: fails with `NotFound` if it is gone and with
    /// `Conflict` if it is no longer available or the requester already holds
    /// an active request against it.
    async fn insert_request(&self, request: &ResourceRequest) -> AppResult<ResourceRequest>;

    /// Find a request by id.
    async fn find_request(&self, id: RequestId) -> AppResult<Option<ResourceRequest>>;

    /// The pending or approved request of `requester_id` against `offer_id`.
    async fn find_active_request(
        &self,
        offer_id: OfferId,
        requester_id: UserId,
    ) -> AppResult<Option<ResourceRequest>>;

    /// All requests against an offer, newest first.
    async fn list_requests_by_offer(&self, offer_id: OfferId) -> AppResult<Vec<ResourceRequest>>;

    /// All requests filed by a user, newest first.
    async fn list_requests_by_requester(
        &self,
        requester_id: UserId,
    ) -> AppResult<Vec<ResourceRequest>>;

    /// Commit a transition and its offer effect as one unit.
    ///
    /// The request and offer are re-read under lock. `Conflict` is returned
    /// when the request's status or version differ from the command, or when
    /// a `Take` finds the offer already taken.
    async fn apply_transition(&self, cmd: &TransitionCommand) -> AppResult<TransitionOutcome>;
}

/// Offer status a transition leaves behind, or `None` to leave it alone.
///
/// `held_elsewhere` is whether another approved request references the offer.
pub(crate) fn resolve_offer_status(
    effect: OfferEffect,
    offer: &SharedResource,
    held_elsewhere: bool,
) -> AppResult<Option<OfferStatus>> {
    let next = match effect {
        OfferEffect::Take if offer.status == OfferStatus::Taken => {
            return Err(AppError::conflict(format!(
                "Offer {} was taken concurrently",
                offer.id
            )));
        }
        OfferEffect::Take => Some(OfferStatus::Taken),
        OfferEffect::Release if !held_elsewhere => Some(OfferStatus::Available),
        OfferEffect::Release | OfferEffect::Unchanged => None,
    };
    Ok(next.filter(|status| *status != offer.status))
}
