//! Request lifecycle service.
//!
//! Preconditions are checked against the state read at the start of each
//! call and reported as `InvalidStateTransition`. The store then commits the
//! transition only if the request still has the status and version that
//! were checked; a concurrent writer turns the loser into a `Conflict`.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use beredskap_cache::CacheManager;
use beredskap_core::error::AppError;
use beredskap_core::events::{DomainEvent, SharingEvent};
use beredskap_core::result::AppResult;
use beredskap_core::types::id::{OfferId, RequestId};
use beredskap_database::store::{RequestStore, TransitionOutcome};
use beredskap_entity::offer::{OfferStatus, SharedResource};
use beredskap_entity::request::{NewRequest, RequestTransition, ResourceRequest};

use crate::catalog::ResourceCatalogService;
use crate::context::RequestContext;
use crate::membership::CommunityDirectory;
use crate::notification::NotificationDispatcher;
use crate::sharing::SharingLedgerService;
use crate::validation::positive_quantity;

/// Drives requests through `pending → approved/denied/cancelled` and
/// `approved → completed/cancelled`.
#[derive(Debug, Clone)]
pub struct RequestTrackerService {
    /// Request store.
    requests: Arc<dyn RequestStore>,
    /// Offers being requested.
    ledger: Arc<SharingLedgerService>,
    /// Catalog, for resource names in notifications.
    catalog: Arc<ResourceCatalogService>,
    /// Community membership.
    directory: CommunityDirectory,
    /// Notification dispatcher.
    dispatcher: Arc<NotificationDispatcher>,
    /// Cache component.
    cache: CacheManager,
}

impl RequestTrackerService {
    /// Creates a new request tracker.
    pub fn new(
        requests: Arc<dyn RequestStore>,
        ledger: Arc<SharingLedgerService>,
        catalog: Arc<ResourceCatalogService>,
        directory: CommunityDirectory,
        dispatcher: Arc<NotificationDispatcher>,
        cache: CacheManager,
    ) -> Self {
        Self {
            requests,
            ledger,
            catalog,
            directory,
            dispatcher,
            cache,
        }
    }

    /// Files a pending request against an available offer and notifies the owner.
    pub async fn request(
        &self,
        ctx: &RequestContext,
        offer_id: OfferId,
        quantity: i32,
        message: Option<String>,
    ) -> AppResult<ResourceRequest> {
        positive_quantity(quantity, "quantity")?;

        let offer = self.ledger.load_offer(offer_id).await?;
        if quantity > offer.shared_quantity {
            return Err(AppError::validation(format!(
                "Requested {quantity} but only {} offered",
                offer.shared_quantity
            )));
        }
        if offer.is_owned_by(ctx.user_id) {
            return Err(AppError::invalid_transition(
                "Owners cannot request their own offer",
            ));
        }
        self.directory
            .require_member(offer.community_id, ctx.user_id)
            .await?;

        let now = Utc::now();
        if offer.status != OfferStatus::Available {
            return Err(AppError::invalid_transition(format!(
                "Offer {offer_id} is {}",
                offer.status
            )));
        }
        if offer.is_expired(now) {
            return Err(AppError::invalid_transition(format!(
                "Offer {offer_id} is no longer available"
            )));
        }
        if self
            .requests
            .find_active_request(offer_id, ctx.user_id)
            .await?
            .is_some()
        {
            return Err(AppError::invalid_transition(
                "An active request for this offer already exists",
            ));
        }

        let request = NewRequest {
            offer_id,
            requester_id: ctx.user_id,
            quantity,
            message: message.filter(|m| !m.trim().is_empty()),
        }
        .into_request(now);
        let request = self.requests.insert_request(&request).await?;

        info!(
            request_id = %request.id,
            offer_id = %offer_id,
            requester_id = %ctx.user_id,
            quantity,
            "Resource requested"
        );

        let event = SharingEvent::RequestCreated {
            request_id: request.id,
            offer_id,
            owner_id: offer.owner_id,
            requester_name: ctx.display_name.clone(),
            resource_name: self.resource_name(&offer).await,
            quantity,
            message: request.message.clone(),
        };
        self.dispatcher
            .dispatch(&DomainEvent::sharing(ctx.user_id, event))
            .await;

        Ok(request)
    }

    /// Approves a pending request. The offer becomes taken.
    pub async fn approve(
        &self,
        ctx: &RequestContext,
        request_id: RequestId,
        response_message: Option<String>,
    ) -> AppResult<ResourceRequest> {
        let (request, offer) = self.load(request_id).await?;
        let outcome = self
            .transition(ctx, request, &offer, RequestTransition::Approve, response_message)
            .await?;

        let event = SharingEvent::RequestApproved {
            request_id,
            offer_id: offer.id,
            requester_id: outcome.request.requester_id,
            owner_name: ctx.display_name.clone(),
            resource_name: self.resource_name(&offer).await,
            response_message: outcome.request.response_message.clone(),
        };
        self.dispatcher
            .dispatch(&DomainEvent::sharing(ctx.user_id, event))
            .await;

        Ok(outcome.request)
    }

    /// Denies a pending request. The offer returns to available unless
    /// another approval holds it.
    pub async fn deny(
        &self,
        ctx: &RequestContext,
        request_id: RequestId,
        response_message: Option<String>,
    ) -> AppResult<ResourceRequest> {
        let (request, offer) = self.load(request_id).await?;
        let outcome = self
            .transition(ctx, request, &offer, RequestTransition::Deny, response_message)
            .await?;

        let event = SharingEvent::RequestDenied {
            request_id,
            offer_id: offer.id,
            requester_id: outcome.request.requester_id,
            owner_name: ctx.display_name.clone(),
            resource_name: self.resource_name(&offer).await,
            response_message: outcome.request.response_message.clone(),
        };
        self.dispatcher
            .dispatch(&DomainEvent::sharing(ctx.user_id, event))
            .await;

        Ok(outcome.request)
    }

    /// Completes an approved request. The offer returns to available.
    pub async fn complete(
        &self,
        ctx: &RequestContext,
        request_id: RequestId,
    ) -> AppResult<ResourceRequest> {
        let (request, offer) = self.load(request_id).await?;
        let outcome = self
            .transition(ctx, request, &offer, RequestTransition::Complete, None)
            .await?;
        Ok(outcome.request)
    }

    /// Cancels the caller's active request against an offer.
    pub async fn cancel(
        &self,
        ctx: &RequestContext,
        offer_id: OfferId,
    ) -> AppResult<ResourceRequest> {
        let offer = self.ledger.load_offer(offer_id).await?;
        let request = self
            .requests
            .find_active_request(offer_id, ctx.user_id)
            .await?
            .ok_or_else(|| {
                AppError::invalid_transition("No active request for this offer to cancel")
            })?;
        let outcome = self
            .transition(ctx, request, &offer, RequestTransition::Cancel, None)
            .await?;
        Ok(outcome.request)
    }

    /// Requests against an offer, newest first. Owner only.
    pub async fn list_by_resource(
        &self,
        ctx: &RequestContext,
        offer_id: OfferId,
    ) -> AppResult<Vec<ResourceRequest>> {
        let offer = self.ledger.load_offer(offer_id).await?;
        if !offer.is_owned_by(ctx.user_id) {
            return Err(AppError::authorization(
                "Only the owner can list requests for this offer",
            ));
        }
        self.requests.list_requests_by_offer(offer_id).await
    }

    /// The caller's own requests, newest first.
    pub async fn list_by_requester(&self, ctx: &RequestContext) -> AppResult<Vec<ResourceRequest>> {
        self.requests.list_requests_by_requester(ctx.user_id).await
    }

    async fn load(&self, request_id: RequestId) -> AppResult<(ResourceRequest, SharedResource)> {
        let request = self
            .requests
            .find_request(request_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Request {request_id} not found")))?;
        let offer = self.ledger.load_offer(request.shared_resource_id).await?;
        Ok((request, offer))
    }

    async fn transition(
        &self,
        ctx: &RequestContext,
        request: ResourceRequest,
        offer: &SharedResource,
        transition: RequestTransition,
        response_message: Option<String>,
    ) -> AppResult<TransitionOutcome> {
        let allowed = match transition {
            RequestTransition::Approve | RequestTransition::Deny => offer.is_owned_by(ctx.user_id),
            RequestTransition::Complete => {
                offer.is_owned_by(ctx.user_id) || ctx.is(request.requester_id)
            }
            RequestTransition::Cancel => ctx.is(request.requester_id),
        };
        if !allowed {
            return Err(AppError::authorization(format!(
                "Not allowed to {transition} request {}",
                request.id
            )));
        }

        if !request.can(transition) {
            return Err(AppError::invalid_transition(format!(
                "Cannot {transition} a request that is {}",
                request.status
            )));
        }
        if transition == RequestTransition::Approve && offer.status == OfferStatus::Taken {
            return Err(AppError::invalid_transition(format!(
                "Offer {} is already taken",
                offer.id
            )));
        }

        let cmd = request.command(
            transition,
            response_message.filter(|m| !m.trim().is_empty()),
            Utc::now(),
        );
        let outcome = self.requests.apply_transition(&cmd).await?;
        self.cache.invalidate_offer(offer.id).await;

        info!(
            request_id = %outcome.request.id,
            offer_id = %offer.id,
            actor_id = %ctx.user_id,
            transition = %transition,
            request_status = %outcome.request.status,
            offer_status = %outcome.offer.status,
            "Request transitioned"
        );
        Ok(outcome)
    }

    async fn resource_name(&self, offer: &SharedResource) -> String {
        match self.catalog.get_resource(offer.catalog_resource_id).await {
            Ok(resource) => resource.name,
            Err(e) => {
                warn!(offer_id = %offer.id, error = %e, "Resource name lookup failed");
                "a shared resource".to_string()
            }
        }
    }
}
