//! Offer publishing, listing, and owner edits.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use beredskap_cache::CacheManager;
use beredskap_core::error::AppError;
use beredskap_core::result::AppResult;
use beredskap_core::types::id::{CatalogResourceId, CommunityId, OfferId};
use beredskap_database::store::OfferStore;
use beredskap_entity::offer::{NewOffer, OfferListing, OfferStatus, OfferUpdate, SharedResource};

use crate::catalog::ResourceCatalogService;
use crate::context::RequestContext;
use crate::membership::CommunityDirectory;
use crate::validation::positive_quantity;

/// Manages offers. Offer status is never written here; it changes only
/// through request transitions.
#[derive(Debug, Clone)]
pub struct SharingLedgerService {
    /// Offer store.
    offers: Arc<dyn OfferStore>,
    /// Catalog, for ownership and quantity checks.
    catalog: Arc<ResourceCatalogService>,
    /// Community membership.
    directory: CommunityDirectory,
    /// Cache component.
    cache: CacheManager,
}

/// Request to publish an offer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOfferRequest {
    /// Community to publish to.
    pub community_id: CommunityId,
    /// Catalog resource offered.
    pub catalog_resource_id: CatalogResourceId,
    /// Quantity offered.
    pub quantity: i32,
    /// End of the availability window.
    pub available_until: Option<DateTime<Utc>>,
    /// Pickup location.
    pub location: Option<String>,
    /// Free-text notes.
    pub notes: Option<String>,
}

impl SharingLedgerService {
    /// Creates a new sharing ledger service.
    pub fn new(
        offers: Arc<dyn OfferStore>,
        catalog: Arc<ResourceCatalogService>,
        directory: CommunityDirectory,
        cache: CacheManager,
    ) -> Self {
        Self {
            offers,
            catalog,
            directory,
            cache,
        }
    }

    /// Publishes one of the caller's catalog resources to a community.
    pub async fn create_offer(
        &self,
        ctx: &RequestContext,
        req: CreateOfferRequest,
    ) -> AppResult<SharedResource> {
        positive_quantity(req.quantity, "quantity")?;
        let now = Utc::now();
        if req.available_until.is_some_and(|until| until <= now) {
            return Err(AppError::validation("available_until must be in the future"));
        }

        let resource = self.catalog.get_resource(req.catalog_resource_id).await?;
        if !ctx.is(resource.owner_id) {
            return Err(AppError::authorization(
                "Only the owner can share this resource",
            ));
        }
        self.directory
            .require_member(req.community_id, ctx.user_id)
            .await?;
        if req.quantity > resource.quantity {
            return Err(AppError::validation(format!(
                "Cannot share {} of '{}', only {} held",
                req.quantity, resource.name, resource.quantity
            )));
        }

        let offer = NewOffer {
            owner_id: ctx.user_id,
            community_id: req.community_id,
            catalog_resource_id: resource.id,
            shared_quantity: req.quantity,
            available_until: req.available_until,
            location: req.location,
            notes: req.notes,
        }
        .into_offer(now);

        let offer = self.offers.insert_offer(&offer).await?;
        self.cache.put_offer(&offer).await;

        info!(
            offer_id = %offer.id,
            owner_id = %ctx.user_id,
            community_id = %offer.community_id,
            resource = %resource.name,
            quantity = offer.shared_quantity,
            "Offer published"
        );
        Ok(offer)
    }

    /// Lists a community's offers for a member. Taken offers are hidden
    /// unless `exclude` says otherwise.
    pub async fn list_offers(
        &self,
        ctx: &RequestContext,
        community_id: CommunityId,
        exclude: Option<Vec<OfferStatus>>,
    ) -> AppResult<Vec<OfferListing>> {
        self.directory
            .require_member(community_id, ctx.user_id)
            .await?;
        let exclude = exclude.unwrap_or_else(|| vec![OfferStatus::Taken]);
        self.offers
            .list_offers(community_id, ctx.user_id, &exclude)
            .await
    }

    /// Gets an offer by ID, reading through the cache.
    pub async fn get_offer(&self, id: OfferId) -> AppResult<SharedResource> {
        if let Some(offer) = self.cache.offer(id).await {
            return Ok(offer);
        }
        let revision = self.cache.offer_revision(id).await;
        let offer = self.load_offer(id).await?;
        self.cache.put_offer_if_unchanged(&offer, revision).await;
        Ok(offer)
    }

    /// Updates an offer's owner-editable fields.
    pub async fn update_offer(
        &self,
        ctx: &RequestContext,
        id: OfferId,
        update: OfferUpdate,
    ) -> AppResult<SharedResource> {
        if let Some(quantity) = update.shared_quantity {
            positive_quantity(quantity, "quantity")?;
        }
        if matches!(update.available_until, Some(Some(until)) if until <= Utc::now()) {
            return Err(AppError::validation("available_until must be in the future"));
        }

        let offer = self.owned_offer(ctx, id).await?;
        if let Some(quantity) = update.shared_quantity {
            let resource = self.catalog.get_resource(offer.catalog_resource_id).await?;
            if quantity > resource.quantity {
                return Err(AppError::validation(format!(
                    "Cannot share {quantity} of '{}', only {} held",
                    resource.name, resource.quantity
                )));
            }
        }

        let updated = self.offers.update_offer(id, update, Utc::now()).await?;
        self.cache.invalidate_offer(id).await;

        info!(offer_id = %id, owner_id = %ctx.user_id, "Offer updated");
        Ok(updated)
    }

    /// Deletes an offer. Rejected with `Conflict` while a request is active.
    pub async fn delete_offer(&self, ctx: &RequestContext, id: OfferId) -> AppResult<()> {
        self.owned_offer(ctx, id).await?;
        self.offers.delete_offer(id).await?;
        self.cache.invalidate_offer(id).await;

        info!(offer_id = %id, owner_id = %ctx.user_id, "Offer deleted");
        Ok(())
    }

    /// Reads an offer from the store, bypassing the cache.
    pub(crate) async fn load_offer(&self, id: OfferId) -> AppResult<SharedResource> {
        self.offers
            .find_offer(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Offer {id} not found")))
    }

    async fn owned_offer(&self, ctx: &RequestContext, id: OfferId) -> AppResult<SharedResource> {
        let offer = self.load_offer(id).await?;
        if !offer.is_owned_by(ctx.user_id) {
            return Err(AppError::authorization("Only the owner can modify this offer"));
        }
        Ok(offer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beredskap_core::error::ErrorKind;
    use chrono::Duration;

    use crate::testing::Fixture;

    #[tokio::test]
    async fn test_create_offer_validates_before_writing() {
        let fx = Fixture::new().await;
        let owner = fx.member("Anna").await;
        let resource = fx.resource(&owner, "tält", 2).await;

        let err = fx
            .services
            .ledger
            .create_offer(&owner, fx.offer_request(&resource, 0))
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Validation));

        let err = fx
            .services
            .ledger
            .create_offer(&owner, fx.offer_request(&resource, 3))
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Validation));

        let mut expired = fx.offer_request(&resource, 1);
        expired.available_until = Some(Utc::now() - Duration::hours(1));
        let err = fx
            .services
            .ledger
            .create_offer(&owner, expired)
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Validation));

        let listed = fx
            .services
            .ledger
            .list_offers(&owner, fx.community, None)
            .await
            .unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn test_create_offer_requires_ownership_and_membership() {
        let fx = Fixture::new().await;
        let owner = fx.member("Anna").await;
        let other = fx.member("Bertil").await;
        let outsider = RequestContext::new(beredskap_core::types::id::UserId::new(), "Eve");
        let resource = fx.resource(&owner, "tält", 1).await;

        let err = fx
            .services
            .ledger
            .create_offer(&other, fx.offer_request(&resource, 1))
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Authorization));

        let own = fx.resource(&outsider, "kamin", 1).await;
        let err = fx
            .services
            .ledger
            .create_offer(&outsider, fx.offer_request(&own, 1))
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Authorization));
    }

    #[tokio::test]
    async fn test_list_offers_hides_taken_and_annotates_viewer() {
        let fx = Fixture::new().await;
        let owner = fx.member("Anna").await;
        let requester = fx.member("Bertil").await;
        let tent = fx.offer(&owner, "tält", 1).await;
        let stove = fx.offer(&owner, "spritkök", 1).await;

        let request = fx
            .services
            .requests
            .request(&requester, tent.id, 1, None)
            .await
            .unwrap();
        fx.services
            .requests
            .request(&requester, stove.id, 1, None)
            .await
            .unwrap();
        fx.services
            .requests
            .approve(&owner, request.id, None)
            .await
            .unwrap();

        let listed = fx
            .services
            .ledger
            .list_offers(&requester, fx.community, None)
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].offer.id, stove.id);
        assert!(listed[0].has_active_request);
        assert_eq!(listed[0].pending_request_count, 1);
        assert_eq!(listed[0].resource_name, "spritkök");

        let everything = fx
            .services
            .ledger
            .list_offers(&requester, fx.community, Some(Vec::new()))
            .await
            .unwrap();
        assert_eq!(everything.len(), 2);

        let outsider = RequestContext::new(beredskap_core::types::id::UserId::new(), "Eve");
        let err = fx
            .services
            .ledger
            .list_offers(&outsider, fx.community, None)
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Authorization));
    }

    #[tokio::test]
    async fn test_only_owner_mutates_offer() {
        let fx = Fixture::new().await;
        let owner = fx.member("Anna").await;
        let other = fx.member("Bertil").await;
        let offer = fx.offer(&owner, "tält", 2).await;

        let update = OfferUpdate {
            notes: Some(Some("hämtas efter 18".to_string())),
            ..Default::default()
        };
        let err = fx
            .services
            .ledger
            .update_offer(&other, offer.id, update.clone())
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Authorization));
        let err = fx
            .services
            .ledger
            .delete_offer(&other, offer.id)
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Authorization));

        let updated = fx
            .services
            .ledger
            .update_offer(&owner, offer.id, update)
            .await
            .unwrap();
        assert_eq!(updated.notes.as_deref(), Some("hämtas efter 18"));
    }

    #[tokio::test]
    async fn test_quantity_locked_once_requested() {
        let fx = Fixture::new().await;
        let owner = fx.member("Anna").await;
        let requester = fx.member("Bertil").await;
        let offer = fx.offer(&owner, "vattendunk", 2).await;

        let shrink = OfferUpdate {
            shared_quantity: Some(1),
            ..Default::default()
        };
        let err = fx
            .services
            .ledger
            .update_offer(&owner, offer.id, OfferUpdate {
                shared_quantity: Some(0),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Validation));

        fx.services
            .requests
            .request(&requester, offer.id, 1, None)
            .await
            .unwrap();
        let err = fx
            .services
            .ledger
            .update_offer(&owner, offer.id, shrink)
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Conflict));
    }

    #[tokio::test]
    async fn test_delete_rejected_while_request_active() {
        let fx = Fixture::new().await;
        let owner = fx.member("Anna").await;
        let requester = fx.member("Bertil").await;
        let offer = fx.offer(&owner, "tält", 1).await;
        fx.services
            .requests
            .request(&requester, offer.id, 1, None)
            .await
            .unwrap();

        let err = fx
            .services
            .ledger
            .delete_offer(&owner, offer.id)
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Conflict));

        fx.services.requests.cancel(&requester, offer.id).await.unwrap();
        fx.services.ledger.delete_offer(&owner, offer.id).await.unwrap();
        let err = fx.services.ledger.get_offer(offer.id).await.unwrap_err();
        assert!(err.is(ErrorKind::NotFound));
    }
}
