//! Catalog, offer, and request tables of the in-process store.

use std::cmp::Reverse;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use beredskap_core::error::AppError;
use beredskap_core::result::AppResult;
use beredskap_core::types::id::{CatalogResourceId, CommunityId, OfferId, RequestId, UserId};
use beredskap_entity::catalog::CatalogResource;
use beredskap_entity::offer::{OfferListing, OfferStatus, OfferUpdate, SharedResource};
use beredskap_entity::request::{RequestStatus, ResourceRequest, TransitionCommand};

use super::{MemoryStore, Tables};
use crate::store::request::resolve_offer_status;
use crate::store::{CatalogStore, OfferStore, RequestStore, TransitionOutcome};

impl Tables {
    fn requests_for(&self, offer_id: OfferId) -> impl Iterator<Item = &ResourceRequest> {
        self.requests
            .values()
            .filter(move |r| r.shared_resource_id == offer_id)
    }

    fn active_request(&self, offer_id: OfferId, requester_id: UserId) -> Option<&ResourceRequest> {
        self.requests_for(offer_id)
            .find(|r| r.requester_id == requester_id && r.is_active())
    }
}

fn newest_first(mut requests: Vec<ResourceRequest>) -> Vec<ResourceRequest> {
    requests.sort_by_key(|r| Reverse((r.requested_at, r.id)));
    requests
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn insert_resource(&self, resource: &CatalogResource) -> AppResult<CatalogResource> {
        let mut tables = self.lock().await;
        tables.catalog.insert(resource.id, resource.clone());
        Ok(resource.clone())
    }

    async fn find_resource(&self, id: CatalogResourceId) -> AppResult<Option<CatalogResource>> {
        Ok(self.lock().await.catalog.get(&id).cloned())
    }

    async fn list_resources_by_owner(&self, owner_id: UserId) -> AppResult<Vec<CatalogResource>> {
        let tables = self.lock().await;
        let mut resources: Vec<_> = tables
            .catalog
            .values()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect();
        resources.sort_by_key(|r| Reverse((r.created_at, r.id)));
        Ok(resources)
    }

    async fn update_resource(&self, resource: &CatalogResource) -> AppResult<CatalogResource> {
        let mut tables = self.lock().await;
        match tables.catalog.get_mut(&resource.id) {
            Some(stored) => {
                *stored = resource.clone();
                Ok(resource.clone())
            }
            None => Err(AppError::not_found(format!(
                "Catalog resource {} not found",
                resource.id
            ))),
        }
    }
}

#[async_trait]
impl OfferStore for MemoryStore {
    async fn insert_offer(&self, offer: &SharedResource) -> AppResult<SharedResource> {
        let mut tables = self.lock().await;
        tables.offers.insert(offer.id, offer.clone());
        Ok(offer.clone())
    }

    async fn find_offer(&self, id: OfferId) -> AppResult<Option<SharedResource>> {
        Ok(self.lock().await.offers.get(&id).cloned())
    }

    async fn list_offers(
        &self,
        community_id: CommunityId,
        viewer_id: UserId,
        exclude: &[OfferStatus],
    ) -> AppResult<Vec<OfferListing>> {
        let tables = self.lock().await;
        let mut listings: Vec<OfferListing> = tables
            .offers
            .values()
            .filter(|o| o.community_id == community_id && !exclude.contains(&o.status))
            .map(|offer| {
                let (resource_name, resource_category) = tables
                    .catalog
                    .get(&offer.catalog_resource_id)
                    .map(|r| (r.name.clone(), r.category.clone()))
                    .unwrap_or_default();
                let has_active_request = tables.active_request(offer.id, viewer_id).is_some();
                let pending_request_count = tables
                    .requests_for(offer.id)
                    .filter(|r| r.status == RequestStatus::Pending)
                    .count() as i64;
                OfferListing {
                    offer: offer.clone(),
                    resource_name,
                    resource_category,
                    has_active_request,
                    pending_request_count,
                }
            })
            .collect();
        listings.sort_by_key(|l| Reverse((l.offer.created_at, l.offer.id)));
        Ok(listings)
    }

    async fn update_offer(
        &self,
        id: OfferId,
        update: OfferUpdate,
        now: DateTime<Utc>,
    ) -> AppResult<SharedResource> {
        let mut tables = self.lock().await;
        let has_requests = tables.requests_for(id).next().is_some();
        let offer = tables
            .offers
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Offer {id} not found")))?;

        let changes_quantity = update
            .shared_quantity
            .is_some_and(|q| q != offer.shared_quantity);
        if changes_quantity && has_requests {
            return Err(AppError::conflict(
                "Quantity cannot change once the offer has been requested",
            ));
        }

        update.apply(offer, now);
        Ok(offer.clone())
    }

    async fn delete_offer(&self, id: OfferId) -> AppResult<()> {
        let mut tables = self.lock().await;
        if !tables.offers.contains_key(&id) {
            return Err(AppError::not_found(format!("Offer {id} not found")));
        }
        if tables.requests_for(id).any(|r| r.is_active()) {
            return Err(AppError::conflict("Offer has an active request"));
        }
        tables.requests.retain(|_, r| r.shared_resource_id != id);
        tables.offers.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl RequestStore for MemoryStore {
    async fn insert_request(&self, request: &ResourceRequest) -> AppResult<ResourceRequest> {
        let mut tables = self.lock().await;
        let offer_id = request.shared_resource_id;
        let offer = tables
            .offers
            .get(&offer_id)
            .ok_or_else(|| AppError::not_found(format!("Offer {offer_id} not found")))?;
        if offer.status != OfferStatus::Available {
            return Err(AppError::conflict(format!(
                "Offer {offer_id} was {} concurrently",
                offer.status
            )));
        }
        if tables.active_request(offer_id, request.requester_id).is_some() {
            return Err(AppError::conflict(
                "An active request for this offer already exists",
            ));
        }
        tables.requests.insert(request.id, request.clone());
        Ok(request.clone())
    }

    async fn find_request(&self, id: RequestId) -> AppResult<Option<ResourceRequest>> {
        Ok(self.lock().await.requests.get(&id).cloned())
    }

    async fn find_active_request(
        &self,
        offer_id: OfferId,
        requester_id: UserId,
    ) -> AppResult<Option<ResourceRequest>> {
        let tables = self.lock().await;
        Ok(tables.active_request(offer_id, requester_id).cloned())
    }

    async fn list_requests_by_offer(&self, offer_id: OfferId) -> AppResult<Vec<ResourceRequest>> {
        let tables = self.lock().await;
        Ok(newest_first(tables.requests_for(offer_id).cloned().collect()))
    }

    async fn list_requests_by_requester(
        &self,
        requester_id: UserId,
    ) -> AppResult<Vec<ResourceRequest>> {
        let tables = self.lock().await;
        Ok(newest_first(
            tables
                .requests
                .values()
                .filter(|r| r.requester_id == requester_id)
                .cloned()
                .collect(),
        ))
    }

    async fn apply_transition(&self, cmd: &TransitionCommand) -> AppResult<TransitionOutcome> {
        let mut tables = self.lock().await;

        let current = tables
            .requests
            .get(&cmd.request_id)
            .ok_or_else(|| AppError::not_found(format!("Request {} not found", cmd.request_id)))?;
        if current.status != cmd.expected_status || current.version != cmd.expected_version {
            return Err(AppError::conflict(format!(
                "Request {} changed concurrently",
                cmd.request_id
            )));
        }
        let next = current.transitioned(cmd);
        let offer_id = next.shared_resource_id;

        let held_elsewhere = tables.requests_for(offer_id).any(|r| {
            r.id != cmd.request_id && r.status == RequestStatus::Approved
        });
        let offer = tables
            .offers
            .get(&offer_id)
            .ok_or_else(|| AppError::not_found(format!("Offer {offer_id} not found")))?;

        let new_status = resolve_offer_status(cmd.offer_effect(), offer, held_elsewhere)?;

        let mut offer = offer.clone();
        if let Some(status) = new_status {
            offer.status = status;
            offer.updated_at = cmd.at;
            tables.offers.insert(offer_id, offer.clone());
        }
        tables.requests.insert(next.id, next.clone());

        Ok(TransitionOutcome {
            request: next,
            offer,
        })
    }
}
