//! Shared fixture for service tests: in-memory store, gate, and hub.

use std::sync::Arc;

use beredskap_cache::CacheManager;
use beredskap_core::config::{NotificationConfig, RealtimeConfig};
use beredskap_core::types::id::{CommunityId, UserId};
use beredskap_database::store::Stores;
use beredskap_database::{MemoryMembershipGate, MemoryStore};
use beredskap_entity::catalog::CatalogResource;
use beredskap_entity::offer::SharedResource;
use beredskap_realtime::MessageHub;

use crate::{AddResourceRequest, CreateOfferRequest, RequestContext, Services};

pub(crate) struct Fixture {
    pub services: Services,
    pub gate: Arc<MemoryMembershipGate>,
    pub hub: Arc<MessageHub>,
    pub community: CommunityId,
}

impl Fixture {
    pub async fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let gate = Arc::new(MemoryMembershipGate::new());
        let stores = Stores::from_backend(store, gate.clone());
        let hub = Arc::new(MessageHub::new(16));
        let services = Services::new(
            stores,
            CacheManager::disabled(),
            hub.clone(),
            NotificationConfig::default(),
            RealtimeConfig::default(),
        );
        Self {
            services,
            gate,
            hub,
            community: CommunityId::new(),
        }
    }

    /// A new user who belongs to the fixture community.
    pub async fn member(&self, name: &str) -> RequestContext {
        let ctx = RequestContext::new(UserId::new(), name);
        self.gate.add_member(self.community, ctx.user_id, false).await;
        ctx
    }

    pub async fn resource(&self, owner: &RequestContext, name: &str, quantity: i32) -> CatalogResource {
        self.services
            .catalog
            .add_resource(
                owner,
                AddResourceRequest {
                    name: name.to_string(),
                    category: "shelter".to_string(),
                    quantity,
                    unit: None,
                },
            )
            .await
            .expect("add resource")
    }

    /// Publish `quantity` of a fresh resource to the fixture community.
    pub async fn offer(&self, owner: &RequestContext, name: &str, quantity: i32) -> SharedResource {
        let resource = self.resource(owner, name, quantity).await;
        self.services
            .ledger
            .create_offer(owner, self.offer_request(&resource, quantity))
            .await
            .expect("create offer")
    }

    pub fn offer_request(&self, resource: &CatalogResource, quantity: i32) -> CreateOfferRequest {
        CreateOfferRequest {
            community_id: self.community,
            catalog_resource_id: resource.id,
            quantity,
            available_until: None,
            location: None,
            notes: None,
        }
    }
}
