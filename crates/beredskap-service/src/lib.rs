//! # beredskap-service
//!
//! Business logic for the Beredskap sharing core. Each service orchestrates
//! stores, the cache component, the membership gate, and the message hub to
//! implement one component:
//!
//! - [`ResourceCatalogService`]: resources a user holds
//! - [`SharingLedgerService`]: offers of those resources to a community
//! - [`RequestTrackerService`]: the request lifecycle state machine
//! - [`NotificationDispatcher`]: deduplicated per-user notifications
//! - [`MessageRouter`]: direct and community chat
//!
//! Services take every dependency at construction time as `Arc` handles.

pub mod catalog;
pub mod context;
pub mod membership;
pub mod message;
pub mod notification;
pub mod request;
pub mod sharing;
mod validation;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use beredskap_cache::CacheManager;
use beredskap_core::config::{NotificationConfig, RealtimeConfig};
use beredskap_database::store::Stores;
use beredskap_realtime::MessageHub;

pub use catalog::{AddResourceRequest, ResourceCatalogService};
pub use context::RequestContext;
pub use membership::CommunityDirectory;
pub use message::{MessageRouter, SendMessageRequest};
pub use notification::{NotificationDispatcher, NotificationFormatter};
pub use request::RequestTrackerService;
pub use sharing::{CreateOfferRequest, SharingLedgerService};

/// Every service, wired over one set of stores.
#[derive(Debug, Clone)]
pub struct Services {
    /// Resource catalog.
    pub catalog: Arc<ResourceCatalogService>,
    /// Sharing ledger.
    pub ledger: Arc<SharingLedgerService>,
    /// Request tracker.
    pub requests: Arc<RequestTrackerService>,
    /// Notification dispatcher.
    pub notifications: Arc<NotificationDispatcher>,
    /// Message router.
    pub messages: Arc<MessageRouter>,
}

impl Services {
    /// Wire all services.
    pub fn new(
        stores: Stores,
        cache: CacheManager,
        hub: Arc<MessageHub>,
        notification_config: NotificationConfig,
        realtime_config: RealtimeConfig,
    ) -> Self {
        let directory = CommunityDirectory::new(stores.membership.clone(), cache.clone());
        let catalog = Arc::new(ResourceCatalogService::new(
            stores.catalog.clone(),
            cache.clone(),
        ));
        let ledger = Arc::new(SharingLedgerService::new(
            stores.offers.clone(),
            catalog.clone(),
            directory.clone(),
            cache.clone(),
        ));
        let notifications = Arc::new(NotificationDispatcher::new(
            stores.notifications.clone(),
            notification_config,
        ));
        let requests = Arc::new(RequestTrackerService::new(
            stores.requests.clone(),
            ledger.clone(),
            catalog.clone(),
            directory.clone(),
            notifications.clone(),
            cache,
        ));
        let messages = Arc::new(MessageRouter::new(
            stores.messages.clone(),
            directory,
            notifications.clone(),
            hub,
            realtime_config,
        ));

        Self {
            catalog,
            ledger,
            requests,
            notifications,
            messages,
        }
    }
}
