//! Application state shared across all handlers.

use std::sync::Arc;

use beredskap_cache::CacheManager;
use beredskap_core::config::AppConfig;
use beredskap_realtime::MessageHub;
use beredskap_service::{
    MessageRouter, NotificationDispatcher, RequestTrackerService, ResourceCatalogService,
    Services, SharingLedgerService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Cache component
    pub cache: CacheManager,
    /// Live message fan-out
    pub hub: Arc<MessageHub>,
    /// Resource catalog
    pub catalog: Arc<ResourceCatalogService>,
    /// Sharing ledger
    pub ledger: Arc<SharingLedgerService>,
    /// Request tracker
    pub requests: Arc<RequestTrackerService>,
    /// Notification dispatcher
    pub notifications: Arc<NotificationDispatcher>,
    /// Message router
    pub messages: Arc<MessageRouter>,
}

impl AppState {
    /// Assemble the state from wired services.
    pub fn new(
        config: Arc<AppConfig>,
        services: Services,
        cache: CacheManager,
        hub: Arc<MessageHub>,
    ) -> Self {
        Self {
            config,
            cache,
            hub,
            catalog: services.catalog,
            ledger: services.ledger,
            requests: services.requests,
            notifications: services.notifications,
            messages: services.messages,
        }
    }
}
