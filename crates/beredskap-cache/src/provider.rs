//! Cache manager that dispatches to the configured provider.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use uuid::Uuid;

use beredskap_core::config::cache::{CacheConfig, EntityTtlConfig};
use beredskap_core::error::AppError;
use beredskap_core::result::AppResult;
use beredskap_core::traits::cache::CacheProvider;
use beredskap_core::types::id::{CatalogResourceId, CommunityId, OfferId, UserId};
use beredskap_entity::catalog::CatalogResource;
use beredskap_entity::offer::SharedResource;

use crate::disabled::DisabledCacheProvider;
use crate::keys;

/// Cache manager that wraps the configured cache provider.
///
/// Typed accessors swallow provider failures: a broken cache degrades to a
/// miss and is logged, it never fails the operation that consulted it.
#[derive(Debug, Clone)]
pub struct CacheManager {
    inner: Arc<dyn CacheProvider>,
    ttl: EntityTtlConfig,
}

impl CacheManager {
    /// Create a new cache manager from configuration.
    pub async fn new(config: &CacheConfig) -> AppResult<Self> {
        let inner: Arc<dyn CacheProvider> = match config.provider.as_str() {
            #[cfg(feature = "redis-backend")]
            "redis" => {
                info!("Initializing Redis cache provider");
                let client = crate::redis::RedisClient::connect(&config.redis).await?;
                Arc::new(crate::redis::RedisCacheProvider::new(client))
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory cache provider");
                Arc::new(crate::memory::MemoryCacheProvider::new(&config.memory))
            }
            "disabled" => {
                info!("Cache disabled");
                Arc::new(DisabledCacheProvider)
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown cache provider: '{other}'. Supported: memory, redis, disabled"
                )));
            }
        };

        Ok(Self {
            inner,
            ttl: config.ttl.clone(),
        })
    }

    /// Create a cache manager from an existing provider (for testing).
    pub fn from_provider(provider: Arc<dyn CacheProvider>, ttl: EntityTtlConfig) -> Self {
        Self {
            inner: provider,
            ttl,
        }
    }

    /// A manager whose lookups always miss.
    pub fn disabled() -> Self {
        Self::from_provider(Arc::new(DisabledCacheProvider), EntityTtlConfig::default())
    }

    async fn fetch<T: DeserializeOwned + Send>(&self, key: &str) -> Option<T> {
        match self.inner.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!(key, error = %e, "Dropping undecodable cache entry");
                    self.invalidate(key).await;
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(key, error = %e, "Cache read failed");
                None
            }
        }
    }

    async fn store<T: Serialize + Send + Sync>(&self, key: &str, value: &T, ttl: Duration) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                warn!(key, error = %e, "Cache entry not serializable");
                return;
            }
        };
        if let Err(e) = self.inner.set(key, &json, ttl).await {
            warn!(key, error = %e, "Cache write failed");
        }
    }

    async fn invalidate(&self, key: &str) {
        if let Err(e) = self.inner.delete(key).await {
            warn!(key, error = %e, "Cache invalidation failed");
        }
    }

    /// Cached offer, if present.
    pub async fn offer(&self, id: OfferId) -> Option<SharedResource> {
        self.fetch(&keys::offer(id)).await
    }

    /// Cache an offer for the offer TTL.
    pub async fn put_offer(&self, offer: &SharedResource) {
        self.store(&keys::offer(offer.id), offer, self.ttl.offer())
            .await;
    }

    /// Cache an offer read from the store, unless the offer was invalidated
    /// since `seen` was taken with [`offer_revision`](Self::offer_revision).
    pub async fn put_offer_if_unchanged(&self, offer: &SharedResource, seen: Option<String>) {
        if self.offer_revision(offer.id).await == seen {
            self.put_offer(offer).await;
        } else {
            debug!(offer_id = %offer.id, "Offer changed during read, not caching");
        }
    }

    /// Current revision token of an offer. Take it before reading the store.
    pub async fn offer_revision(&self, id: OfferId) -> Option<String> {
        match self.inner.get(&keys::offer_revision(id)).await {
            Ok(revision) => revision,
            Err(e) => {
                warn!(offer_id = %id, error = %e, "Cache revision read failed");
                None
            }
        }
    }

    /// Drop a cached offer and rotate its revision, so reads that started
    /// before the change do not cache what they loaded.
    pub async fn invalidate_offer(&self, id: OfferId) {
        let key = keys::offer_revision(id);
        let revision = Uuid::now_v7().to_string();
        if let Err(e) = self.inner.set(&key, &revision, self.ttl.offer()).await {
            warn!(key, error = %e, "Cache revision write failed");
        }
        self.invalidate(&keys::offer(id)).await;
    }

    /// Cached catalog resource, if present.
    pub async fn catalog_resource(&self, id: CatalogResourceId) -> Option<CatalogResource> {
        self.fetch(&keys::catalog_resource(id)).await
    }

    /// Cache a catalog resource for the catalog TTL.
    pub async fn put_catalog_resource(&self, resource: &CatalogResource) {
        self.store(
            &keys::catalog_resource(resource.id),
            resource,
            self.ttl.catalog_resource(),
        )
        .await;
    }

    /// Drop a cached catalog resource.
    pub async fn invalidate_catalog_resource(&self, id: CatalogResourceId) {
        self.invalidate(&keys::catalog_resource(id)).await;
    }

    /// Cached member list, if present.
    pub async fn community_members(&self, id: CommunityId) -> Option<Vec<UserId>> {
        self.fetch(&keys::community_members(id)).await
    }

    /// Cache a member list for the members TTL.
    pub async fn put_community_members(&self, id: CommunityId, members: &[UserId]) {
        self.store(
            &keys::community_members(id),
            &members,
            self.ttl.community_members(),
        )
        .await;
    }
}

#[async_trait]
impl CacheProvider for CacheManager {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        self.inner.set(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.inner.delete(key).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}
