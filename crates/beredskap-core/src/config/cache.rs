//! Cache component configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache provider type: `"memory"`, `"redis"`, or `"disabled"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// TTL per entity class.
    #[serde(default)]
    pub ttl: EntityTtlConfig,
    /// Redis-specific cache configuration.
    #[serde(default)]
    pub redis: RedisCacheConfig,
    /// In-memory cache configuration.
    #[serde(default)]
    pub memory: MemoryCacheConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            ttl: EntityTtlConfig::default(),
            redis: RedisCacheConfig::default(),
            memory: MemoryCacheConfig::default(),
        }
    }
}

/// Time-to-live for each cached entity class, in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityTtlConfig {
    /// Shared resource offers.
    #[serde(default = "default_offer_ttl")]
    pub offer_seconds: u64,
    /// Catalog resources.
    #[serde(default = "default_catalog_ttl")]
    pub catalog_resource_seconds: u64,
    /// Community member lists from the membership gate.
    #[serde(default = "default_members_ttl")]
    pub community_members_seconds: u64,
}

impl Default for EntityTtlConfig {
    fn default() -> Self {
        Self {
            offer_seconds: default_offer_ttl(),
            catalog_resource_seconds: default_catalog_ttl(),
            community_members_seconds: default_members_ttl(),
        }
    }
}

impl EntityTtlConfig {
    /// TTL for offers.
    pub fn offer(&self) -> Duration {
        Duration::from_secs(self.offer_seconds)
    }

    /// TTL for catalog resources.
    pub fn catalog_resource(&self) -> Duration {
        Duration::from_secs(self.catalog_resource_seconds)
    }

    /// TTL for community member lists.
    pub fn community_members(&self) -> Duration {
        Duration::from_secs(self.community_members_seconds)
    }
}

/// Redis cache backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisCacheConfig {
    /// Redis connection URL.
    #[serde(default = "default_redis_url")]
    pub url: String,
    /// Key prefix for all Beredskap cache keys.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for RedisCacheConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            key_prefix: default_key_prefix(),
        }
    }
}

/// In-memory cache backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryCacheConfig {
    /// Maximum number of entries in the cache.
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
}

impl Default for MemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: default_max_capacity(),
        }
    }
}

fn default_provider() -> String {
    "memory".to_string()
}

fn default_offer_ttl() -> u64 {
    30
}

fn default_catalog_ttl() -> u64 {
    300
}

fn default_members_ttl() -> u64 {
    60
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_key_prefix() -> String {
    "beredskap:".to_string()
}

fn default_max_capacity() -> u64 {
    10000
}
