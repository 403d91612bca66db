//! # beredskap-cache
//!
//! The cache component used by the sharing services. Three providers:
//!
//! - **memory**: in-process cache using [moka](https://crates.io/crates/moka)
//!   with per-entry expiry
//! - **redis**: Redis-backed cache using the [redis](https://crates.io/crates/redis) crate
//! - **disabled**: every lookup misses; used by tests that need the store as
//!   the only source of truth
//!
//! The provider is selected at runtime based on configuration. Keys are built
//! from an entity class and an id; each class has its own TTL.

pub mod disabled;
pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use disabled::DisabledCacheProvider;
pub use keys::EntityClass;
pub use provider::CacheManager;
