//! A cache that stores nothing.

use std::time::Duration;

use async_trait::async_trait;

use beredskap_core::result::AppResult;
use beredskap_core::traits::cache::CacheProvider;

/// Provider whose lookups always miss.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledCacheProvider;

#[async_trait]
impl CacheProvider for DisabledCacheProvider {
    async fn get(&self, _key: &str) -> AppResult<Option<String>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> AppResult<()> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> AppResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
