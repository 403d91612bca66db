//! Catalog resource store.

use async_trait::async_trait;

use beredskap_core::result::AppResult;
use beredskap_core::types::id::{CatalogResourceId, UserId};
use beredskap_entity::catalog::CatalogResource;

/// Persistence for catalog resources.
#[async_trait]
pub trait CatalogStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a new resource.
    async fn insert_resource(&self, resource: &CatalogResource) -> AppResult<CatalogResource>;

    /// Find a resource by id.
    async fn find_resource(&self, id: CatalogResourceId) -> AppResult<Option<CatalogResource>>;

    /// All resources held by `owner_id`, newest first.
    async fn list_resources_by_owner(&self, owner_id: UserId) -> AppResult<Vec<CatalogResource>>;

    /// Overwrite the mutable columns of an existing resource.
    async fn update_resource(&self, resource: &CatalogResource) -> AppResult<CatalogResource>;
}
