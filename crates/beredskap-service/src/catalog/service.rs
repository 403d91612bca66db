//! Catalog resource CRUD service.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use beredskap_cache::CacheManager;
use beredskap_core::error::AppError;
use beredskap_core::result::AppResult;
use beredskap_core::types::id::CatalogResourceId;
use beredskap_database::store::CatalogStore;
use beredskap_entity::catalog::{CatalogResource, CatalogUpdate, NewCatalogResource};

use crate::context::RequestContext;
use crate::validation::{non_blank, positive_quantity};

/// Manages the resources each user holds.
#[derive(Debug, Clone)]
pub struct ResourceCatalogService {
    /// Catalog store.
    store: Arc<dyn CatalogStore>,
    /// Cache component.
    cache: CacheManager,
}

/// Request to add a resource to the caller's catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddResourceRequest {
    /// Display name.
    pub name: String,
    /// Category.
    pub category: String,
    /// Quantity held.
    pub quantity: i32,
    /// Unit of the quantity.
    pub unit: Option<String>,
}

impl ResourceCatalogService {
    /// Creates a new catalog service.
    pub fn new(store: Arc<dyn CatalogStore>, cache: CacheManager) -> Self {
        Self { store, cache }
    }

    /// Adds a resource owned by the caller.
    pub async fn add_resource(
        &self,
        ctx: &RequestContext,
        req: AddResourceRequest,
    ) -> AppResult<CatalogResource> {
        let name = non_blank(&req.name, "name")?;
        positive_quantity(req.quantity, "quantity")?;

        let resource = NewCatalogResource {
            owner_id: ctx.user_id,
            name,
            category: req.category.trim().to_string(),
            quantity: req.quantity,
            unit: req.unit.filter(|u| !u.trim().is_empty()),
        }
        .into_resource(Utc::now());

        let resource = self.store.insert_resource(&resource).await?;
        self.cache.put_catalog_resource(&resource).await;

        info!(
            resource_id = %resource.id,
            owner_id = %ctx.user_id,
            name = %resource.name,
            quantity = resource.quantity,
            "Catalog resource added"
        );
        Ok(resource)
    }

    /// Gets a resource by ID, reading through the cache.
    pub async fn get_resource(&self, id: CatalogResourceId) -> AppResult<CatalogResource> {
        if let Some(resource) = self.cache.catalog_resource(id).await {
            return Ok(resource);
        }
        let resource = self
            .store
            .find_resource(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Catalog resource {id} not found")))?;
        self.cache.put_catalog_resource(&resource).await;
        Ok(resource)
    }

    /// Lists the caller's resources, newest first.
    pub async fn list_own(&self, ctx: &RequestContext) -> AppResult<Vec<CatalogResource>> {
        self.store.list_resources_by_owner(ctx.user_id).await
    }

    /// Updates a resource. Only the owner may do this.
    pub async fn update_resource(
        &self,
        ctx: &RequestContext,
        id: CatalogResourceId,
        mut update: CatalogUpdate,
    ) -> AppResult<CatalogResource> {
        if let Some(name) = update.name.as_deref() {
            update.name = Some(non_blank(name, "name")?);
        }
        if let Some(quantity) = update.quantity {
            positive_quantity(quantity, "quantity")?;
        }

        let mut resource = self
            .store
            .find_resource(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Catalog resource {id} not found")))?;

        if !ctx.is(resource.owner_id) {
            return Err(AppError::authorization(
                "Only the owner can update this resource",
            ));
        }

        update.apply(&mut resource, Utc::now());
        let updated = self.store.update_resource(&resource).await?;
        self.cache.invalidate_catalog_resource(id).await;

        info!(resource_id = %id, owner_id = %ctx.user_id, "Catalog resource updated");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beredskap_core::error::ErrorKind;
    use beredskap_core::types::id::UserId;
    use beredskap_database::MemoryStore;

    fn service() -> ResourceCatalogService {
        ResourceCatalogService::new(Arc::new(MemoryStore::new()), CacheManager::disabled())
    }

    fn tent(quantity: i32) -> AddResourceRequest {
        AddResourceRequest {
            name: "tält".to_string(),
            category: "shelter".to_string(),
            quantity,
            unit: Some("st".to_string()),
        }
    }

    #[tokio::test]
    async fn test_add_and_list_own() {
        let catalog = service();
        let owner = RequestContext::new(UserId::new(), "Anna");
        let other = RequestContext::new(UserId::new(), "Bertil");

        let resource = catalog.add_resource(&owner, tent(2)).await.unwrap();
        assert_eq!(resource.owner_id, owner.user_id);

        assert_eq!(catalog.list_own(&owner).await.unwrap().len(), 1);
        assert!(catalog.list_own(&other).await.unwrap().is_empty());
        assert_eq!(catalog.get_resource(resource.id).await.unwrap(), resource);
    }

    #[tokio::test]
    async fn test_add_rejects_bad_input() {
        let catalog = service();
        let owner = RequestContext::new(UserId::new(), "Anna");

        let err = catalog.add_resource(&owner, tent(0)).await.unwrap_err();
        assert!(err.is(ErrorKind::Validation));

        let mut blank = tent(1);
        blank.name = "   ".to_string();
        let err = catalog.add_resource(&owner, blank).await.unwrap_err();
        assert!(err.is(ErrorKind::Validation));
        assert!(catalog.list_own(&owner).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_only_owner_updates() {
        let catalog = service();
        let owner = RequestContext::new(UserId::new(), "Anna");
        let other = RequestContext::new(UserId::new(), "Bertil");
        let resource = catalog.add_resource(&owner, tent(1)).await.unwrap();

        let update = CatalogUpdate {
            quantity: Some(3),
            ..Default::default()
        };
        let err = catalog
            .update_resource(&other, resource.id, update.clone())
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Authorization));

        let updated = catalog
            .update_resource(&owner, resource.id, update)
            .await
            .unwrap();
        assert_eq!(updated.quantity, 3);
    }

    #[tokio::test]
    async fn test_unknown_resource_is_not_found() {
        let err = service()
            .get_resource(CatalogResourceId::new())
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::NotFound));
    }
}
