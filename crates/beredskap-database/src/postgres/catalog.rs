//! Catalog resource queries.

use async_trait::async_trait;

use beredskap_core::error::AppError;
use beredskap_core::result::AppResult;
use beredskap_core::types::id::{CatalogResourceId, UserId};
use beredskap_entity::catalog::CatalogResource;

use super::{PgStore, db_err};
use crate::store::CatalogStore;

#[async_trait]
impl CatalogStore for PgStore {
    async fn insert_resource(&self, resource: &CatalogResource) -> AppResult<CatalogResource> {
        sqlx::query_as::<_, CatalogResource>(
            "INSERT INTO catalog_resources (id, owner_id, name, category, quantity, unit, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(resource.id)
        .bind(resource.owner_id)
        .bind(&resource.name)
        .bind(&resource.category)
        .bind(resource.quantity)
        .bind(&resource.unit)
        .bind(resource.created_at)
        .bind(resource.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to insert catalog resource"))
    }

    async fn find_resource(&self, id: CatalogResourceId) -> AppResult<Option<CatalogResource>> {
        sqlx::query_as::<_, CatalogResource>("SELECT * FROM catalog_resources WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find catalog resource"))
    }

    async fn list_resources_by_owner(&self, owner_id: UserId) -> AppResult<Vec<CatalogResource>> {
        sqlx::query_as::<_, CatalogResource>(
            "SELECT * FROM catalog_resources WHERE owner_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to list catalog resources"))
    }

    async fn update_resource(&self, resource: &CatalogResource) -> AppResult<CatalogResource> {
        sqlx::query_as::<_, CatalogResource>(
            "UPDATE catalog_resources SET name = $2, category = $3, quantity = $4, unit = $5, updated_at = $6 \
             WHERE id = $1 RETURNING *",
        )
        .bind(resource.id)
        .bind(&resource.name)
        .bind(&resource.category)
        .bind(resource.quantity)
        .bind(&resource.unit)
        .bind(resource.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to update catalog resource"))?
        .ok_or_else(|| AppError::not_found(format!("Catalog resource {} not found", resource.id)))
    }
}
