//! Catalog resource entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use beredskap_core::types::id::{CatalogResourceId, UserId};

/// A resource a user holds and may offer to a community.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CatalogResource {
    /// Unique resource identifier.
    pub id: CatalogResourceId,
    /// The user holding the resource.
    pub owner_id: UserId,
    /// Display name, e.g. "tält".
    pub name: String,
    /// Free-form category such as "shelter" or "water".
    pub category: String,
    /// Quantity held.
    pub quantity: i32,
    /// Unit of the quantity ("st", "liter").
    pub unit: Option<String>,
    /// When the resource was added.
    pub created_at: DateTime<Utc>,
    /// When the resource was last changed.
    pub updated_at: DateTime<Utc>,
}

/// Data required to add a catalog resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCatalogResource {
    /// The owner.
    pub owner_id: UserId,
    /// Display name.
    pub name: String,
    /// Category.
    pub category: String,
    /// Quantity held.
    pub quantity: i32,
    /// Unit of the quantity.
    pub unit: Option<String>,
}

impl NewCatalogResource {
    /// Materialize the row this insert will produce.
    pub fn into_resource(self, now: DateTime<Utc>) -> CatalogResource {
        CatalogResource {
            id: CatalogResourceId::new(),
            owner_id: self.owner_id,
            name: self.name,
            category: self.category,
            quantity: self.quantity,
            unit: self.unit,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of a catalog resource. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogUpdate {
    /// New name.
    pub name: Option<String>,
    /// New category.
    pub category: Option<String>,
    /// New quantity.
    pub quantity: Option<i32>,
    /// New unit; `Some(None)` clears it.
    pub unit: Option<Option<String>>,
}

impl CatalogUpdate {
    /// Apply the update to an existing row.
    pub fn apply(self, resource: &mut CatalogResource, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            resource.name = name;
        }
        if let Some(category) = self.category {
            resource.category = category;
        }
        if let Some(quantity) = self.quantity {
            resource.quantity = quantity;
        }
        if let Some(unit) = self.unit {
            resource.unit = unit;
        }
        resource.updated_at = now;
    }
}
