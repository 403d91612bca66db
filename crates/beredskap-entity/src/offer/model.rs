//! Shared resource offer entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use beredskap_core::types::id::{CatalogResourceId, CommunityId, OfferId, UserId};

use super::status::OfferStatus;

/// An owner's offer of a catalog resource to a community.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SharedResource {
    /// Unique offer identifier.
    pub id: OfferId,
    /// Owner of the offer.
    pub owner_id: UserId,
    /// Community the offer is published to.
    pub community_id: CommunityId,
    /// Catalog resource being offered.
    pub catalog_resource_id: CatalogResourceId,
    /// Quantity offered. Always positive.
    pub shared_quantity: i32,
    /// End of the availability window.
    pub available_until: Option<DateTime<Utc>>,
    /// Current availability.
    pub status: OfferStatus,
    /// Pickup location.
    pub location: Option<String>,
    /// Free-text notes.
    pub notes: Option<String>,
    /// When the offer was created.
    pub created_at: DateTime<Utc>,
    /// When the offer was last changed.
    pub updated_at: DateTime<Utc>,
}

impl SharedResource {
    /// Whether the availability window has closed.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.available_until.map(|until| until <= now).unwrap_or(false)
    }

    /// Whether `user_id` owns this offer.
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }
}

/// Data required to publish an offer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOffer {
    /// Owner of the offer.
    pub owner_id: UserId,
    /// Target community.
    pub community_id: CommunityId,
    /// Catalog resource offered.
    pub catalog_resource_id: CatalogResourceId,
    /// Quantity offered.
    pub shared_quantity: i32,
    /// End of the availability window.
    pub available_until: Option<DateTime<Utc>>,
    /// Pickup location.
    pub location: Option<String>,
    /// Free-text notes.
    pub notes: Option<String>,
}

impl NewOffer {
    /// Materialize the row this insert will produce. New offers are available.
    pub fn into_offer(self, now: DateTime<Utc>) -> SharedResource {
        SharedResource {
            id: OfferId::new(),
            owner_id: self.owner_id,
            community_id: self.community_id,
            catalog_resource_id: self.catalog_resource_id,
            shared_quantity: self.shared_quantity,
            available_until: self.available_until,
            status: OfferStatus::Available,
            location: self.location,
            notes: self.notes,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Owner-editable offer fields. Status is deliberately absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OfferUpdate {
    /// New quantity. Rejected once requests exist.
    pub shared_quantity: Option<i32>,
    /// New availability end; `Some(None)` removes the limit.
    pub available_until: Option<Option<DateTime<Utc>>>,
    /// New location; `Some(None)` clears it.
    pub location: Option<Option<String>>,
    /// New notes; `Some(None)` clears them.
    pub notes: Option<Option<String>>,
}

impl OfferUpdate {
    /// Apply the update to an existing row.
    pub fn apply(self, offer: &mut SharedResource, now: DateTime<Utc>) {
        if let Some(quantity) = self.shared_quantity {
            offer.shared_quantity = quantity;
        }
        if let Some(until) = self.available_until {
            offer.available_until = until;
        }
        if let Some(location) = self.location {
            offer.location = location;
        }
        if let Some(notes) = self.notes {
            offer.notes = notes;
        }
        offer.updated_at = now;
    }
}

/// An offer as seen by one community member, with derived request counts.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OfferListing {
    /// The offer row.
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub offer: SharedResource,
    /// Catalog resource name.
    pub resource_name: String,
    /// Catalog resource category.
    pub resource_category: String,
    /// Whether the viewing user has a pending or approved request on it.
    pub has_active_request: bool,
    /// Number of pending requests from all members.
    pub pending_request_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample(until: Option<DateTime<Utc>>) -> SharedResource {
        NewOffer {
            owner_id: UserId::new(),
            community_id: CommunityId::new(),
            catalog_resource_id: CatalogResourceId::new(),
            shared_quantity: 1,
            available_until: until,
            location: None,
            notes: None,
        }
        .into_offer(Utc::now())
    }

    #[test]
    fn test_new_offer_is_available() {
        assert_eq!(sample(None).status, OfferStatus::Available);
    }

    #[test]
    fn test_expiry() {
        let now = Utc::now();
        assert!(!sample(None).is_expired(now));
        assert!(sample(Some(now - Duration::minutes(1))).is_expired(now));
        assert!(!sample(Some(now + Duration::days(2))).is_expired(now));
    }

    #[test]
    fn test_update_clears_optional_fields() {
        let mut offer = sample(None);
        offer.location = Some("Storgatan 1".to_string());
        OfferUpdate {
            location: Some(None),
            notes: Some(Some("hämtas efter 18".to_string())),
            ..Default::default()
        }
        .apply(&mut offer, Utc::now());
        assert_eq!(offer.location, None);
        assert_eq!(offer.notes.as_deref(), Some("hämtas efter 18"));
        assert_eq!(offer.status, OfferStatus::Available);
    }
}
