//! Request DTOs with validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use beredskap_core::error::AppError;
use beredskap_core::result::AppResult;
use beredskap_core::types::id::{CatalogResourceId, CommunityId};
use beredskap_entity::catalog::CatalogUpdate;
use beredskap_entity::message::MessageTarget;
use beredskap_entity::offer::{OfferStatus, OfferUpdate};
use beredskap_service::{AddResourceRequest, CreateOfferRequest, SendMessageRequest};

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Add a catalog resource.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateResourceRequest {
    /// Display name.
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,
    /// Category.
    #[validate(length(max = 100))]
    pub category: String,
    /// Quantity held.
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    /// Unit of the quantity.
    #[validate(length(max = 50))]
    pub unit: Option<String>,
}

impl From<CreateResourceRequest> for AddResourceRequest {
    fn from(req: CreateResourceRequest) -> Self {
        Self {
            name: req.name,
            category: req.category,
            quantity: req.quantity,
            unit: req.unit,
        }
    }
}

/// Edit a catalog resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateResourceRequest {
    /// New name.
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    /// New category.
    #[validate(length(max = 100))]
    pub category: Option<String>,
    /// New quantity.
    #[validate(range(min = 1))]
    pub quantity: Option<i32>,
    /// New unit; `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    pub unit: Option<Option<String>>,
}

impl From<UpdateResourceRequest> for CatalogUpdate {
    fn from(req: UpdateResourceRequest) -> Self {
        Self {
            name: req.name,
            category: req.category,
            quantity: req.quantity,
            unit: req.unit,
        }
    }
}

/// Publish an offer to a community.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateOfferBody {
    /// Catalog resource offered.
    pub catalog_resource_id: CatalogResourceId,
    /// Quantity offered.
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    /// End of the availability window.
    pub available_until: Option<DateTime<Utc>>,
    /// Pickup location.
    #[validate(length(max = 200))]
    pub location: Option<String>,
    /// Free-text notes.
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

impl CreateOfferBody {
    /// Attach the community from the path.
    pub fn into_request(self, community_id: CommunityId) -> CreateOfferRequest {
        CreateOfferRequest {
            community_id,
            catalog_resource_id: self.catalog_resource_id,
            quantity: self.quantity,
            available_until: self.available_until,
            location: self.location,
            notes: self.notes,
        }
    }
}

/// Edit an offer. Omitted fields are left alone; `null` clears optional ones.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateOfferBody {
    /// New quantity.
    #[validate(range(min = 1))]
    pub quantity: Option<i32>,
    /// New availability end.
    #[serde(default, deserialize_with = "double_option")]
    pub available_until: Option<Option<DateTime<Utc>>>,
    /// New pickup location.
    #[serde(default, deserialize_with = "double_option")]
    pub location: Option<Option<String>>,
    /// New notes.
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
}

impl From<UpdateOfferBody> for OfferUpdate {
    fn from(body: UpdateOfferBody) -> Self {
        Self {
            shared_quantity: body.quantity,
            available_until: body.available_until,
            location: body.location,
            notes: body.notes,
        }
    }
}

/// Query string for offer listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListOffersQuery {
    /// Comma-separated statuses to hide. Defaults to `taken`; empty shows all.
    pub exclude: Option<String>,
}

impl ListOffersQuery {
    /// Parse the excluded statuses, `None` meaning the default.
    pub fn excluded(&self) -> AppResult<Option<Vec<OfferStatus>>> {
        let Some(raw) = self.exclude.as_deref() else {
            return Ok(None);
        };
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| match s {
                "available" => Ok(OfferStatus::Available),
                "requested" => Ok(OfferStatus::Requested),
                "taken" => Ok(OfferStatus::Taken),
                other => Err(AppError::validation(format!("Unknown offer status '{other}'"))),
            })
            .collect::<AppResult<Vec<_>>>()
            .map(Some)
    }
}

/// Ask for an offered resource.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateResourceRequestBody {
    /// Quantity asked for.
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    /// Message to the owner.
    #[validate(length(max = 1000))]
    pub message: Option<String>,
}

/// Owner's answer to a request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RespondRequestBody {
    /// Optional response shown to the requester.
    #[validate(length(max = 1000))]
    pub response_message: Option<String>,
}

/// Query string for notification listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationQuery {
    /// Only unread notifications.
    #[serde(default)]
    pub unread_only: bool,
    /// Page size.
    pub limit: Option<u32>,
}

/// Send a chat message.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendMessageBody {
    /// Message body.
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    /// `{"type": "direct"|"community", "id": "<uuid>"}`.
    pub target: MessageTarget,
    /// Emergency flag.
    #[serde(default)]
    pub is_emergency: bool,
}

impl From<SendMessageBody> for SendMessageRequest {
    fn from(body: SendMessageBody) -> Self {
        Self {
            content: body.content,
            target: body.target,
            is_emergency: body.is_emergency,
        }
    }
}

/// Query string for message history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageListQuery {
    /// Number of most recent messages.
    pub limit: Option<u32>,
}

/// Query string for the message WebSocket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsQuery {
    /// `direct:<uuid>` or `community:<uuid>`.
    pub target: String,
}
