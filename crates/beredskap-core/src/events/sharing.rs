//! Resource-sharing domain events.

use serde::{Deserialize, Serialize};

use crate::types::id::{OfferId, RequestId, UserId};

/// Events emitted by request lifecycle transitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SharingEvent {
    /// A member asked for an offered resource.
    RequestCreated {
        /// The new request.
        request_id: RequestId,
        /// The offer requested.
        offer_id: OfferId,
        /// Owner of the offer (the recipient).
        owner_id: UserId,
        /// Display name of the requester.
        requester_name: String,
        /// Name of the catalog resource.
        resource_name: String,
        /// Quantity asked for.
        quantity: i32,
        /// Free-text message from the requester.
        message: Option<String>,
    },
    /// The owner approved a request.
    RequestApproved {
        /// The approved request.
        request_id: RequestId,
        /// The offer it was made against.
        offer_id: OfferId,
        /// The requester (the recipient).
        requester_id: UserId,
        /// Display name of the owner.
        owner_name: String,
        /// Name of the catalog resource.
        resource_name: String,
        /// Optional response from the owner.
        response_message: Option<String>,
    },
    /// The owner denied a request.
    RequestDenied {
        /// The denied request.
        request_id: RequestId,
        /// The offer it was made against.
        offer_id: OfferId,
        /// The requester (the recipient).
        requester_id: UserId,
        /// Display name of the owner.
        owner_name: String,
        /// Name of the catalog resource.
        resource_name: String,
        /// Optional response from the owner.
        response_message: Option<String>,
    },
}
