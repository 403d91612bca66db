//! Resource request entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use beredskap_core::types::id::{OfferId, RequestId, UserId};

use super::status::RequestStatus;
use super::transition::{RequestTransition, TransitionCommand};

/// One requester's claim against an offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ResourceRequest {
    /// Unique request identifier.
    pub id: RequestId,
    /// The offer requested. A reference, not ownership.
    pub shared_resource_id: OfferId,
    /// The requesting user.
    pub requester_id: UserId,
    /// Quantity asked for. Always positive.
    pub requested_quantity: i32,
    /// Lifecycle status.
    pub status: RequestStatus,
    /// Message from the requester.
    pub message: Option<String>,
    /// Response from the owner on approve/deny.
    pub response_message: Option<String>,
    /// When the request was made.
    pub requested_at: DateTime<Utc>,
    /// When the owner approved or denied.
    pub responded_at: Option<DateTime<Utc>>,
    /// When an approved request was completed.
    pub completed_at: Option<DateTime<Utc>>,
    /// Incremented by every transition.
    pub version: i32,
}

impl ResourceRequest {
    /// Whether the request is pending or approved.
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Whether `transition` may be applied to the current status.
    pub fn can(&self, transition: RequestTransition) -> bool {
        transition.accepts(self.status)
    }

    /// Build a command that applies `transition` against the state seen now.
    pub fn command(
        &self,
        transition: RequestTransition,
        response_message: Option<String>,
        at: DateTime<Utc>,
    ) -> TransitionCommand {
        TransitionCommand {
            request_id: self.id,
            transition,
            expected_status: self.status,
            expected_version: self.version,
            response_message,
            at,
        }
    }

    /// Row after applying `cmd`. Callers check status and version first.
    pub fn transitioned(&self, cmd: &TransitionCommand) -> ResourceRequest {
        let mut next = self.clone();
        next.status = cmd.transition.target();
        next.version = self.version + 1;
        if cmd.transition.records_response() {
            next.responded_at = Some(cmd.at);
            next.response_message = cmd.response_message.clone();
        }
        if cmd.transition == RequestTransition::Complete {
            next.completed_at = Some(cmd.at);
        }
        next
    }
}

/// Data required to file a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRequest {
    /// Offer requested.
    pub offer_id: OfferId,
    /// Requesting user.
    pub requester_id: UserId,
    /// Quantity asked for.
    pub quantity: i32,
    /// Message to the owner.
    pub message: Option<String>,
}

impl NewRequest {
    /// Materialize the pending row this insert will produce.
    pub fn into_request(self, now: DateTime<Utc>) -> ResourceRequest {
        ResourceRequest {
            id: RequestId::new(),
            shared_resource_id: self.offer_id,
            requester_id: self.requester_id,
            requested_quantity: self.quantity,
            status: RequestStatus::Pending,
            message: self.message,
            response_message: None,
            requested_at: now,
            responded_at: None,
            completed_at: None,
            version: 0,
        }
    }
}
