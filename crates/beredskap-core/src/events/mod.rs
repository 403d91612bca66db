//! Domain events emitted by the sharing and messaging services.
//!
//! Events are handed to the notification dispatcher, which turns each one
//! into at most one notification per recipient.

pub mod message;
pub mod sharing;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::id::UserId;

pub use message::MessageEvent;
pub use sharing::SharingEvent;

/// Wrapper for all domain events with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Unique event ID.
    pub id: Uuid,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// The user who caused the event.
    pub actor_id: UserId,
    /// The event payload.
    pub payload: EventPayload,
}

/// Union of all domain event types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event")]
pub enum EventPayload {
    /// A resource-sharing event.
    Sharing(SharingEvent),
    /// A chat message event.
    Message(MessageEvent),
}

impl DomainEvent {
    /// Create a new domain event.
    pub fn new(actor_id: UserId, payload: EventPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            actor_id,
            payload,
        }
    }

    /// Shorthand for a sharing event.
    pub fn sharing(actor_id: UserId, event: SharingEvent) -> Self {
        Self::new(actor_id, EventPayload::Sharing(event))
    }

    /// Shorthand for a message event.
    pub fn message(actor_id: UserId, event: MessageEvent) -> Self {
        Self::new(actor_id, EventPayload::Message(event))
    }
}
