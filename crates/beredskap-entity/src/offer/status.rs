//! Offer status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Availability of a shared resource offer.
///
/// Only request lifecycle transitions move an offer between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "offer_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OfferStatus {
    /// Open for requests.
    Available,
    /// Legacy value kept for stored rows; no transition produces it.
    Requested,
    /// Reserved by an approved request.
    Taken,
}

impl OfferStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Requested => "requested",
            Self::Taken => "taken",
        }
    }
}

impl fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
