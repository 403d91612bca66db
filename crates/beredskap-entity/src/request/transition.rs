//! Named request transitions.
//!
//! Every status change of a request, and every offer status change coupled
//! to it, is described by a [`RequestTransition`]. Stores apply a
//! [`TransitionCommand`] atomically; nothing else writes either status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use beredskap_core::types::id::RequestId;

use super::status::RequestStatus;

/// A named edge of the request state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestTransition {
    /// pending → approved
    Approve,
    /// pending → denied
    Deny,
    /// approved → completed
    Complete,
    /// pending | approved → cancelled
    Cancel,
}

/// What a transition does to the offer the request points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferEffect {
    /// Offer status is left alone.
    Unchanged,
    /// Offer becomes `taken`.
    Take,
    /// Offer becomes `available` unless another approved request still holds it.
    Release,
}

impl RequestTransition {
    /// Source states this transition accepts.
    pub fn sources(&self) -> &'static [RequestStatus] {
        match self {
            Self::Approve | Self::Deny => &[RequestStatus::Pending],
            Self::Complete => &[RequestStatus::Approved],
            Self::Cancel => &[RequestStatus::Pending, RequestStatus::Approved],
        }
    }

    /// Status after the transition.
    pub fn target(&self) -> RequestStatus {
        match self {
            Self::Approve => RequestStatus::Approved,
            Self::Deny => RequestStatus::Denied,
            Self::Complete => RequestStatus::Completed,
            Self::Cancel => RequestStatus::Cancelled,
        }
    }

    /// Whether the transition may start from `from`.
    pub fn accepts(&self, from: RequestStatus) -> bool {
        self.sources().contains(&from)
    }

    /// Offer side effect when leaving `from`.
    pub fn offer_effect(&self, from: RequestStatus) -> OfferEffect {
        match (self, from) {
            (Self::Approve, _) => OfferEffect::Take,
            (Self::Deny, _) | (Self::Complete, _) => OfferEffect::Release,
            (Self::Cancel, RequestStatus::Approved) => OfferEffect::Release,
            (Self::Cancel, _) => OfferEffect::Unchanged,
        }
    }

    /// Whether the transition records `responded_at`.
    pub fn records_response(&self) -> bool {
        matches!(self, Self::Approve | Self::Deny)
    }

    /// Return the transition as a lowercase verb.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Deny => "deny",
            Self::Complete => "complete",
            Self::Cancel => "cancel",
        }
    }
}

impl fmt::Display for RequestTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A transition bound to the request state observed by the caller.
///
/// The store re-reads the request under lock and rejects the command with a
/// conflict when status or version no longer match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionCommand {
    /// Request to transition.
    pub request_id: RequestId,
    /// The transition to apply.
    pub transition: RequestTransition,
    /// Status the caller saw.
    pub expected_status: RequestStatus,
    /// Version the caller saw.
    pub expected_version: i32,
    /// Owner's response, for approve/deny.
    pub response_message: Option<String>,
    /// Timestamp recorded on the request.
    pub at: DateTime<Utc>,
}

impl TransitionCommand {
    /// Offer side effect of this command.
    pub fn offer_effect(&self) -> OfferEffect {
        self.transition.offer_effect(self.expected_status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [RequestStatus; 5] = [
        RequestStatus::Pending,
        RequestStatus::Approved,
        RequestStatus::Denied,
        RequestStatus::Completed,
        RequestStatus::Cancelled,
    ];

    #[test]
    fn test_terminal_states_accept_nothing() {
        let transitions = [
            RequestTransition::Approve,
            RequestTransition::Deny,
            RequestTransition::Complete,
            RequestTransition::Cancel,
        ];
        for status in ALL.iter().filter(|s| s.is_terminal()) {
            for t in &transitions {
                assert!(!t.accepts(*status), "{t} accepted from {status}");
            }
        }
    }

    #[test]
    fn test_complete_requires_approved() {
        for status in ALL {
            assert_eq!(
                RequestTransition::Complete.accepts(status),
                status == RequestStatus::Approved
            );
        }
    }

    #[test]
    fn test_offer_effects() {
        assert_eq!(
            RequestTransition::Approve.offer_effect(RequestStatus::Pending),
            OfferEffect::Take
        );
        assert_eq!(
            RequestTransition::Deny.offer_effect(RequestStatus::Pending),
            OfferEffect::Release
        );
        assert_eq!(
            RequestTransition::Cancel.offer_effect(RequestStatus::Pending),
            OfferEffect::Unchanged
        );
        assert_eq!(
            RequestTransition::Cancel.offer_effect(RequestStatus::Approved),
            OfferEffect::Release
        );
    }
}
