//! Request context carrying the identity asserted by the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use beredskap_core::types::id::UserId;

/// Context for the current request.
///
/// Built by the API layer from identity-provider headers and passed into
/// every service method so each operation knows *who* is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The acting user's ID.
    pub user_id: UserId,
    /// Display name shown to other members (notifications, chat).
    pub display_name: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: UserId, display_name: impl Into<String>) -> Self {
        Self {
            user_id,
            display_name: display_name.into(),
            request_time: Utc::now(),
        }
    }

    /// Returns whether `user_id` is the acting user.
    pub fn is(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }
}
