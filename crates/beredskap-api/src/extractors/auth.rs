//! `AuthUser` extractor: builds the request context from identity-provider headers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use beredskap_core::types::id::UserId;
use beredskap_service::context::RequestContext;

use crate::error::ApiError;

/// Header carrying the caller's user id.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the caller's display name.
pub const USER_NAME_HEADER: &str = "x-user-name";

/// Identity asserted by the upstream identity provider.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl AuthUser {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthenticated("Missing X-User-Id header".to_string()))?;
        let user_id: UserId = user_id
            .trim()
            .parse()
            .map_err(|_| ApiError::Unauthenticated("X-User-Id is not a valid UUID".to_string()))?;

        let display_name = parts
            .headers
            .get(USER_NAME_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ApiError::Unauthenticated("Missing X-User-Name header".to_string()))?;

        Ok(AuthUser(RequestContext::new(user_id, display_name)))
    }
}
