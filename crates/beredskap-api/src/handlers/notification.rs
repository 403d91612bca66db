//! Notification handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use beredskap_core::types::id::NotificationId;
use beredskap_entity::notification::Notification;

use crate::dto::request::NotificationQuery;
use crate::dto::response::{ApiResponse, ChangedResponse, CountResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<NotificationQuery>,
) -> Result<Json<ApiResponse<Vec<Notification>>>, ApiError> {
    let notifications = state
        .notifications
        .list(&auth, query.unread_only, query.limit)
        .await?;
    Ok(Json(ApiResponse::ok(notifications)))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let count = state.notifications.unread_count(&auth).await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// PUT /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<NotificationId>,
) -> Result<Json<ApiResponse<ChangedResponse>>, ApiError> {
    let changed = state.notifications.mark_read(&auth, id).await?;
    Ok(Json(ApiResponse::ok(ChangedResponse { changed })))
}

/// PUT /api/notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<ChangedResponse>>, ApiError> {
    let changed = state.notifications.mark_all_read(&auth).await?;
    Ok(Json(ApiResponse::ok(ChangedResponse { changed })))
}
