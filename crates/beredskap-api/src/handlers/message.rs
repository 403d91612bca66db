//! Chat message handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use beredskap_core::types::id::{CommunityId, MessageId, UserId};
use beredskap_entity::message::{Message, MessageTarget};

use crate::dto::request::{MessageListQuery, SendMessageBody};
use crate::dto::response::{ApiResponse, ChangedResponse, CountResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// POST /api/messages
pub async fn send_message(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(body): ValidatedJson<SendMessageBody>,
) -> Result<(StatusCode, Json<ApiResponse<Message>>), ApiError> {
    let message = state.messages.send(&auth, body.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(message))))
}

/// GET /api/messages/direct/{peer}
pub async fn list_direct(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(peer): Path<UserId>,
    Query(query): Query<MessageListQuery>,
) -> Result<Json<ApiResponse<Vec<Message>>>, ApiError> {
    let messages = state
        .messages
        .list(&auth, MessageTarget::Direct(peer), query.limit)
        .await?;
    Ok(Json(ApiResponse::ok(messages)))
}

/// GET /api/messages/community/{id}
pub async fn list_community(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(community_id): Path<CommunityId>,
    Query(query): Query<MessageListQuery>,
) -> Result<Json<ApiResponse<Vec<Message>>>, ApiError> {
    let messages = state
        .messages
        .list(&auth, MessageTarget::Community(community_id), query.limit)
        .await?;
    Ok(Json(ApiResponse::ok(messages)))
}

/// GET /api/messages/direct/{peer}/unread-count
pub async fn direct_unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(peer): Path<UserId>,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let count = state
        .messages
        .unread_count(&auth, MessageTarget::Direct(peer))
        .await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// GET /api/messages/community/{id}/unread-count
pub async fn community_unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(community_id): Path<CommunityId>,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let count = state
        .messages
        .unread_count(&auth, MessageTarget::Community(community_id))
        .await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// PUT /api/messages/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<MessageId>,
) -> Result<Json<ApiResponse<ChangedResponse>>, ApiError> {
    let changed = state.messages.mark_read(&auth, id).await?;
    Ok(Json(ApiResponse::ok(ChangedResponse { changed })))
}

/// PUT /api/messages/direct/{peer}/read
pub async fn mark_direct_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(peer): Path<UserId>,
) -> Result<Json<ApiResponse<ChangedResponse>>, ApiError> {
    let changed = state
        .messages
        .mark_conversation_read(&auth, MessageTarget::Direct(peer))
        .await?;
    Ok(Json(ApiResponse::ok(ChangedResponse { changed })))
}

/// PUT /api/messages/community/{id}/read
pub async fn mark_community_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(community_id): Path<CommunityId>,
) -> Result<Json<ApiResponse<ChangedResponse>>, ApiError> {
    let changed = state
        .messages
        .mark_conversation_read(&auth, MessageTarget::Community(community_id))
        .await?;
    Ok(Json(ApiResponse::ok(ChangedResponse { changed })))
}
