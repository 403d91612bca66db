//! Resource request handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use beredskap_core::types::id::{OfferId, RequestId};
use beredskap_entity::request::ResourceRequest;

use crate::dto::request::{CreateResourceRequestBody, RespondRequestBody};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// POST /api/offers/{id}/requests
pub async fn create_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(offer_id): Path<OfferId>,
    ValidatedJson(body): ValidatedJson<CreateResourceRequestBody>,
) -> Result<(StatusCode, Json<ApiResponse<ResourceRequest>>), ApiError> {
    let request = state
        .requests
        .request(&auth, offer_id, body.quantity, body.message)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(request))))
}

/// GET /api/offers/{id}/requests
pub async fn list_for_offer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(offer_id): Path<OfferId>,
) -> Result<Json<ApiResponse<Vec<ResourceRequest>>>, ApiError> {
    let requests = state.requests.list_by_resource(&auth, offer_id).await?;
    Ok(Json(ApiResponse::ok(requests)))
}

/// DELETE /api/offers/{id}/requests/mine
pub async fn cancel_mine(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(offer_id): Path<OfferId>,
) -> Result<Json<ApiResponse<ResourceRequest>>, ApiError> {
    let request = state.requests.cancel(&auth, offer_id).await?;
    Ok(Json(ApiResponse::ok(request)))
}

/// GET /api/requests/mine
pub async fn list_mine(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<ResourceRequest>>>, ApiError> {
    let requests = state.requests.list_by_requester(&auth).await?;
    Ok(Json(ApiResponse::ok(requests)))
}

/// POST /api/requests/{id}/approve
pub async fn approve(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<RequestId>,
    ValidatedJson(body): ValidatedJson<RespondRequestBody>,
) -> Result<Json<ApiResponse<ResourceRequest>>, ApiError> {
    let request = state
        .requests
        .approve(&auth, id, body.response_message)
        .await?;
    Ok(Json(ApiResponse::ok(request)))
}

/// POST /api/requests/{id}/deny
pub async fn deny(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<RequestId>,
    ValidatedJson(body): ValidatedJson<RespondRequestBody>,
) -> Result<Json<ApiResponse<ResourceRequest>>, ApiError> {
    let request = state.requests.deny(&auth, id, body.response_message).await?;
    Ok(Json(ApiResponse::ok(request)))
}

/// POST /api/requests/{id}/complete
pub async fn complete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<RequestId>,
) -> Result<Json<ApiResponse<ResourceRequest>>, ApiError> {
    let request = state.requests.complete(&auth, id).await?;
    Ok(Json(ApiResponse::ok(request)))
}
