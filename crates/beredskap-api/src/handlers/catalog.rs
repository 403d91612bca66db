//! Catalog resource handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use beredskap_core::types::id::CatalogResourceId;
use beredskap_entity::catalog::CatalogResource;

use crate::dto::request::{CreateResourceRequest, UpdateResourceRequest};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// POST /api/catalog
pub async fn add_resource(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateResourceRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CatalogResource>>), ApiError> {
    let resource = state.catalog.add_resource(&auth, req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(resource))))
}

/// GET /api/catalog
pub async fn list_own(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<CatalogResource>>>, ApiError> {
    let resources = state.catalog.list_own(&auth).await?;
    Ok(Json(ApiResponse::ok(resources)))
}

/// PATCH /api/catalog/{id}
pub async fn update_resource(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<CatalogResourceId>,
    ValidatedJson(req): ValidatedJson<UpdateResourceRequest>,
) -> Result<Json<ApiResponse<CatalogResource>>, ApiError> {
    let resource = state.catalog.update_resource(&auth, id, req.into()).await?;
    Ok(Json(ApiResponse::ok(resource)))
}
