//! Offer handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use beredskap_core::types::id::{CommunityId, OfferId};
use beredskap_entity::offer::{OfferListing, SharedResource};

use crate::dto::request::{CreateOfferBody, ListOffersQuery, UpdateOfferBody};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// POST /api/communities/{id}/offers
pub async fn create_offer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(community_id): Path<CommunityId>,
    ValidatedJson(body): ValidatedJson<CreateOfferBody>,
) -> Result<(StatusCode, Json<ApiResponse<SharedResource>>), ApiError> {
    let offer = state
        .ledger
        .create_offer(&auth, body.into_request(community_id))
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(offer))))
}

/// GET /api/communities/{id}/offers?exclude=taken
pub async fn list_offers(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(community_id): Path<CommunityId>,
    Query(query): Query<ListOffersQuery>,
) -> Result<Json<ApiResponse<Vec<OfferListing>>>, ApiError> {
    let exclude = query.excluded()?;
    let offers = state
        .ledger
        .list_offers(&auth, community_id, exclude)
        .await?;
    Ok(Json(ApiResponse::ok(offers)))
}

/// GET /api/offers/{id}
pub async fn get_offer(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<OfferId>,
) -> Result<Json<ApiResponse<SharedResource>>, ApiError> {
    let offer = state.ledger.get_offer(id).await?;
    Ok(Json(ApiResponse::ok(offer)))
}

/// PATCH /api/offers/{id}
pub async fn update_offer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<OfferId>,
    ValidatedJson(body): ValidatedJson<UpdateOfferBody>,
) -> Result<Json<ApiResponse<SharedResource>>, ApiError> {
    let offer = state.ledger.update_offer(&auth, id, body.into()).await?;
    Ok(Json(ApiResponse::ok(offer)))
}

/// DELETE /api/offers/{id}
pub async fn delete_offer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<OfferId>,
) -> Result<StatusCode, ApiError> {
    state.ledger.delete_offer(&auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
