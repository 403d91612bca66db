//! Health check handler.

use axum::Json;
use axum::extract::State;

use beredskap_core::config::StoreBackend;
use beredskap_core::traits::CacheProvider;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let cache = state.cache.health_check().await.unwrap_or(false);
    let store = match state.config.database.backend {
        StoreBackend::Memory => "memory",
        StoreBackend::Postgres => "postgres",
    };

    Json(ApiResponse::ok(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: store.to_string(),
        cache,
        message_channels: state.hub.channel_count(),
    }))
}
