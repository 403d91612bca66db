//! Route table for the HTTP API.

use axum::Router;
use axum::routing::{get, patch, post, put};

use crate::handlers::{catalog, health, message, notification, offer, request, ws};
use crate::state::AppState;

/// Builds every `/api` route.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health::health))
        // Catalog
        .route(
            "/catalog",
            post(catalog::add_resource).get(catalog::list_own),
        )
        .route("/catalog/{id}", patch(catalog::update_resource))
        // Sharing ledger
        .route(
            "/communities/{id}/offers",
            post(offer::create_offer).get(offer::list_offers),
        )
        .route(
            "/offers/{id}",
            get(offer::get_offer)
                .patch(offer::update_offer)
                .delete(offer::delete_offer),
        )
        // Requests
        .route(
            "/offers/{id}/requests",
            post(request::create_request).get(request::list_for_offer),
        )
        .route(
            "/offers/{id}/requests/mine",
            axum::routing::delete(request::cancel_mine),
        )
        .route("/requests/mine", get(request::list_mine))
        .route("/requests/{id}/approve", post(request::approve))
        .route("/requests/{id}/deny", post(request::deny))
        .route("/requests/{id}/complete", post(request::complete))
        // Notifications
        .route("/notifications", get(notification::list_notifications))
        .route(
            "/notifications/unread-count",
            get(notification::unread_count),
        )
        .route("/notifications/read-all", put(notification::mark_all_read))
        .route("/notifications/{id}/read", put(notification::mark_read))
        // Messages
        .route("/messages", post(message::send_message))
        .route("/messages/{id}/read", put(message::mark_read))
        .route("/messages/direct/{peer}", get(message::list_direct))
        .route(
            "/messages/direct/{peer}/unread-count",
            get(message::direct_unread_count),
        )
        .route("/messages/direct/{peer}/read", put(message::mark_direct_read))
        .route("/messages/community/{id}", get(message::list_community))
        .route(
            "/messages/community/{id}/unread-count",
            get(message::community_unread_count),
        )
        .route(
            "/messages/community/{id}/read",
            put(message::mark_community_read),
        )
        .route("/ws/messages", get(ws::ws_handler));

    Router::new().nest("/api", api).with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use beredskap_cache::CacheManager;
    use beredskap_core::config::AppConfig;
    use beredskap_database::{MemoryMembershipGate, MemoryStore, Stores};
    use beredskap_realtime::MessageHub;
    use beredskap_service::Services;

    use super::*;

    fn router() -> Router {
        let config = AppConfig::default();
        let stores = Stores::from_backend(
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryMembershipGate::new()),
        );
        let cache = CacheManager::disabled();
        let hub = Arc::new(MessageHub::new(8));
        let services = Services::new(
            stores,
            cache.clone(),
            Arc::clone(&hub),
            config.notifications.clone(),
            config.realtime.clone(),
        );
        build_router(AppState::new(Arc::new(config), services, cache, hub))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_missing_identity_is_unauthenticated() {
        let response = router()
            .oneshot(
                Request::builder()
                    .uri("/api/notifications")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"], "UNAUTHENTICATED");
    }

    #[tokio::test]
    async fn test_unknown_offer_is_not_found() {
        let response = router()
            .oneshot(
                Request::builder()
                    .uri(format!("/api/offers/{}", uuid::Uuid::now_v7()))
                    .header("x-user-id", uuid::Uuid::now_v7().to_string())
                    .header("x-user-name", "Anna")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"], "NOT_FOUND");
        assert!(body["message"].as_str().unwrap().contains("not found"));
    }

    #[tokio::test]
    async fn test_invalid_body_is_validation_error() {
        let response = router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/catalog")
                    .header("content-type", "application/json")
                    .header("x-user-id", uuid::Uuid::now_v7().to_string())
                    .header("x-user-name", "Anna")
                    .body(Body::from(r#"{"name":"tält","category":"camping","quantity":0}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_catalog_create_returns_created() {
        let response = router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/catalog")
                    .header("content-type", "application/json")
                    .header("x-user-id", uuid::Uuid::now_v7().to_string())
                    .header("x-user-name", "Anna")
                    .body(Body::from(
                        r#"{"name":"tält","category":"camping","quantity":1,"unit":"st"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["name"], "tält");
    }
}
