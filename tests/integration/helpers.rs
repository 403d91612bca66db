//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use beredskap_api::{AppState, build_app};
use beredskap_cache::CacheManager;
use beredskap_core::config::AppConfig;
use beredskap_core::types::id::{CommunityId, UserId};
use beredskap_database::{MemoryMembershipGate, MemoryStore, Stores};
use beredskap_realtime::MessageHub;
use beredskap_service::Services;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Membership gate standing in for the external community service
    pub gate: Arc<MemoryMembershipGate>,
    /// A community every test user joins by default
    pub community: CommunityId,
}

/// A caller identity for test requests.
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: UserId,
    pub name: String,
}

impl TestApp {
    /// Create a new test application over the in-process store
    pub async fn new() -> Self {
        let config = AppConfig::default();
        let gate = Arc::new(MemoryMembershipGate::new());
        let stores = Stores::from_backend(Arc::new(MemoryStore::new()), gate.clone());
        let cache = CacheManager::disabled();
        let hub = Arc::new(MessageHub::new(config.realtime.channel_buffer_size));

        let services = Services::new(
            stores,
            cache.clone(),
            Arc::clone(&hub),
            config.notifications.clone(),
            config.realtime.clone(),
        );
        let state = AppState::new(Arc::new(config), services, cache, hub);

        Self {
            router: build_app(state),
            gate,
            community: CommunityId::new(),
        }
    }

    /// Create a user who belongs to the default community
    pub async fn member(&self, name: &str) -> TestUser {
        let user = TestUser {
            id: UserId::new(),
            name: name.to_string(),
        };
        self.gate.add_member(self.community, user.id, false).await;
        user
    }

    /// Create a user with no community
    pub fn outsider(&self, name: &str) -> TestUser {
        TestUser {
            id: UserId::new(),
            name: name.to_string(),
        }
    }

    /// Add a catalog resource and publish all of it as an offer; returns the offer id
    pub async fn offer(&self, owner: &TestUser, name: &str, quantity: i32) -> String {
        let resource = self
            .request(
                "POST",
                "/api/catalog",
                Some(serde_json::json!({
                    "name": name,
                    "category": "supplies",
                    "quantity": quantity,
                })),
                Some(owner),
            )
            .await;
        assert_eq!(resource.status, StatusCode::CREATED, "{:?}", resource.body);

        let offer = self
            .request(
                "POST",
                &format!("/api/communities/{}/offers", self.community),
                Some(serde_json::json!({
                    "catalog_resource_id": resource.data()["id"],
                    "quantity": quantity,
                })),
                Some(owner),
            )
            .await;
        assert_eq!(offer.status, StatusCode::CREATED, "{:?}", offer.body);
        offer.id()
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        user: Option<&TestUser>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(user) = user {
            req = req
                .header("X-User-Id", user.id.to_string())
                .header("X-User-Name", &user.name);
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `data` envelope of a successful response
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// The `id` of the returned entity
    pub fn id(&self) -> String {
        self.data()["id"]
            .as_str()
            .expect("response has no id")
            .to_string()
    }

    /// The machine-readable error code
    pub fn error(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}
