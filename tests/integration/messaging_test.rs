//! Messages and notifications over the HTTP API.

mod helpers;

use http::StatusCode;
use serde_json::json;

use helpers::TestApp;

#[tokio::test]
async fn test_community_message_stays_out_of_direct_conversations() {
    let app = TestApp::new().await;
    let anna = app.member("Anna").await;
    let bertil = app.member("Bertil").await;

    let sent = app
        .request(
            "POST",
            "/api/messages",
            Some(json!({
                "content": "Samling vid skolan kl 18",
                "target": { "type": "community", "id": app.community.to_string() },
            })),
            Some(&anna),
        )
        .await;
    assert_eq!(sent.status, StatusCode::CREATED, "{:?}", sent.body);
    assert_eq!(sent.data()["community_id"], app.community.to_string());
    assert!(sent.data()["recipient_id"].is_null());

    let channel = app
        .request(
            "GET",
            &format!("/api/messages/community/{}", app.community),
            None,
            Some(&anna),
        )
        .await;
    let channel = channel.data().as_array().unwrap();
    assert_eq!(channel.len(), 1);
    assert_eq!(channel[0]["id"], sent.data()["id"]);

    let direct = app
        .request(
            "GET",
            &format!("/api/messages/direct/{}", bertil.id),
            None,
            Some(&anna),
        )
        .await;
    assert_eq!(direct.status, StatusCode::OK);
    assert!(direct.data().as_array().unwrap().is_empty());

    let fan_out = app
        .request("GET", "/api/notifications", None, Some(&bertil))
        .await;
    assert_eq!(fan_out.data().as_array().unwrap().len(), 1);
    let sender_inbox = app
        .request("GET", "/api/notifications", None, Some(&anna))
        .await;
    assert!(sender_inbox.data().as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_outsider_cannot_read_or_post_to_community() {
    let app = TestApp::new().await;
    let outsider = app.outsider("Cecilia");

    let read = app
        .request(
            "GET",
            &format!("/api/messages/community/{}", app.community),
            None,
            Some(&outsider),
        )
        .await;
    assert_eq!(read.status, StatusCode::FORBIDDEN);
    assert_eq!(read.error(), "AUTHORIZATION_ERROR");

    let post = app
        .request(
            "POST",
            "/api/messages",
            Some(json!({
                "content": "hej",
                "target": { "type": "community", "id": app.community.to_string() },
            })),
            Some(&outsider),
        )
        .await;
    assert_eq!(post.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_direct_burst_is_deduplicated_and_read_state_tracks() {
    let app = TestApp::new().await;
    let anna = app.member("Anna").await;
    let bertil = app.member("Bertil").await;

    for text in ["hej", "är du hemma?", "ring mig"] {
        let sent = app
            .request(
                "POST",
                "/api/messages",
                Some(json!({
                    "content": text,
                    "target": { "type": "direct", "id": bertil.id.to_string() },
                })),
                Some(&anna),
            )
            .await;
        assert_eq!(sent.status, StatusCode::CREATED, "{:?}", sent.body);
    }

    let inbox = app
        .request("GET", "/api/notifications", None, Some(&bertil))
        .await;
    let notes = inbox.data().as_array().unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0]["type"], "message");

    let unread = app
        .request(
            "GET",
            &format!("/api/messages/direct/{}/unread-count", anna.id),
            None,
            Some(&bertil),
        )
        .await;
    assert_eq!(unread.data()["count"], 3);

    let marked = app
        .request(
            "PUT",
            &format!("/api/messages/direct/{}/read", anna.id),
            None,
            Some(&bertil),
        )
        .await;
    assert_eq!(marked.data()["changed"], 3);

    let unread = app
        .request(
            "GET",
            &format!("/api/messages/direct/{}/unread-count", anna.id),
            None,
            Some(&bertil),
        )
        .await;
    assert_eq!(unread.data()["count"], 0);

    let conversation = app
        .request(
            "GET",
            &format!("/api/messages/direct/{}", bertil.id),
            None,
            Some(&anna),
        )
        .await;
    assert_eq!(conversation.data().as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_message_input_validation() {
    let app = TestApp::new().await;
    let anna = app.member("Anna").await;

    let blank = app
        .request(
            "POST",
            "/api/messages",
            Some(json!({
                "content": "   ",
                "target": { "type": "community", "id": app.community.to_string() },
            })),
            Some(&anna),
        )
        .await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);

    let to_self = app
        .request(
            "POST",
            "/api/messages",
            Some(json!({
                "content": "note to self",
                "target": { "type": "direct", "id": anna.id.to_string() },
            })),
            Some(&anna),
        )
        .await;
    assert_eq!(to_self.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_mark_all_notifications_read_is_idempotent() {
    let app = TestApp::new().await;
    let anna = app.member("Anna").await;
    let bertil = app.member("Bertil").await;
    let cecilia = app.member("Cecilia").await;

    for sender in [&anna, &cecilia] {
        app.request(
            "POST",
            "/api/messages",
            Some(json!({
                "content": "hjälp behövs",
                "target": { "type": "direct", "id": bertil.id.to_string() },
                "is_emergency": true,
            })),
            Some(sender),
        )
        .await;
    }

    let count = app
        .request("GET", "/api/notifications/unread-count", None, Some(&bertil))
        .await;
    assert_eq!(count.data()["count"], 2);

    let first = app
        .request("PUT", "/api/notifications/read-all", None, Some(&bertil))
        .await;
    assert_eq!(first.data()["changed"], 2);
    let second = app
        .request("PUT", "/api/notifications/read-all", None, Some(&bertil))
        .await;
    assert_eq!(second.data()["changed"], 0);

    let unread = app
        .request(
            "GET",
            "/api/notifications?unread_only=true",
            None,
            Some(&bertil),
        )
        .await;
    assert!(unread.data().as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_notification_read_is_recipient_only() {
    let app = TestApp::new().await;
    let anna = app.member("Anna").await;
    let bertil = app.member("Bertil").await;

    app.request(
        "POST",
        "/api/messages",
        Some(json!({
            "content": "hej",
            "target": { "type": "direct", "id": bertil.id.to_string() },
        })),
        Some(&anna),
    )
    .await;
    let inbox = app
        .request("GET", "/api/notifications", None, Some(&bertil))
        .await;
    let id = inbox.data()[0]["id"].as_str().unwrap().to_string();

    let foreign = app
        .request(
            "PUT",
            &format!("/api/notifications/{id}/read"),
            None,
            Some(&anna),
        )
        .await;
    assert_eq!(foreign.status, StatusCode::FORBIDDEN);

    let own = app
        .request(
            "PUT",
            &format!("/api/notifications/{id}/read"),
            None,
            Some(&bertil),
        )
        .await;
    assert_eq!(own.status, StatusCode::OK);
    assert_eq!(own.data()["changed"], 1);
}

#[tokio::test]
async fn test_health_reports_store_and_cache() {
    let app = TestApp::new().await;

    let health = app.request("GET", "/api/health", None, None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.data()["status"], "ok");
    assert_eq!(health.data()["store"], "memory");
}
