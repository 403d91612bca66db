//! Offer and request lifecycle over the HTTP API.

mod helpers;

use http::StatusCode;
use serde_json::json;

use helpers::TestApp;

#[tokio::test]
async fn test_request_then_approve_takes_offer_and_notifies_both() {
    let app = TestApp::new().await;
    let anna = app.member("Anna").await;
    let bertil = app.member("Bertil").await;
    let offer_id = app.offer(&anna, "tält", 1).await;

    let created = app
        .request(
            "POST",
            &format!("/api/offers/{offer_id}/requests"),
            Some(json!({ "quantity": 1, "message": "behöver den i helgen" })),
            Some(&bertil),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED, "{:?}", created.body);
    assert_eq!(created.data()["status"], "pending");
    let request_id = created.id();

    let owner_inbox = app
        .request("GET", "/api/notifications", None, Some(&anna))
        .await;
    let owner_notes = owner_inbox.data().as_array().unwrap();
    assert_eq!(owner_notes.len(), 1);
    assert_eq!(owner_notes[0]["type"], "resource_request");
    assert_eq!(owner_notes[0]["sender_name"], "Bertil");

    let approved = app
        .request(
            "POST",
            &format!("/api/requests/{request_id}/approve"),
            Some(json!({})),
            Some(&anna),
        )
        .await;
    assert_eq!(approved.status, StatusCode::OK, "{:?}", approved.body);
    assert_eq!(approved.data()["status"], "approved");

    let offer = app
        .request("GET", &format!("/api/offers/{offer_id}"), None, Some(&bertil))
        .await;
    assert_eq!(offer.data()["status"], "taken");

    let requester_inbox = app
        .request("GET", "/api/notifications", None, Some(&bertil))
        .await;
    let requester_notes = requester_inbox.data().as_array().unwrap();
    assert_eq!(requester_notes.len(), 1);
    assert_eq!(requester_notes[0]["type"], "system");

    let listing = app
        .request(
            "GET",
            &format!("/api/communities/{}/offers", app.community),
            None,
            Some(&bertil),
        )
        .await;
    assert!(listing.data().as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_deny_reopens_offer_with_single_notification() {
    let app = TestApp::new().await;
    let anna = app.member("Anna").await;
    let bertil = app.member("Bertil").await;
    let offer_id = app.offer(&anna, "tält", 1).await;

    let created = app
        .request(
            "POST",
            &format!("/api/offers/{offer_id}/requests"),
            Some(json!({ "quantity": 1 })),
            Some(&bertil),
        )
        .await;
    let request_id = created.id();

    let denied = app
        .request(
            "POST",
            &format!("/api/requests/{request_id}/deny"),
            Some(json!({ "response_message": "redan utlånad" })),
            Some(&anna),
        )
        .await;
    assert_eq!(denied.status, StatusCode::OK, "{:?}", denied.body);
    assert_eq!(denied.data()["status"], "denied");
    assert_eq!(denied.data()["response_message"], "redan utlånad");

    let offer = app
        .request("GET", &format!("/api/offers/{offer_id}"), None, Some(&bertil))
        .await;
    assert_eq!(offer.data()["status"], "available");

    let inbox = app
        .request("GET", "/api/notifications", None, Some(&bertil))
        .await;
    let notes = inbox.data().as_array().unwrap();
    assert_eq!(notes.len(), 1);
    assert!(notes[0]["content"].as_str().unwrap().contains("redan utlånad"));

    let again = app
        .request(
            "POST",
            &format!("/api/requests/{request_id}/deny"),
            Some(json!({})),
            Some(&anna),
        )
        .await;
    assert_eq!(again.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(again.error(), "INVALID_STATE_TRANSITION");
}

#[tokio::test]
async fn test_concurrent_approve_has_one_winner() {
    let app = TestApp::new().await;
    let anna = app.member("Anna").await;
    let bertil = app.member("Bertil").await;
    let offer_id = app.offer(&anna, "generator", 1).await;

    let created = app
        .request(
            "POST",
            &format!("/api/offers/{offer_id}/requests"),
            Some(json!({ "quantity": 1 })),
            Some(&bertil),
        )
        .await;
    let path = format!("/api/requests/{}/approve", created.id());

    let (first, second) = tokio::join!(
        app.request("POST", &path, Some(json!({})), Some(&anna)),
        app.request("POST", &path, Some(json!({})), Some(&anna)),
    );

    let mut statuses = [first.status, second.status];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::OK, StatusCode::CONFLICT]);

    let mine = app
        .request("GET", "/api/requests/mine", None, Some(&bertil))
        .await;
    assert_eq!(mine.data()[0]["status"], "approved");
}

#[tokio::test]
async fn test_request_preconditions_map_to_status_codes() {
    let app = TestApp::new().await;
    let anna = app.member("Anna").await;
    let bertil = app.member("Bertil").await;
    let outsider = app.outsider("Cecilia");
    let offer_id = app.offer(&anna, "vattendunk", 2).await;
    let path = format!("/api/offers/{offer_id}/requests");

    let too_many = app
        .request("POST", &path, Some(json!({ "quantity": 3 })), Some(&bertil))
        .await;
    assert_eq!(too_many.status, StatusCode::BAD_REQUEST);

    let zero = app
        .request("POST", &path, Some(json!({ "quantity": 0 })), Some(&bertil))
        .await;
    assert_eq!(zero.status, StatusCode::BAD_REQUEST);
    assert_eq!(zero.error(), "VALIDATION_ERROR");

    let own = app
        .request("POST", &path, Some(json!({ "quantity": 1 })), Some(&anna))
        .await;
    assert_eq!(own.status, StatusCode::UNPROCESSABLE_ENTITY);

    let stranger = app
        .request("POST", &path, Some(json!({ "quantity": 1 })), Some(&outsider))
        .await;
    assert_eq!(stranger.status, StatusCode::FORBIDDEN);

    let missing = app
        .request(
            "POST",
            &format!("/api/offers/{}/requests", uuid::Uuid::now_v7()),
            Some(json!({ "quantity": 1 })),
            Some(&bertil),
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let anonymous = app
        .request("POST", &path, Some(json!({ "quantity": 1 })), None)
        .await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_cancel_and_complete_release_the_offer() {
    let app = TestApp::new().await;
    let anna = app.member("Anna").await;
    let bertil = app.member("Bertil").await;
    let offer_id = app.offer(&anna, "sovsäck", 1).await;
    let requests_path = format!("/api/offers/{offer_id}/requests");

    let first = app
        .request("POST", &requests_path, Some(json!({ "quantity": 1 })), Some(&bertil))
        .await;
    assert_eq!(first.status, StatusCode::CREATED);

    let cancelled = app
        .request(
            "DELETE",
            &format!("{requests_path}/mine"),
            None,
            Some(&bertil),
        )
        .await;
    assert_eq!(cancelled.status, StatusCode::OK, "{:?}", cancelled.body);
    assert_eq!(cancelled.data()["status"], "cancelled");

    let second = app
        .request("POST", &requests_path, Some(json!({ "quantity": 1 })), Some(&bertil))
        .await;
    assert_eq!(second.status, StatusCode::CREATED, "{:?}", second.body);
    let request_id = second.id();

    app.request(
        "POST",
        &format!("/api/requests/{request_id}/approve"),
        Some(json!({})),
        Some(&anna),
    )
    .await;
    let completed = app
        .request(
            "POST",
            &format!("/api/requests/{request_id}/complete"),
            None,
            Some(&bertil),
        )
        .await;
    assert_eq!(completed.status, StatusCode::OK, "{:?}", completed.body);
    assert_eq!(completed.data()["status"], "completed");

    let offer = app
        .request("GET", &format!("/api/offers/{offer_id}"), None, Some(&anna))
        .await;
    assert_eq!(offer.data()["status"], "available");

    let history = app
        .request("GET", &requests_path, None, Some(&anna))
        .await;
    assert_eq!(history.data().as_array().unwrap().len(), 2);

    let not_owner = app
        .request("GET", &requests_path, None, Some(&bertil))
        .await;
    assert_eq!(not_owner.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_offer_delete_blocked_by_active_request() {
    let app = TestApp::new().await;
    let anna = app.member("Anna").await;
    let bertil = app.member("Bertil").await;
    let offer_id = app.offer(&anna, "ficklampa", 1).await;

    app.request(
        "POST",
        &format!("/api/offers/{offer_id}/requests"),
        Some(json!({ "quantity": 1 })),
        Some(&bertil),
    )
    .await;

    let blocked = app
        .request("DELETE", &format!("/api/offers/{offer_id}"), None, Some(&anna))
        .await;
    assert_eq!(blocked.status, StatusCode::CONFLICT);

    app.request(
        "DELETE",
        &format!("/api/offers/{offer_id}/requests/mine"),
        None,
        Some(&bertil),
    )
    .await;

    let deleted = app
        .request("DELETE", &format!("/api/offers/{offer_id}"), None, Some(&anna))
        .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let gone = app
        .request("GET", &format!("/api/offers/{offer_id}"), None, Some(&anna))
        .await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}
