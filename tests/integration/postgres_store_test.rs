//! PostgreSQL store guarantees: row locks, the active-request index,
//! advisory-lock dedup, and the delete cascade.
//!
//! Runs against the database named by `DATABASE_URL` and passes without
//! doing anything when it is unset.

use chrono::{Duration, Utc};

use beredskap_core::config::{DatabaseConfig, StoreBackend};
use beredskap_core::error::ErrorKind;
use beredskap_core::types::id::{CommunityId, UserId};
use beredskap_database::store::{CatalogStore, NotificationStore, OfferStore, RequestStore};
use beredskap_database::{DatabasePool, PgStore, migration};
use beredskap_entity::catalog::NewCatalogResource;
use beredskap_entity::notification::{NewNotification, NotificationKind};
use beredskap_entity::offer::{NewOffer, OfferStatus, SharedResource};
use beredskap_entity::request::{NewRequest, RequestStatus, RequestTransition, ResourceRequest};

/// A migrated store, or `None` when no database is configured.
async fn pg_store() -> Option<PgStore> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping PostgreSQL store test");
        return None;
    };
    let config = DatabaseConfig {
        backend: StoreBackend::Postgres,
        url,
        max_connections: 5,
        min_connections: 1,
        ..Default::default()
    };
    let db = DatabasePool::connect(&config).await.expect("connect");
    migration::run_migrations(db.pool()).await.expect("migrate");
    Some(PgStore::new(db.pool().clone()))
}

async fn seed_offer(store: &PgStore) -> SharedResource {
    let owner_id = UserId::new();
    let resource = NewCatalogResource {
        owner_id,
        name: "tält".into(),
        category: "shelter".into(),
        quantity: 2,
        unit: Some("st".into()),
    }
    .into_resource(Utc::now());
    let resource = store.insert_resource(&resource).await.expect("insert resource");

    let offer = NewOffer {
        owner_id,
        community_id: CommunityId::new(),
        catalog_resource_id: resource.id,
        shared_quantity: 2,
        available_until: None,
        location: None,
        notes: None,
    }
    .into_offer(Utc::now());
    store.insert_offer(&offer).await.expect("insert offer")
}

async fn seed_request(store: &PgStore, offer: &SharedResource) -> ResourceRequest {
    let request = NewRequest {
        offer_id: offer.id,
        requester_id: UserId::new(),
        quantity: 1,
        message: None,
    }
    .into_request(Utc::now());
    store.insert_request(&request).await.expect("insert request")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_approvals_have_one_winner() {
    let Some(store) = pg_store().await else {
        return;
    };
    let offer = seed_offer(&store).await;
    let a = seed_request(&store, &offer).await;
    let b = seed_request(&store, &offer).await;

    let approve_a = a.command(RequestTransition::Approve, None, Utc::now());
    let approve_b = b.command(RequestTransition::Approve, None, Utc::now());
    let (first, second) = tokio::join!(
        store.apply_transition(&approve_a),
        store.apply_transition(&approve_b)
    );

    let results = [first, second];
    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    let loser = results.iter().find_map(|r| r.as_ref().err()).expect("one loser");
    assert!(loser.is(ErrorKind::Conflict));

    let offer = store.find_offer(offer.id).await.unwrap().unwrap();
    assert_eq!(offer.status, OfferStatus::Taken);
    let statuses = [
        store.find_request(a.id).await.unwrap().unwrap().status,
        store.find_request(b.id).await.unwrap().unwrap().status,
    ];
    assert!(statuses.contains(&RequestStatus::Approved));
    assert!(statuses.contains(&RequestStatus::Pending));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_same_transition_twice_conflicts() {
    let Some(store) = pg_store().await else {
        return;
    };
    let offer = seed_offer(&store).await;
    let request = seed_request(&store, &offer).await;

    let cmd = request.command(RequestTransition::Approve, None, Utc::now());
    let (first, second) = tokio::join!(store.apply_transition(&cmd), store.apply_transition(&cmd));

    assert_ne!(first.is_ok(), second.is_ok());
    let err = first.err().or(second.err()).expect("one conflict");
    assert!(err.is(ErrorKind::Conflict));

    let stored = store.find_request(request.id).await.unwrap().unwrap();
    assert_eq!(stored.version, request.version + 1);
}

#[tokio::test]
async fn test_second_active_request_for_pair_conflicts() {
    let Some(store) = pg_store().await else {
        return;
    };
    let offer = seed_offer(&store).await;
    let first = seed_request(&store, &offer).await;

    let duplicate = NewRequest {
        offer_id: offer.id,
        requester_id: first.requester_id,
        quantity: 1,
        message: None,
    }
    .into_request(Utc::now());
    let err = store.insert_request(&duplicate).await.unwrap_err();
    assert!(err.is(ErrorKind::Conflict));

    store
        .apply_transition(&first.command(RequestTransition::Cancel, None, Utc::now()))
        .await
        .unwrap();
    let again = store.insert_request(&duplicate).await.unwrap();
    assert_eq!(again.status, RequestStatus::Pending);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_notifications_deduplicate_inside_window() {
    let Some(store) = pg_store().await else {
        return;
    };
    let user_id = UserId::new();
    let notification = || NewNotification {
        user_id,
        kind: NotificationKind::ResourceRequest,
        title: "Ny förfrågan".into(),
        content: "Anna vill låna tält".into(),
        sender_name: Some("Anna".into()),
        action_url: None,
    };
    let window = Duration::seconds(5);
    let now = Utc::now();

    let (first, second) = tokio::join!(
        store.insert_deduplicated(notification(), window, now),
        store.insert_deduplicated(notification(), window, now + Duration::seconds(1))
    );
    let (first, second) = (first.unwrap(), second.unwrap());
    assert_ne!(first.created, second.created);
    assert_eq!(first.notification.id, second.notification.id);

    let later = store
        .insert_deduplicated(notification(), window, now + Duration::seconds(10))
        .await
        .unwrap();
    assert!(later.created);
    assert_eq!(store.count_unread_notifications(user_id).await.unwrap(), 2);
}

#[tokio::test]
async fn test_delete_offer_blocked_by_active_request() {
    let Some(store) = pg_store().await else {
        return;
    };
    let offer = seed_offer(&store).await;
    let request = seed_request(&store, &offer).await;

    let err = store.delete_offer(offer.id).await.unwrap_err();
    assert!(err.is(ErrorKind::Conflict));
    assert!(store.find_offer(offer.id).await.unwrap().is_some());

    store
        .apply_transition(&request.command(RequestTransition::Cancel, None, Utc::now()))
        .await
        .unwrap();
    store.delete_offer(offer.id).await.unwrap();
    assert!(store.find_offer(offer.id).await.unwrap().is_none());
    assert!(store.find_request(request.id).await.unwrap().is_none());
}
