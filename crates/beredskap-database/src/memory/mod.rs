//! In-process store for tests and single-node development.
//!
//! All tables live behind one `tokio::sync::Mutex`, so every multi-row write
//! is atomic. Each call yields to the scheduler before taking the lock, which
//! lets concurrent callers interleave the way they do against a networked
//! database.

mod membership;
mod messaging;
mod sharing;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use beredskap_core::types::id::{CatalogResourceId, NotificationId, OfferId, RequestId};
use beredskap_entity::catalog::CatalogResource;
use beredskap_entity::message::Message;
use beredskap_entity::notification::Notification;
use beredskap_entity::offer::SharedResource;
use beredskap_entity::request::ResourceRequest;

pub use membership::MemoryMembershipGate;

/// Every table of the store.
#[derive(Debug, Default)]
struct Tables {
    catalog: HashMap<CatalogResourceId, CatalogResource>,
    offers: HashMap<OfferId, SharedResource>,
    requests: HashMap<RequestId, ResourceRequest>,
    notifications: HashMap<NotificationId, Notification>,
    /// Kept in insertion order; reads sort by (created_at, id).
    messages: Vec<Message>,
}

/// In-memory implementation of every store trait.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    async fn lock(&self) -> MutexGuard<'_, Tables> {
        tokio::task::yield_now().await;
        self.tables.lock().await
    }
}
