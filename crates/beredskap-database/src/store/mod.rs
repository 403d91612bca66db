//! Store traits.
//!
//! Each trait covers one table family. Implementations must guarantee the
//! atomicity documented per method: either a write fully commits or it has
//! no effect. Two implementations are provided:
//! - PostgreSQL (transactions, row locks, partial unique index)
//! - In-process (one `tokio::sync::Mutex` over all tables)

pub mod catalog;
pub mod message;
pub mod notification;
pub mod offer;
pub mod request;

use std::sync::Arc;

use beredskap_core::traits::MembershipGate;

pub use catalog::CatalogStore;
pub use message::{MessageCursor, MessageStore};
pub use notification::{DedupOutcome, NotificationStore};
pub use offer::OfferStore;
pub use request::{RequestStore, TransitionOutcome};

/// One handle per store trait, all usually backed by the same object.
#[derive(Debug, Clone)]
pub struct Stores {
    /// Catalog resources.
    pub catalog: Arc<dyn CatalogStore>,
    /// Offers.
    pub offers: Arc<dyn OfferStore>,
    /// Requests and transitions.
    pub requests: Arc<dyn RequestStore>,
    /// Notifications.
    pub notifications: Arc<dyn NotificationStore>,
    /// Messages.
    pub messages: Arc<dyn MessageStore>,
    /// Community membership.
    pub membership: Arc<dyn MembershipGate>,
}

impl Stores {
    /// Split one backend into per-trait handles.
    pub fn from_backend<S>(store: Arc<S>, membership: Arc<dyn MembershipGate>) -> Self
    where
        S: CatalogStore + OfferStore + RequestStore + NotificationStore + MessageStore,
    {
        Self {
            catalog: store.clone(),
            offers: store.clone(),
            requests: store.clone(),
            notifications: store.clone(),
            messages: store,
            membership,
        }
    }
}
