//! # beredskap-database
//!
//! Store traits for every Beredskap table, with a PostgreSQL implementation
//! for production and an in-process implementation for tests and local runs.
//! Both guarantee the same atomicity: a request transition and its offer
//! status change commit together or not at all.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod postgres;
pub mod store;

pub use connection::DatabasePool;
pub use memory::{MemoryMembershipGate, MemoryStore};
pub use postgres::{PgMembershipGate, PgStore};
pub use store::{
    CatalogStore, DedupOutcome, MessageCursor, MessageStore, NotificationStore, OfferStore,
    RequestStore, Stores, TransitionOutcome,
};
