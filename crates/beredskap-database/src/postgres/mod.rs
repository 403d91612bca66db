//! PostgreSQL store.
//!
//! Runtime-checked queries over the pool. Multi-row writes run in one
//! transaction; dropping a future mid-transaction rolls it back.

mod catalog;
mod membership;
mod message;
mod notification;
mod offer;
mod request;

use sqlx::PgPool;

use beredskap_core::error::{AppError, ErrorKind};

pub use membership::PgMembershipGate;

/// PostgreSQL implementation of every store trait.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map a sqlx error, turning unique violations into conflicts.
fn db_err(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        let unique = e
            .as_database_error()
            .is_some_and(|db| db.is_unique_violation());
        let kind = if unique {
            ErrorKind::Conflict
        } else {
            ErrorKind::Database
        };
        AppError::with_source(kind, context, e)
    }
}
