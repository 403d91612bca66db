//! # beredskap-api
//!
//! HTTP API layer for Beredskap built on Axum.
//!
//! Provides the REST endpoints for the catalog, sharing ledger, request
//! tracker, notifications, and messages, the message WebSocket, identity
//! extraction, DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use error::ApiError;
pub use state::AppState;
