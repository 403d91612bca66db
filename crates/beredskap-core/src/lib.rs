//! # beredskap-core
//!
//! Core crate for the Beredskap sharing service. Contains the unified error
//! system, configuration schemas, typed identifiers, domain events, and the
//! traits implemented by the infrastructure crates (cache providers and the
//! community membership gate).
//!
//! This crate has **no** internal dependencies on other Beredskap crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
