//! # beredskap-entity
//!
//! Domain entity models for the Beredskap sharing service. Every struct in
//! this crate represents a database table row or a domain value object.
//! Row structs derive `sqlx::FromRow`; status columns map to PostgreSQL enum
//! types.

pub mod catalog;
pub mod message;
pub mod notification;
pub mod offer;
pub mod request;
