//! HTTP request handlers, one module per component.

pub mod catalog;
pub mod health;
pub mod message;
pub mod notification;
pub mod offer;
pub mod request;
pub mod ws;
