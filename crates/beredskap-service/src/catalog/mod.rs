//! Resource catalog: the resources a user holds.

pub mod service;

pub use service::{AddResourceRequest, ResourceCatalogService};
