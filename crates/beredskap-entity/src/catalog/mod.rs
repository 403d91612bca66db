//! Resource catalog entities.

pub mod model;

pub use model::{CatalogResource, CatalogUpdate, NewCatalogResource};
