//! Shared resource offer entities.

pub mod model;
pub mod status;

pub use model::{NewOffer, OfferListing, OfferUpdate, SharedResource};
pub use status::OfferStatus;
