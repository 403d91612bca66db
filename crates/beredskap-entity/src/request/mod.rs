//! Resource request entities and the request lifecycle state machine.

pub mod model;
pub mod status;
pub mod transition;

pub use model::{NewRequest, ResourceRequest};
pub use status::RequestStatus;
pub use transition::{OfferEffect, RequestTransition, TransitionCommand};
