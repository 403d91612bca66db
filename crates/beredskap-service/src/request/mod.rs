//! Request tracker: the request lifecycle state machine.

pub mod service;

pub use service::RequestTrackerService;
