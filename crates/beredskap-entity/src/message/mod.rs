//! Chat message domain entities.

pub mod filter;
pub mod model;
pub mod target;

pub use filter::MessageFilter;
pub use model::Message;
pub use target::MessageTarget;
