//! Message router: persistence, fan-out, and read state of chat messages.

pub mod router;

pub use router::{MessageRouter, SendMessageRequest};
