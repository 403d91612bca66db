//! # beredskap-realtime
//!
//! In-process fan-out of newly persisted chat messages. Each conversation
//! (a direct pair or a community) has its own broadcast channel; a
//! [`Subscription`] filters with the same predicate the store uses for
//! listing, and recovers from a lagged receiver by replaying from the store.

pub mod channel;
pub mod hub;
pub mod subscription;

pub use channel::ChannelKey;
pub use hub::MessageHub;
pub use subscription::Subscription;
