//! Core traits defined in `beredskap-core` and implemented by other crates.

pub mod cache;
pub mod membership;

pub use cache::CacheProvider;
pub use membership::MembershipGate;
