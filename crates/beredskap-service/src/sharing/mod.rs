//! Sharing ledger: offers of catalog resources to communities.

pub mod service;

pub use service::{CreateOfferRequest, SharingLedgerService};
