//! Core type definitions used across the Beredskap workspace.

pub mod id;

pub use id::*;
