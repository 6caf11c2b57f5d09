//! Data models
//!
//! Shared between the admin backend and the client crate (via API).
//! All IDs are `i64` assigned by the backend.

pub mod employee;

// Re-exports
pub use employee::*;
