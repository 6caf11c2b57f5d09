//! Shared types for the Effectif console
//!
//! Common types used across crates: the API response envelope,
//! auth DTOs, and employee data models.

pub mod client;
pub mod models;
pub mod response;

// Re-exports
pub use client::{LoginRequest, LoginResponse, UserProfile};
pub use models::{Employee, EmployeeFilters, EmployeeFormData, POSTES, StatusFilter};
pub use response::ApiResponse;
