//! Resource clients
//!
//! Thin typed wrappers over the interceptor. Every operation resolves to
//! an [`shared::ApiResponse`] envelope; transport errors and malformed
//! bodies are converted here and never propagate as raw errors.

pub mod auth;
pub mod employees;

pub use auth::AuthApi;
pub use employees::EmployeeApi;
