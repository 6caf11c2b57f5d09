//! Client error types

use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Session died: a 401 survived the refresh-and-retry cycle, or the
    /// refresh itself failed. Unrecoverable for the current call.
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// Refresh endpoint rejected the refresh token
    #[error("Refresh rejected with status {0}")]
    RefreshRejected(u16),

    /// Credential store failure
    #[error("Credential store error: {0}")]
    Store(#[from] crate::store::StoreError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
