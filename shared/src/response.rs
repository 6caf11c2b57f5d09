//! API Response types
//!
//! Uniform result envelope returned by every resource client operation.

use serde::{Deserialize, Serialize};

/// Unified API response envelope
///
/// Every API call resolves to this shape:
/// ```json
/// {
///     "error": null,
///     "data": { ... },
///     "code": 200,
///     "state": "success"
/// }
/// ```
///
/// Exactly one of `error`/`data` is populated on any terminal result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Error message (None on success)
    pub error: Option<String>,
    /// Response payload (None on failure)
    pub data: Option<T>,
    /// HTTP status code of the underlying response
    pub code: u16,
    /// Backend-supplied state marker (e.g. "success")
    pub state: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn ok(data: T, code: u16) -> Self {
        Self {
            error: None,
            data: Some(data),
            code,
            state: None,
        }
    }

    /// Create a successful response with a state marker
    pub fn ok_with_state(data: T, code: u16, state: impl Into<String>) -> Self {
        Self {
            error: None,
            data: Some(data),
            code,
            state: Some(state.into()),
        }
    }

    /// Create an error response
    pub fn error(code: u16, message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            data: None,
            code,
            state: None,
        }
    }

    /// Create an error response carrying a backend state marker
    pub fn error_with_state(code: u16, message: impl Into<String>, state: Option<String>) -> Self {
        Self {
            error: Some(message.into()),
            data: None,
            code,
            state,
        }
    }

    /// True when the envelope carries data and no error
    pub fn is_ok(&self) -> bool {
        self.error.is_none() && self.data.is_some()
    }
}
