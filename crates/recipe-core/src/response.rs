//! Response types for the gateway.

use crate::request::null_as_default;
use serde::{Deserialize, Serialize};

/// Raw HTTP response returned by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderResponse {
    /// HTTP status code
    pub status_code: u16,
    /// Body text, expected to be JSON
    pub body: String,
}

impl ProviderResponse {
    /// Create a new provider response
    pub fn new(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code,
            body: body.into(),
        }
    }

    /// Whether the status code signals a client or server error
    pub fn is_error_status(&self) -> bool {
        self.status_code >= 400
    }
}

/// The `{ body, error }` shape returned to callers for every outcome.
///
/// Success and failure are mutually exclusive: a success carries non-empty
/// `body` and no `error`; a failure carries an empty `body`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedResult {
    /// Generated text
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: String,
    /// Error message; takes precedence over `body` when non-empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NormalizedResult {
    /// Successful result carrying generated text
    pub fn success(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            error: None,
        }
    }

    /// Failed result carrying an error message
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            body: String::new(),
            error: Some(error.into()),
        }
    }

    /// The error message, if non-empty
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| !e.is_empty())
    }

    /// Whether this is a success
    pub fn is_success(&self) -> bool {
        self.error().is_none()
    }

    /// Convert into a `Result`, letting a non-empty error win
    pub fn into_result(self) -> Result<String, String> {
        match self.error {
            Some(error) if !error.is_empty() => Err(error),
            _ => Ok(self.body),
        }
    }
}
