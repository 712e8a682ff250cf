//! Error types for building and invoking model requests.

use thiserror::Error;

/// Failure to turn invocation arguments into a provider request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// The vision model was targeted without an image
    #[error("image data is required for the vision model")]
    MissingImage,

    /// The image payload is not valid base64
    #[error("image data is not valid base64: {0}")]
    InvalidImage(String),

    /// The payload could not be serialized
    #[error("failed to serialize provider request: {0}")]
    Serialization(String),
}

/// Failure to obtain any response from the provider
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvokeError {
    /// The request never produced an HTTP response
    #[error("no response received: {0}")]
    Transport(String),

    /// Signing credentials are missing or unusable
    #[error("provider credentials are not configured: {0}")]
    Credentials(String),

    /// The provider endpoint could not be resolved
    #[error("invalid provider endpoint: {0}")]
    Endpoint(String),
}

impl InvokeError {
    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Create a credentials error
    pub fn credentials(message: impl Into<String>) -> Self {
        Self::Credentials(message.into())
    }

    /// Create an endpoint error
    pub fn endpoint(message: impl Into<String>) -> Self {
        Self::Endpoint(message.into())
    }
}
