//! Configuration structures.

use recipe_core::TextVariant;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::{Validate, ValidationError};

/// Root gateway configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_timeouts"))]
pub struct GatewayConfig {
    /// HTTP server settings
    #[validate(nested)]
    pub server: ServerSettings,
    /// Bedrock provider settings
    #[validate(nested)]
    pub bedrock: BedrockSettings,
    /// Logging settings
    #[validate(nested)]
    pub logging: LoggingSettings,
}

/// Provider calls must end before the HTTP request times out
fn validate_timeouts(config: &GatewayConfig) -> Result<(), ValidationError> {
    if config.bedrock.timeout >= config.server.request_timeout {
        let mut error = ValidationError::new("timeout_order");
        error.message = Some("bedrock.timeout must be shorter than server.request_timeout".into());
        return Err(error);
    }
    Ok(())
}

/// Room for a base64-encoded 5 MB image plus the surrounding JSON
const DEFAULT_MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ServerSettings {
    /// Bind address
    #[validate(length(min = 1))]
    pub host: String,
    /// Bind port
    #[validate(range(min = 1))]
    pub port: u16,
    /// Upper bound on handling one request, provider call included
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// Largest accepted request body in bytes
    #[validate(range(min = 1024))]
    pub max_body_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout: Duration::from_secs(330),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Bedrock provider settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct BedrockSettings {
    /// AWS region
    #[validate(length(min = 1))]
    pub region: String,
    /// Custom runtime endpoint
    pub endpoint_url: Option<String>,
    /// Schema for text-only requests
    pub text_variant: TextVariant,
    /// Model used for image questions
    #[validate(length(min = 1))]
    pub vision_model: String,
    /// Model used for message-style text
    #[validate(length(min = 1))]
    pub message_model: String,
    /// Model used for legacy completions
    #[validate(length(min = 1))]
    pub legacy_model: String,
    /// Provider HTTP timeout
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// AWS access key ID; falls back to `AWS_ACCESS_KEY_ID`
    pub access_key_id: Option<String>,
    /// AWS secret access key; falls back to `AWS_SECRET_ACCESS_KEY`
    #[serde(skip_serializing)]
    pub secret_access_key: Option<SecretString>,
    /// AWS session token; falls back to `AWS_SESSION_TOKEN`
    #[serde(skip_serializing)]
    pub session_token: Option<SecretString>,
}

impl Default for BedrockSettings {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            endpoint_url: None,
            text_variant: TextVariant::default(),
            vision_model: "anthropic.claude-3-sonnet-20240229-v1:0".to_string(),
            message_model: "anthropic.claude-3-sonnet-20240229-v1:0".to_string(),
            legacy_model: "anthropic.claude-v2".to_string(),
            timeout: Duration::from_secs(300),
            access_key_id: None,
            secret_access_key: None,
            session_token: None,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive when `RUST_LOG` is unset
    #[validate(length(min = 1))]
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
    /// Deployment environment attached to spans
    pub environment: String,
    /// Export spans through OpenTelemetry
    pub otel_enabled: bool,
    /// Span sampling rate
    #[validate(range(min = 0.0, max = 1.0))]
    pub sampling_rate: f64,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            environment: "development".to_string(),
            otel_enabled: false,
            sampling_rate: 1.0,
        }
    }
}
