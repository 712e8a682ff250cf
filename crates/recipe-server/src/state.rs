//! Shared application state.

use recipe_config::{BedrockSettings, GatewayConfig};
use recipe_core::ModelInvoker;
use recipe_providers::{BedrockConfig, BedrockInvoker, InvocationBuilder, ModelIds};
use recipe_telemetry::Metrics;
use secrecy::ExposeSecret;
use std::sync::Arc;

use crate::error::ServerError;

/// State handed to every handler
#[derive(Debug, Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<GatewayConfig>,
    /// Request builder configured with model ids and text variant
    pub builder: Arc<InvocationBuilder>,
    /// Provider transport
    pub invoker: Arc<dyn ModelInvoker>,
    /// Invocation metrics
    pub metrics: Metrics,
}

impl AppState {
    /// Create a state builder
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::default()
    }

    /// State backed by a Bedrock invoker built from configuration
    pub fn from_config(config: GatewayConfig) -> Result<Self, ServerError> {
        Self::builder().config(config).build()
    }
}

/// Builder for `AppState`
#[derive(Debug, Default)]
pub struct AppStateBuilder {
    config: Option<GatewayConfig>,
    invoker: Option<Arc<dyn ModelInvoker>>,
    metrics: Option<Metrics>,
}

impl AppStateBuilder {
    /// Set the configuration
    #[must_use]
    pub fn config(mut self, config: GatewayConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use a specific invoker instead of Bedrock
    #[must_use]
    pub fn invoker(mut self, invoker: Arc<dyn ModelInvoker>) -> Self {
        self.invoker = Some(invoker);
        self
    }

    /// Share an existing metrics registry
    #[must_use]
    pub fn metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Build the state
    pub fn build(self) -> Result<AppState, ServerError> {
        let config = self.config.unwrap_or_default();

        let builder = InvocationBuilder::new()
            .with_models(model_ids(&config.bedrock))
            .with_text_variant(config.bedrock.text_variant);

        let invoker: Arc<dyn ModelInvoker> = match self.invoker {
            Some(invoker) => invoker,
            None => Arc::new(BedrockInvoker::new(bedrock_config(&config.bedrock))?),
        };

        let metrics = match self.metrics {
            Some(metrics) => metrics,
            None => Metrics::new()?,
        };

        Ok(AppState {
            config: Arc::new(config),
            builder: Arc::new(builder),
            invoker,
            metrics,
        })
    }
}

fn model_ids(settings: &BedrockSettings) -> ModelIds {
    ModelIds {
        vision: settings.vision_model.clone(),
        message: settings.message_model.clone(),
        legacy: settings.legacy_model.clone(),
    }
}

fn bedrock_config(settings: &BedrockSettings) -> BedrockConfig {
    let mut builder = BedrockConfig::builder()
        .region(&settings.region)
        .timeout(settings.timeout);

    if let Some(url) = &settings.endpoint_url {
        builder = builder.endpoint_url(url);
    }
    if let Some(key) = &settings.access_key_id {
        builder = builder.access_key_id(key);
    }
    if let Some(secret) = &settings.secret_access_key {
        builder = builder.secret_access_key(secret.expose_secret().as_str());
    }
    if let Some(token) = &settings.session_token {
        builder = builder.session_token(token.expose_secret().as_str());
    }

    builder.build()
}
