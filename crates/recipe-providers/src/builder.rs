//! # Model Invocation Builder
//!
//! Maps `InvocationArguments` to a Bedrock `ProviderRequest`. Three payload
//! schemas are supported:
//!
//! - **Vision**: messages schema with an image block and a text block
//! - **Legacy text**: a single `\n\nHuman: ... \n\nAssistant:` prompt with a
//!   stop sequence
//! - **Message-style text**: messages schema with a single text block
//!
//! Building is pure. Every failure comes back as a `BuildError`.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use recipe_core::{
    BuildError, InvocationArguments, ModelVariant, ProviderRequest, TextVariant,
};
use serde_json::{json, Value};
use tracing::debug;

/// `anthropic_version` sent with messages-schema payloads
pub const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

/// Media type assumed for raw base64 images
pub const DEFAULT_IMAGE_MEDIA_TYPE: &str = "image/jpeg";

const VISION_MAX_TOKENS: u32 = 1000;
const MESSAGE_MAX_TOKENS: u32 = 200;

const LEGACY_MAX_TOKENS: u32 = 300;
const LEGACY_TEMPERATURE: f64 = 0.5;
const LEGACY_TOP_K: u32 = 250;
const LEGACY_TOP_P: f64 = 1.0;
const LEGACY_STOP_SEQUENCE: &str = "\n\nHuman:";

/// Model identifiers targeted by each variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelIds {
    /// Model used for image understanding
    pub vision: String,
    /// Model used for message-style text
    pub message: String,
    /// Model used for legacy text completions
    pub legacy: String,
}

impl Default for ModelIds {
    fn default() -> Self {
        Self {
            vision: "anthropic.claude-3-sonnet-20240229-v1:0".to_string(),
            message: "anthropic.claude-3-sonnet-20240229-v1:0".to_string(),
            legacy: "anthropic.claude-v2".to_string(),
        }
    }
}

impl ModelIds {
    /// Model identifier for a variant
    pub fn for_variant(&self, variant: ModelVariant) -> &str {
        match variant {
            ModelVariant::Vision => &self.vision,
            ModelVariant::MessageText => &self.message,
            ModelVariant::LegacyText => &self.legacy,
        }
    }
}

/// Builds provider requests from invocation arguments
#[derive(Debug, Clone, Default)]
pub struct InvocationBuilder {
    models: ModelIds,
    text_variant: TextVariant,
}

impl InvocationBuilder {
    /// Create a builder with default models and the message-style text variant
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the model identifiers
    #[must_use]
    pub fn with_models(mut self, models: ModelIds) -> Self {
        self.models = models;
        self
    }

    /// Set the variant used for text-only requests
    #[must_use]
    pub fn with_text_variant(mut self, text_variant: TextVariant) -> Self {
        self.text_variant = text_variant;
        self
    }

    /// Model identifiers in use
    pub fn models(&self) -> &ModelIds {
        &self.models
    }

    /// Variant that `build` would use for these arguments
    pub fn select(&self, args: &InvocationArguments) -> ModelVariant {
        ModelVariant::select(args, self.text_variant)
    }

    /// Build a request, selecting the variant from the arguments
    pub fn build(&self, args: &InvocationArguments) -> Result<ProviderRequest, BuildError> {
        self.build_variant(args, self.select(args))
    }

    /// Build a request for an explicit variant
    pub fn build_variant(
        &self,
        args: &InvocationArguments,
        variant: ModelVariant,
    ) -> Result<ProviderRequest, BuildError> {
        let payload = match variant {
            ModelVariant::Vision => vision_payload(args)?,
            ModelVariant::LegacyText => legacy_payload(args),
            ModelVariant::MessageText => message_payload(args),
        };

        let body = serde_json::to_string(&payload)
            .map_err(|e| BuildError::Serialization(e.to_string()))?;
        let model_id = self.models.for_variant(variant);

        debug!(
            variant = %variant,
            model = %model_id,
            ingredients = args.ingredients.len(),
            has_question = args.question().is_some(),
            "Built provider request"
        );

        Ok(ProviderRequest::post_json(model_id, body))
    }
}

/// Image block plus question
fn vision_payload(args: &InvocationArguments) -> Result<Value, BuildError> {
    let raw = args
        .image_data
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or(BuildError::MissingImage)?;

    let (media_type, data) = parse_data_url(raw)
        .unwrap_or_else(|| (DEFAULT_IMAGE_MEDIA_TYPE.to_string(), raw.to_string()));

    STANDARD
        .decode(data.as_bytes())
        .map_err(|e| BuildError::InvalidImage(e.to_string()))?;

    Ok(json!({
        "anthropic_version": ANTHROPIC_VERSION,
        "max_tokens": VISION_MAX_TOKENS,
        "messages": [{
            "role": "user",
            "content": [
                {
                    "type": "image",
                    "source": {
                        "type": "base64",
                        "media_type": media_type,
                        "data": data
                    }
                },
                { "type": "text", "text": args.image_question() }
            ]
        }]
    }))
}

/// Turn-delimited prompt for the completion schema
fn legacy_payload(args: &InvocationArguments) -> Value {
    json!({
        "prompt": legacy_prompt(&args.text_prompt()),
        "max_tokens_to_sample": LEGACY_MAX_TOKENS,
        "temperature": LEGACY_TEMPERATURE,
        "top_k": LEGACY_TOP_K,
        "top_p": LEGACY_TOP_P,
        "stop_sequences": [LEGACY_STOP_SEQUENCE]
    })
}

/// Single text block, messages schema
fn message_payload(args: &InvocationArguments) -> Value {
    json!({
        "anthropic_version": ANTHROPIC_VERSION,
        "max_tokens": MESSAGE_MAX_TOKENS,
        "messages": [{
            "role": "user",
            "content": [{ "type": "text", "text": args.text_prompt() }]
        }]
    })
}

/// Wrap a prompt in Human/Assistant turn delimiters
pub fn legacy_prompt(prompt: &str) -> String {
    format!("\n\nHuman: {prompt}\n\nAssistant:")
}

/// Split a `data:<media>;base64,<data>` URL into media type and payload
fn parse_data_url(url: &str) -> Option<(String, String)> {
    let remainder = url.strip_prefix("data:")?;
    let (metadata, data) = remainder.split_once(',')?;

    let media_type = metadata
        .split(';')
        .next()
        .filter(|m| !m.is_empty())
        .unwrap_or(DEFAULT_IMAGE_MEDIA_TYPE)
        .to_string();

    Some((media_type, data.to_string()))
}
