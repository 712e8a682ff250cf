//! Request types for the gateway.
//!
//! `InvocationArguments` is what a caller sends to the `askBedrock` operation;
//! `ProviderRequest` is what the invocation builder hands to the transport.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Fallback question for image flows without an explicit question
pub const DEFAULT_IMAGE_QUESTION: &str = "What's in this image?";

/// Caller-supplied arguments driving prompt construction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationArguments {
    /// Ingredients, in the order the caller listed them
    #[serde(default, deserialize_with = "null_as_default")]
    pub ingredients: Vec<String>,

    /// Free-text question; empty strings count as absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,

    /// Base64-encoded JPEG for the image-understanding flow
    #[serde(
        default,
        rename = "imageBase64",
        alias = "imageData",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_data: Option<String>,
}

impl InvocationArguments {
    /// Create empty arguments
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ingredient list
    #[must_use]
    pub fn with_ingredients<I, S>(mut self, ingredients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ingredients = ingredients.into_iter().map(Into::into).collect();
        self
    }

    /// Set the question
    #[must_use]
    pub fn with_question(mut self, question: impl Into<String>) -> Self {
        self.question = Some(question.into());
        self
    }

    /// Set base64 image data
    #[must_use]
    pub fn with_image_data(mut self, data: impl Into<String>) -> Self {
        self.image_data = Some(data.into());
        self
    }

    /// The question exactly as given, unless it is blank
    pub fn question(&self) -> Option<&str> {
        self.question
            .as_deref()
            .filter(|q| !q.trim().is_empty())
    }

    /// Whether image data accompanies the request
    pub fn has_image(&self) -> bool {
        self.image_data.as_deref().is_some_and(|d| !d.trim().is_empty())
    }

    /// Whether there is nothing to ask about at all
    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty() && self.question().is_none() && !self.has_image()
    }

    /// Recipe-suggestion prompt built from the ingredient list
    pub fn recipe_prompt(&self) -> String {
        format!(
            "Suggest a recipe idea using these ingredients: {}.",
            self.ingredients.join(", ")
        )
    }

    /// Prompt for text flows: the explicit question, or the recipe prompt
    pub fn text_prompt(&self) -> String {
        self.question()
            .map_or_else(|| self.recipe_prompt(), ToString::to_string)
    }

    /// Question for image flows: the explicit question, or a generic one
    pub fn image_question(&self) -> &str {
        self.question().unwrap_or(DEFAULT_IMAGE_QUESTION)
    }
}

/// Split a comma-separated ingredient string into a trimmed, non-empty list
pub fn parse_ingredient_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|i| !i.is_empty())
        .map(String::from)
        .collect()
}

/// HTTP method used for model invocations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// POST
    #[default]
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Post => write!(f, "POST"),
        }
    }
}

/// A fully built invocation, ready for the transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRequest {
    /// Target model identifier
    pub model_id: String,
    /// Resource path naming the model, e.g. `/model/{id}/invoke`
    pub resource_path: String,
    /// Always POST
    pub method: HttpMethod,
    /// Request headers
    pub headers: BTreeMap<String, String>,
    /// Serialized JSON payload in the provider's schema
    pub body: String,
}

impl ProviderRequest {
    /// Create a JSON POST invocation for the given model
    pub fn post_json(model_id: impl Into<String>, body: String) -> Self {
        let model_id = model_id.into();
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Accept".to_string(), "application/json".to_string());

        Self {
            resource_path: format!("/model/{model_id}/invoke"),
            model_id,
            method: HttpMethod::Post,
            headers,
            body,
        }
    }

    /// Parse the body back into a JSON value
    pub fn body_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// Treat an explicit JSON `null` like a missing field
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
