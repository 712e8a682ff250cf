//! Model variants and variant selection.

use crate::request::InvocationArguments;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Payload schema used for text-only invocations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextVariant {
    /// Messages schema with a single text block
    #[default]
    Message,
    /// Flat Human/Assistant prompt with a stop sequence
    Legacy,
}

impl FromStr for TextVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "message" | "messages" => Ok(Self::Message),
            "legacy" | "completion" => Ok(Self::Legacy),
            other => Err(format!("unknown text variant: {other}")),
        }
    }
}

/// The payload schema a request is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelVariant {
    /// Image block plus question, messages schema
    Vision,
    /// Turn-delimited prompt, completion schema
    LegacyText,
    /// Single text block, messages schema
    MessageText,
}

impl ModelVariant {
    /// Pick the variant for a request: image data means vision, otherwise
    /// the configured text variant.
    pub fn select(args: &InvocationArguments, text: TextVariant) -> Self {
        if args.has_image() {
            return Self::Vision;
        }
        match text {
            TextVariant::Message => Self::MessageText,
            TextVariant::Legacy => Self::LegacyText,
        }
    }

    /// Stable label for logs and metrics
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vision => "vision",
            Self::LegacyText => "legacy_text",
            Self::MessageText => "message_text",
        }
    }
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
