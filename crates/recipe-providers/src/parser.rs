//! # Model Response Parser
//!
//! Maps a raw provider response to a `NormalizedResult` in a single pass:
//! absence, status, emptiness, JSON parse, then an ordered list of response
//! shapes. Each shape is a pure extractor; the first one that recognizes the
//! body decides the result.

use recipe_core::{NormalizedResult, ProviderResponse};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// What a response shape found in the body
#[derive(Debug, Clone, PartialEq, Eq)]
enum Extraction {
    Text(String),
    ProviderError(String),
}

/// A named extractor for one known response schema
struct ResponseShape {
    name: &'static str,
    extract: fn(&Map<String, Value>) -> Option<Extraction>,
}

/// Tried in order; append new provider formats at the end.
const RESPONSE_SHAPES: &[ResponseShape] = &[
    ResponseShape {
        name: "error_object",
        extract: error_object,
    },
    ResponseShape {
        name: "content_list",
        extract: content_list,
    },
    ResponseShape {
        name: "completion",
        extract: completion,
    },
    ResponseShape {
        name: "output",
        extract: output,
    },
    ResponseShape {
        name: "titan_results",
        extract: titan_results,
    },
    ResponseShape {
        name: "llama_generation",
        extract: llama_generation,
    },
];

/// Fields that carry generated text in some known shape
const TEXT_FIELDS: &[&str] = &["content", "completion", "output", "results", "generation"];

/// Parse a provider response into the normalized result shape
pub fn parse_response(response: Option<&ProviderResponse>) -> NormalizedResult {
    let Some(response) = response else {
        warn!("No response received from provider");
        return NormalizedResult::failure("no response received");
    };

    if response.is_error_status() {
        let detail = error_detail(&response.body);
        warn!(status = response.status_code, detail = %detail, "Provider returned error status");
        return NormalizedResult::failure(if detail.is_empty() {
            format!("provider returned status {}", response.status_code)
        } else {
            format!("provider returned status {}: {detail}", response.status_code)
        });
    }

    if response.body.trim().is_empty() {
        warn!(status = response.status_code, "Provider returned an empty body");
        return NormalizedResult::failure("empty response from provider");
    }

    let parsed: Value = match serde_json::from_str(&response.body) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "Provider response is not valid JSON");
            return NormalizedResult::failure(format!("failed to parse provider response: {e}"));
        }
    };

    let fields = match parsed {
        Value::Object(fields) => fields,
        other => {
            return NormalizedResult::failure(format!(
                "unrecognized provider response: expected a JSON object, got {}",
                json_kind(&other)
            ));
        }
    };

    for shape in RESPONSE_SHAPES {
        if let Some(extraction) = (shape.extract)(&fields) {
            debug!(shape = shape.name, "Matched provider response shape");
            return match extraction {
                Extraction::Text(text) => NormalizedResult::success(text),
                Extraction::ProviderError(message) => NormalizedResult::failure(message),
            };
        }
    }

    let mut names: Vec<&str> = fields.keys().map(String::as_str).collect();
    names.sort_unstable();
    warn!(fields = ?names, "Provider response matched no known shape");

    NormalizedResult::failure(if names.is_empty() {
        "unrecognized provider response: no fields present".to_string()
    } else {
        format!(
            "unrecognized provider response; fields present: {}",
            names.join(", ")
        )
    })
}

/// `{"error": {"message": ..}}`, `{"error": ".."}`, or a bare `message`
fn error_object(fields: &Map<String, Value>) -> Option<Extraction> {
    if let Some(error) = fields.get("error") {
        let message = match error {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            Value::Object(inner) => Some(
                message_field(inner).unwrap_or_else(|| Value::Object(inner.clone()).to_string()),
            ),
            other => Some(other.to_string()),
        };
        if let Some(message) = message.filter(|m| !m.is_empty()) {
            return Some(Extraction::ProviderError(message));
        }
    }

    if TEXT_FIELDS.iter().any(|f| fields.contains_key(*f)) {
        return None;
    }

    message_field(fields).map(Extraction::ProviderError)
}

/// First entry of `content` with `type == "text"`
fn content_list(fields: &Map<String, Value>) -> Option<Extraction> {
    fields
        .get("content")?
        .as_array()?
        .iter()
        .find(|block| block.get("type").and_then(Value::as_str) == Some("text"))
        .and_then(|block| block.get("text"))
        .and_then(Value::as_str)
        .map(text)
}

/// Legacy completion API
fn completion(fields: &Map<String, Value>) -> Option<Extraction> {
    fields.get("completion")?.as_str().map(text)
}

/// Generic `output`, stringified when it is not already a string
fn output(fields: &Map<String, Value>) -> Option<Extraction> {
    match fields.get("output")? {
        Value::Null => None,
        Value::String(s) => Some(text(s)),
        other => Some(text(&other.to_string())),
    }
}

/// Amazon Titan: `results[0].outputText`
fn titan_results(fields: &Map<String, Value>) -> Option<Extraction> {
    fields
        .get("results")?
        .as_array()?
        .first()?
        .get("outputText")?
        .as_str()
        .map(text)
}

/// Meta Llama: `generation`
fn llama_generation(fields: &Map<String, Value>) -> Option<Extraction> {
    fields.get("generation")?.as_str().map(text)
}

fn text(s: &str) -> Extraction {
    if s.is_empty() {
        Extraction::ProviderError("provider returned empty text".to_string())
    } else {
        Extraction::Text(s.to_string())
    }
}

fn message_field(fields: &Map<String, Value>) -> Option<String> {
    ["message", "Message"]
        .iter()
        .find_map(|k| fields.get(*k).and_then(Value::as_str))
        .filter(|m| !m.is_empty())
        .map(String::from)
}

/// Human-readable detail for an error-status body
fn error_detail(body: &str) -> String {
    let trimmed = body.trim();
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(fields)) => match error_object(&fields) {
            Some(Extraction::ProviderError(message)) => message,
            _ => trimmed.to_string(),
        },
        _ => trimmed.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
