//! Canned Bedrock response bodies

use serde_json::{json, Value};

/// Base64 of a minimal JPEG (SOI, JFIF header, EOI)
pub const SAMPLE_IMAGE_BASE64: &str = "/9j/4AAQSkZJRgABAQAAAQABAAD/2Q==";

/// Messages-schema response
pub fn message_response(text: &str) -> Value {
    json!({
        "id": "msg_01",
        "type": "message",
        "role": "assistant",
        "content": [{"type": "text", "text": text}],
        "stop_reason": "end_turn",
        "usage": {"input_tokens": 12, "output_tokens": 40}
    })
}

/// Legacy completion response
pub fn completion_response(text: &str) -> Value {
    json!({
        "completion": text,
        "stop_reason": "stop_sequence",
        "stop": "\n\nHuman:"
    })
}

/// Bedrock error body
pub fn error_response(message: &str) -> Value {
    json!({ "message": message })
}
