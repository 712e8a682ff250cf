//! # Recipe Providers
//!
//! The request/response translation for the Recipe AI gateway:
//! - `builder`: invocation arguments to a Bedrock invocation (vision,
//!   legacy text, and message-style text variants)
//! - `parser`: raw Bedrock responses to a normalized `{ body, error }` result
//! - `bedrock`: SigV4-signed HTTP transport implementing `ModelInvoker`

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bedrock;
pub mod builder;
pub mod parser;

// Re-export main types
pub use bedrock::{BedrockConfig, BedrockConfigBuilder, BedrockInvoker};
pub use builder::{InvocationBuilder, ModelIds};
pub use parser::parse_response;
