//! # Recipe Core
//!
//! Core types, traits, and error handling for the Recipe AI gateway.
//!
//! This crate provides the values that flow through a single `askBedrock`
//! exchange:
//! - Invocation arguments supplied by the caller
//! - The provider request produced by the invocation builder
//! - The raw provider response and the normalized result handed back
//! - The `ModelInvoker` seam between the gateway and the provider transport

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod invoker;
pub mod request;
pub mod response;
pub mod variant;

// Re-export commonly used types
pub use error::{BuildError, InvokeError};
pub use invoker::ModelInvoker;
pub use request::{parse_ingredient_list, HttpMethod, InvocationArguments, ProviderRequest};
pub use response::{NormalizedResult, ProviderResponse};
pub use variant::{ModelVariant, TextVariant};
