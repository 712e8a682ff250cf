//! Integration tests for the Recipe AI gateway
//!
//! These tests run the real server over TCP against a wiremock Bedrock
//! runtime:
//! - Each text variant and the vision variant, end to end
//! - Provider error bodies and unrecognized shapes
//! - Request signing headers

pub mod fixtures;
pub mod helpers;
pub mod mock_bedrock;

// Re-export commonly used items
pub use fixtures::*;
pub use helpers::*;
pub use mock_bedrock::*;

#[cfg(test)]
mod e2e_tests;
