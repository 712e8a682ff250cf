//! # Recipe Server
//!
//! HTTP gateway for the Recipe AI application.
//!
//! This crate provides:
//! - The `askBedrock` operation: build, invoke, parse
//! - Health, readiness, liveness, and Prometheus endpoints
//! - Request tracing, CORS, and timeout middleware
//! - Graceful shutdown on SIGINT/SIGTERM

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod pipeline;
pub mod routes;
pub mod server;
pub mod shutdown;
pub mod state;

// Re-export main types
pub use error::{ApiError, ServerError};
pub use pipeline::ask_bedrock;
pub use routes::create_router;
pub use server::{telemetry_config, Server, ServerConfig};
pub use shutdown::shutdown_signal;
pub use state::{AppState, AppStateBuilder};
