//! # Recipe Telemetry
//!
//! Observability for the Recipe AI gateway:
//! - Structured logging (human or JSON) with `tracing-subscriber`
//! - Optional OpenTelemetry span export
//! - Prometheus metrics for model invocations

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod metrics;
pub mod tracing_setup;

pub use metrics::{InvocationOutcome, Metrics};
pub use tracing_setup::{init_telemetry, TelemetryConfig, TelemetryError, TelemetryGuard};
