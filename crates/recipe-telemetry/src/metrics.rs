//! Prometheus metrics for model invocations.

use crate::tracing_setup::TelemetryError;
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::fmt;
use std::time::Duration;

/// How one `askBedrock` call ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationOutcome {
    /// Text returned
    Success,
    /// Arguments could not be turned into a request
    BuildError,
    /// No response from the provider
    TransportError,
    /// Provider or parser reported an error
    ProviderError,
}

impl InvocationOutcome {
    /// Label value
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::BuildError => "build_error",
            Self::TransportError => "transport_error",
            Self::ProviderError => "provider_error",
        }
    }
}

/// Invocation metrics backed by a private registry
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    invocations: IntCounterVec,
    duration: HistogramVec,
}

impl fmt::Debug for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Metrics").finish_non_exhaustive()
    }
}

impl Metrics {
    /// Create and register all metrics
    pub fn new() -> Result<Self, TelemetryError> {
        let registry = Registry::new();

        let invocations = IntCounterVec::new(
            Opts::new(
                "recipe_ai_invocations_total",
                "Model invocations by variant and outcome",
            ),
            &["variant", "outcome"],
        )?;
        let duration = HistogramVec::new(
            HistogramOpts::new(
                "recipe_ai_invocation_duration_seconds",
                "End-to-end invocation latency",
            )
            .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0]),
            &["variant"],
        )?;

        registry.register(Box::new(invocations.clone()))?;
        registry.register(Box::new(duration.clone()))?;

        Ok(Self {
            registry,
            invocations,
            duration,
        })
    }

    /// Record one finished invocation
    pub fn record_invocation(&self, variant: &str, outcome: InvocationOutcome, elapsed: Duration) {
        self.invocations
            .with_label_values(&[variant, outcome.as_str()])
            .inc();
        self.duration
            .with_label_values(&[variant])
            .observe(elapsed.as_secs_f64());
    }

    /// Count of invocations for a label pair
    pub fn invocation_count(&self, variant: &str, outcome: InvocationOutcome) -> u64 {
        self.invocations
            .with_label_values(&[variant, outcome.as_str()])
            .get()
    }

    /// Text exposition format
    pub fn gather(&self) -> String {
        let mut buffer = Vec::new();
        if TextEncoder::new()
            .encode(&self.registry.gather(), &mut buffer)
            .is_err()
        {
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_count() {
        let metrics = Metrics::new().unwrap();
        metrics.record_invocation("vision", InvocationOutcome::Success, Duration::from_millis(120));
        metrics.record_invocation("vision", InvocationOutcome::Success, Duration::from_millis(80));
        metrics.record_invocation("legacy_text", InvocationOutcome::ProviderError, Duration::ZERO);

        assert_eq!(metrics.invocation_count("vision", InvocationOutcome::Success), 2);
        assert_eq!(
            metrics.invocation_count("legacy_text", InvocationOutcome::ProviderError),
            1
        );
        assert_eq!(metrics.invocation_count("vision", InvocationOutcome::BuildError), 0);
    }

    #[test]
    fn test_gather_text_format() {
        let metrics = Metrics::new().unwrap();
        metrics.record_invocation(
            "message_text",
            InvocationOutcome::TransportError,
            Duration::from_secs(1),
        );

        let text = metrics.gather();
        assert!(text.contains("recipe_ai_invocations_total"));
        assert!(text.contains("outcome=\"transport_error\""));
        assert!(text.contains("recipe_ai_invocation_duration_seconds_bucket"));
    }

    #[test]
    fn test_instances_are_independent() {
        let a = Metrics::new().unwrap();
        let b = Metrics::new().unwrap();
        a.record_invocation("vision", InvocationOutcome::Success, Duration::ZERO);
        assert_eq!(b.invocation_count("vision", InvocationOutcome::Success), 0);
    }
}
