//! The `askBedrock` pipeline: build, invoke, parse.

use recipe_core::{
    InvocationArguments, InvokeError, NormalizedResult, ProviderRequest, ProviderResponse,
};
use recipe_providers::parse_response;
use recipe_telemetry::InvocationOutcome;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::state::AppState;

/// Run one invocation end to end.
///
/// Never fails: build errors, transport errors, provider errors, and
/// unrecognized responses all come back as a `NormalizedResult` error.
pub async fn ask_bedrock(
    state: &AppState,
    args: &InvocationArguments,
    request_id: &str,
) -> NormalizedResult {
    let started = Instant::now();
    let variant = state.builder.select(args);
    let model = state.builder.models().for_variant(variant);

    let (result, outcome) = match state.builder.build_variant(args, variant) {
        Err(e) => {
            warn!(request_id, %variant, error = %e, "Failed to build provider request");
            (
                NormalizedResult::failure(e.to_string()),
                InvocationOutcome::BuildError,
            )
        }
        Ok(request) => match invoke_with_deadline(state, &request).await {
            Err(e) => {
                warn!(
                    request_id,
                    %variant,
                    model,
                    invoker = state.invoker.id(),
                    error = %e,
                    "Provider invocation failed"
                );
                (
                    NormalizedResult::failure(e.to_string()),
                    InvocationOutcome::TransportError,
                )
            }
            Ok(response) => {
                debug!(request_id, status = response.status_code, "Provider responded");
                let parsed = parse_response(Some(&response));
                let outcome = if parsed.is_success() {
                    InvocationOutcome::Success
                } else {
                    InvocationOutcome::ProviderError
                };
                (parsed, outcome)
            }
        },
    };

    let elapsed = started.elapsed();
    state
        .metrics
        .record_invocation(variant.as_str(), outcome, elapsed);

    match result.error() {
        None => info!(
            request_id,
            %variant,
            model,
            outcome = outcome.as_str(),
            duration_ms = elapsed.as_millis() as u64,
            "askBedrock completed"
        ),
        Some(error) => warn!(
            request_id,
            %variant,
            model,
            outcome = outcome.as_str(),
            duration_ms = elapsed.as_millis() as u64,
            error,
            "askBedrock failed"
        ),
    }

    result
}

/// Invoke the provider, giving up after `bedrock.timeout`
async fn invoke_with_deadline(
    state: &AppState,
    request: &ProviderRequest,
) -> Result<ProviderResponse, InvokeError> {
    let deadline = state.config.bedrock.timeout;
    tokio::time::timeout(deadline, state.invoker.invoke(request))
        .await
        .unwrap_or_else(|_| {
            Err(InvokeError::transport(format!(
                "provider did not respond within {deadline:?}"
            )))
        })
}
