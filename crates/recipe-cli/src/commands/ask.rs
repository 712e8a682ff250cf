//! Ask command - sends an `askBedrock` query to the gateway.

use anyhow::Result;
use clap::Args;
use recipe_core::{InvocationArguments, NormalizedResult};
use serde::Serialize;
use std::process::ExitCode;
use std::time::Duration;
use tracing::debug;

use super::input::InputArgs;
use crate::output::{self, CommandResult, OutputFormat};

/// Arguments for the ask command.
#[derive(Args, Debug)]
pub struct AskArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Timeout in seconds
    #[arg(short, long, default_value = "120")]
    pub timeout: u64,
}

/// Answer for JSON output.
#[derive(Debug, Serialize)]
pub struct AskOutput {
    pub body: String,
}

/// Execute the ask command.
pub async fn execute(args: AskArgs, base_url: &str, json: bool) -> Result<ExitCode> {
    let format = OutputFormat::from_json_flag(json);

    let invocation = match args.input.to_arguments() {
        Ok(invocation) => invocation,
        Err(e) => {
            CommandResult::<AskOutput>::failure(format!("{e:#}")).print(format)?;
            return Ok(ExitCode::FAILURE);
        }
    };

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(args.timeout))
        .build()?;

    let spinner = (!json).then(|| output::spinner("Asking for a recipe idea..."));
    let result = ask_gateway(&client, base_url, &invocation).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    report(result, format)
}

/// POST the arguments and normalize whatever comes back.
pub async fn ask_gateway(
    client: &reqwest::Client,
    base_url: &str,
    invocation: &InvocationArguments,
) -> NormalizedResult {
    let url = format!("{}/v1/ask-bedrock", base_url.trim_end_matches('/'));
    debug!(url = %url, "Sending askBedrock query");

    let response = match client.post(&url).json(invocation).send().await {
        Ok(response) => response,
        Err(e) => return NormalizedResult::failure(format!("Failed to reach gateway: {e}")),
    };

    let status = response.status();
    if status.is_success() {
        return response
            .json::<NormalizedResult>()
            .await
            .unwrap_or_else(|e| NormalizedResult::failure(format!("Invalid gateway response: {e}")));
    }

    let text = response.text().await.unwrap_or_default();
    NormalizedResult::failure(gateway_error(status, &text))
}

/// Error message from a non-2xx gateway reply
fn gateway_error(status: reqwest::StatusCode, body: &str) -> String {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(String::from));

    match message {
        Some(message) => format!("Gateway returned {status}: {message}"),
        None => format!("Gateway returned {status}"),
    }
}

/// Print the result; an error always wins over a body.
fn report(result: NormalizedResult, format: OutputFormat) -> Result<ExitCode> {
    if let Some(error) = result.error() {
        CommandResult::<AskOutput>::failure(error).print(format)?;
        return Ok(ExitCode::FAILURE);
    }

    match format {
        OutputFormat::Json => CommandResult::success(AskOutput { body: result.body }).print(format)?,
        OutputFormat::Text => println!("{}", result.body.trim()),
    }
    Ok(ExitCode::SUCCESS)
}
