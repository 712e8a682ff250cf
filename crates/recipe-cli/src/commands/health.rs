//! Health check command.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use crate::output::{self, CommandResult, OutputFormat};

/// Arguments for the health command.
#[derive(Args, Debug)]
pub struct HealthArgs {
    /// Timeout in seconds
    #[arg(short, long, default_value = "5")]
    pub timeout: u64,

    /// Check specific endpoint (health, ready, live)
    #[arg(long, default_value = "health")]
    pub endpoint: String,
}

/// Health check response for output.
#[derive(Debug, Serialize)]
pub struct HealthOutput {
    pub status: String,
    pub endpoint: String,
    pub response_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Execute the health command.
pub async fn execute(args: HealthArgs, base_url: &str, json: bool) -> Result<ExitCode> {
    let format = OutputFormat::from_json_flag(json);

    let Some(endpoint_path) = endpoint_path(&args.endpoint) else {
        CommandResult::<HealthOutput>::failure(format!("Unknown endpoint: {}", args.endpoint))
            .print(format)?;
        return Ok(ExitCode::FAILURE);
    };

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(args.timeout))
        .build()?;
    let url = format!("{}{}", base_url.trim_end_matches('/'), endpoint_path);

    let spinner = (!json).then(|| output::spinner(&format!("Checking {} endpoint...", args.endpoint)));
    let start = Instant::now();
    let response = client.get(&url).send().await;
    let elapsed = start.elapsed();
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let response = match response {
        Ok(response) => response,
        Err(e) => {
            CommandResult::<HealthOutput>::failure(format!("Failed to connect: {e}")).print(format)?;
            return Ok(ExitCode::FAILURE);
        }
    };

    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let body: serde_json::Value = serde_json::from_str(&text).unwrap_or_default();

    if !status.is_success() {
        CommandResult::<HealthOutput>::failure(format!(
            "Health check failed with status {status}"
        ))
        .print(format)?;
        return Ok(ExitCode::FAILURE);
    }

    let health = HealthOutput {
        status: body["status"]
            .as_str()
            .map_or_else(|| text.trim().to_string(), String::from),
        endpoint: args.endpoint.clone(),
        response_time_ms: elapsed.as_millis() as u64,
        version: body["version"].as_str().map(String::from),
    };

    match format {
        OutputFormat::Json => CommandResult::success(health).print(format)?,
        OutputFormat::Text => {
            output::success("Gateway is healthy");
            output::key_value("Endpoint", &health.endpoint);
            output::key_value("Status", &health.status);
            output::key_value("Response Time", &format!("{}ms", health.response_time_ms));
            if let Some(version) = &health.version {
                output::key_value("Version", version);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn endpoint_path(endpoint: &str) -> Option<&'static str> {
    match endpoint {
        "health" => Some("/health"),
        "ready" | "readiness" => Some("/ready"),
        "live" | "liveness" => Some("/live"),
        _ => None,
    }
}
