//! # Recipe AI Gateway
//!
//! HTTP gateway that turns ingredient lists, questions, and photos into
//! AWS Bedrock Claude invocations and hands back `{ body, error }` results.
//!
//! ## Usage
//!
//! ```bash
//! # Start with default configuration
//! recipe-ai-gateway
//!
//! # Start with a configuration file
//! RECIPE_AI_CONFIG=/path/to/config.yaml recipe-ai-gateway
//!
//! # Start with environment overrides
//! RECIPE_AI_PORT=9000 BEDROCK_TEXT_VARIANT=legacy recipe-ai-gateway
//! ```

use anyhow::Context;
use recipe_config::{load_config, GatewayConfig};
use recipe_server::{telemetry_config, Server};
use recipe_telemetry::init_telemetry;
use tracing::{error, info, warn};

/// Application entry point
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config().await.context("Failed to load configuration")?;

    let telemetry = init_telemetry(&telemetry_config(&config))
        .context("Failed to initialize telemetry")?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        host = %config.server.host,
        port = config.server.port,
        region = %config.bedrock.region,
        "Starting Recipe AI gateway"
    );

    if config.bedrock.access_key_id.is_none() || config.bedrock.secret_access_key.is_none() {
        warn!("AWS credentials not configured; invocations will fail until they are provided");
    }

    let result = run(config).await;
    if let Err(e) = &result {
        error!(error = %e, "Gateway failed");
    }

    telemetry.shutdown();
    result
}

/// Build the server and serve until a shutdown signal
async fn run(config: GatewayConfig) -> anyhow::Result<()> {
    let server = Server::from_config(config).context("Failed to initialize server")?;
    server.run().await.context("Server error")?;
    Ok(())
}
