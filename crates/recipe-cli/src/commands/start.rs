//! Start command - launches the gateway server.

use anyhow::{Context, Result};
use clap::Args;
use recipe_config::{ConfigLoader, GatewayConfig};
use recipe_core::TextVariant;
use recipe_server::{telemetry_config, Server};
use recipe_telemetry::init_telemetry;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::output;

/// Arguments for the start command.
#[derive(Args, Debug)]
pub struct StartArgs {
    /// Configuration file path
    #[arg(short, long, env = "RECIPE_AI_CONFIG")]
    pub config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Text payload schema (message, legacy)
    #[arg(long)]
    pub text_variant: Option<TextVariant>,
}

/// Execute the start command.
pub async fn execute(args: StartArgs) -> Result<ExitCode> {
    let config = load_config(&args).await?;
    let telemetry =
        init_telemetry(&telemetry_config(&config)).context("Failed to initialize telemetry")?;

    output::info(&format!(
        "Starting Recipe AI gateway on {}:{}",
        config.server.host, config.server.port
    ));
    output::key_value("Region", &config.bedrock.region);
    output::key_value("Text variant", &format!("{:?}", config.bedrock.text_variant));
    if config.bedrock.access_key_id.is_none() || config.bedrock.secret_access_key.is_none() {
        output::warning("AWS credentials not configured; invocations will fail until they are provided");
    }
    output::info("Press Ctrl+C to stop");

    let result = run(config).await;
    telemetry.shutdown();
    result?;

    output::info("Server stopped");
    Ok(ExitCode::SUCCESS)
}

async fn run(config: GatewayConfig) -> Result<()> {
    let server = Server::from_config(config).context("Failed to initialize server")?;
    server.run().await.context("Server error")
}

/// Load configuration, then apply command-line overrides.
async fn load_config(args: &StartArgs) -> Result<GatewayConfig> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &args.config {
        output::info(&format!("Loading configuration from {}", path.display()));
        loader = loader.with_file(path);
    }
    let mut config = loader.load().await.context("Failed to load configuration")?;

    if let Some(host) = &args.host {
        config.server.host.clone_from(host);
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(variant) = args.text_variant {
        config.bedrock.text_variant = variant;
    }

    Ok(config)
}
