//! CLI argument definitions using clap.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::ExitCode;

use crate::commands;

/// Recipe AI - recipe ideas from your ingredients, powered by Bedrock
#[derive(Parser, Debug)]
#[command(name = "recipe-ai")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Gateway server URL
    #[arg(short = 'u', long, env = "RECIPE_AI_URL", default_value = "http://localhost:8080", global = true)]
    pub url: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask the gateway for a recipe idea or about a photo
    Ask(commands::ask::AskArgs),

    /// Show the Bedrock request that would be sent, without sending it
    Preview(commands::preview::PreviewArgs),

    /// Check gateway health
    Health(commands::health::HealthArgs),

    /// Start the gateway server
    #[command(visible_alias = "run")]
    Start(commands::start::StartArgs),
}

impl Cli {
    /// Execute the CLI command.
    pub async fn execute(self) -> Result<ExitCode> {
        match self.command {
            Commands::Ask(args) => commands::ask::execute(args, &self.url, self.json).await,
            Commands::Preview(args) => commands::preview::execute(&args, self.json),
            Commands::Health(args) => commands::health::execute(args, &self.url, self.json).await,
            Commands::Start(args) => commands::start::execute(args).await,
        }
    }
}
