//! # Recipe Config
//!
//! Configuration management for the Recipe AI gateway.
//!
//! Configuration is layered, later sources winning:
//! 1. Built-in defaults
//! 2. A YAML, TOML, or JSON file (`RECIPE_AI_CONFIG`)
//! 3. Environment overrides (`RECIPE_AI_*`, `AWS_REGION`, `BEDROCK_*`)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod settings;

pub use error::ConfigError;
pub use loader::{load_config, ConfigLoader, CONFIG_PATH_ENV};
pub use settings::{BedrockSettings, GatewayConfig, LoggingSettings, ServerSettings};
