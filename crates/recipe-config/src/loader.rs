//! Configuration loading: defaults, then file, then environment.

use crate::error::ConfigError;
use crate::settings::GatewayConfig;
use secrecy::SecretString;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};
use validator::Validate;

/// Environment variable naming the configuration file
pub const CONFIG_PATH_ENV: &str = "RECIPE_AI_CONFIG";

/// Load configuration from `RECIPE_AI_CONFIG` (if set) and the environment
pub async fn load_config() -> Result<GatewayConfig, ConfigError> {
    let mut loader = ConfigLoader::new();
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        loader = loader.with_file(path);
    }
    loader.load().await
}

/// Layered configuration loader
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    use_env: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self {
            file: None,
            use_env: true,
        }
    }
}

impl ConfigLoader {
    /// Create a loader that reads only defaults and the environment
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a configuration file
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Skip environment overrides
    #[must_use]
    pub fn without_env(mut self) -> Self {
        self.use_env = false;
        self
    }

    /// Load, merge, and validate
    pub async fn load(&self) -> Result<GatewayConfig, ConfigError> {
        let mut config = match &self.file {
            Some(path) => {
                info!(path = %path.display(), "Loading configuration file");
                let contents =
                    tokio::fs::read_to_string(path)
                        .await
                        .map_err(|source| ConfigError::Io {
                            path: path.clone(),
                            source,
                        })?;
                parse_config(path, &contents)?
            }
            None => GatewayConfig::default(),
        };

        if self.use_env {
            apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Deserialize a configuration file, picking the format by extension
pub fn parse_config(path: &Path, contents: &str) -> Result<GatewayConfig, ConfigError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "yaml" | "yml" => {
            serde_yaml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
        }
        "toml" => toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
        "json" => {
            serde_json::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
        }
        other => Err(ConfigError::UnsupportedFormat(other.to_string())),
    }
}

/// Apply environment overrides through a variable lookup
pub fn apply_env_overrides<F>(config: &mut GatewayConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = lookup("RECIPE_AI_HOST") {
        config.server.host = host;
    }
    if let Some(port) = lookup("RECIPE_AI_PORT") {
        config.server.port = parse_env("RECIPE_AI_PORT", &port)?;
    }
    if let Some(level) = lookup("RECIPE_AI_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = lookup("RECIPE_AI_LOG_JSON") {
        config.logging.json = parse_env("RECIPE_AI_LOG_JSON", &json)?;
    }
    if let Some(otel) = lookup("RECIPE_AI_OTEL") {
        config.logging.otel_enabled = parse_env("RECIPE_AI_OTEL", &otel)?;
    }
    if let Some(region) = lookup("AWS_REGION") {
        config.bedrock.region = region;
    }
    if let Some(url) = lookup("BEDROCK_ENDPOINT_URL") {
        config.bedrock.endpoint_url = Some(url);
    }
    if let Some(variant) = lookup("BEDROCK_TEXT_VARIANT") {
        config.bedrock.text_variant = variant.parse().map_err(|reason| ConfigError::InvalidEnv {
            name: "BEDROCK_TEXT_VARIANT".to_string(),
            reason,
        })?;
    }

    // Credentials: explicit configuration wins over the environment
    if config.bedrock.access_key_id.is_none() {
        config.bedrock.access_key_id = lookup("AWS_ACCESS_KEY_ID");
    }
    if config.bedrock.secret_access_key.is_none() {
        config.bedrock.secret_access_key = lookup("AWS_SECRET_ACCESS_KEY").map(SecretString::new);
    }
    if config.bedrock.session_token.is_none() {
        config.bedrock.session_token = lookup("AWS_SESSION_TOKEN").map(SecretString::new);
    }

    debug!("Environment overrides applied");
    Ok(())
}

fn parse_env<T>(name: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidEnv {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use recipe_core::TextVariant;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;
    use std::io::Write;
    use std::time::Duration;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r"
server:
  port: 9000
  request_timeout: 90s
bedrock:
  region: us-west-2
  text_variant: legacy
  timeout: 1m
logging:
  json: true
";
        let config = parse_config(Path::new("gateway.yaml"), yaml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.request_timeout, Duration::from_secs(90));
        assert_eq!(config.bedrock.region, "us-west-2");
        assert_eq!(config.bedrock.text_variant, TextVariant::Legacy);
        assert_eq!(config.bedrock.timeout, Duration::from_secs(60));
        assert!(config.logging.json);
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
[bedrock]
legacy_model = "anthropic.claude-instant-v1"
secret_access_key = "from-file"
"#;
        let config = parse_config(Path::new("gateway.toml"), toml).unwrap();
        assert_eq!(config.bedrock.legacy_model, "anthropic.claude-instant-v1");
        assert_eq!(
            config
                .bedrock
                .secret_access_key
                .as_ref()
                .map(|s| s.expose_secret().as_str()),
            Some("from-file")
        );
    }

    #[test]
    fn test_parse_json() {
        let config =
            parse_config(Path::new("gateway.json"), r#"{"server":{"host":"127.0.0.1"}}"#).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_unsupported_format() {
        let result = parse_config(Path::new("gateway.ini"), "");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(ext)) if ext == "ini"));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = GatewayConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                ("RECIPE_AI_PORT", "9999"),
                ("RECIPE_AI_LOG_JSON", "true"),
                ("RECIPE_AI_OTEL", "true"),
                ("AWS_REGION", "eu-central-1"),
                ("BEDROCK_TEXT_VARIANT", "legacy"),
                ("AWS_ACCESS_KEY_ID", "AKIAENV"),
            ]),
        )
        .unwrap();

        assert_eq!(config.server.port, 9999);
        assert!(config.logging.json);
        assert!(config.logging.otel_enabled);
        assert_eq!(config.bedrock.region, "eu-central-1");
        assert_eq!(config.bedrock.text_variant, TextVariant::Legacy);
        assert_eq!(config.bedrock.access_key_id.as_deref(), Some("AKIAENV"));
    }

    #[test]
    fn test_explicit_credentials_win() {
        let mut config = GatewayConfig::default();
        config.bedrock.access_key_id = Some("AKIAFILE".to_string());
        apply_env_overrides(&mut config, env(&[("AWS_ACCESS_KEY_ID", "AKIAENV")])).unwrap();
        assert_eq!(config.bedrock.access_key_id.as_deref(), Some("AKIAFILE"));
    }

    #[test]
    fn test_invalid_env_values() {
        let mut config = GatewayConfig::default();
        let result = apply_env_overrides(&mut config, env(&[("RECIPE_AI_PORT", "eighty")]));
        assert!(matches!(result, Err(ConfigError::InvalidEnv { name, .. }) if name == "RECIPE_AI_PORT"));

        let result = apply_env_overrides(&mut config, env(&[("BEDROCK_TEXT_VARIANT", "vision")]));
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "server:\n  port: 7070").unwrap();

        let config = ConfigLoader::new()
            .with_file(file.path())
            .without_env()
            .load()
            .await
            .unwrap();
        assert_eq!(config.server.port, 7070);
    }

    #[tokio::test]
    async fn test_load_rejects_invalid_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "server:\n  port: 0").unwrap();

        let result = ConfigLoader::new()
            .with_file(file.path())
            .without_env()
            .load()
            .await;
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let result = ConfigLoader::new()
            .with_file("/nonexistent/recipe-ai.yaml")
            .without_env()
            .load()
            .await;
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
