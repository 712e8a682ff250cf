//! HTTP server lifecycle.

use recipe_config::{GatewayConfig, ServerSettings};
use recipe_telemetry::TelemetryConfig;
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;

use crate::{error::ServerError, routes::create_router, shutdown::shutdown_signal, state::AppState};

/// Listen configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from(&ServerSettings::default())
    }
}

impl From<&ServerSettings> for ServerConfig {
    fn from(settings: &ServerSettings) -> Self {
        Self {
            host: settings.host.clone(),
            port: settings.port,
            request_timeout: settings.request_timeout,
        }
    }
}

impl ServerConfig {
    /// Socket address to bind
    pub fn addr(&self) -> Result<SocketAddr, ServerError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|e: std::net::AddrParseError| ServerError::Address {
            addr,
            reason: e.to_string(),
        })
    }
}

/// Telemetry settings for a gateway process, taken from `logging`
pub fn telemetry_config(config: &GatewayConfig) -> TelemetryConfig {
    TelemetryConfig::new("recipe-ai-gateway")
        .with_log_level(config.logging.level.clone())
        .with_json(config.logging.json)
        .with_environment(config.logging.environment.clone())
        .with_otel(config.logging.otel_enabled)
        .with_sampling_rate(config.logging.sampling_rate)
}

/// The gateway server
#[derive(Debug)]
pub struct Server {
    config: ServerConfig,
    state: AppState,
}

impl Server {
    /// Create a server from listen configuration and state
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Create a server and its state from the gateway configuration
    pub fn from_config(config: GatewayConfig) -> Result<Self, ServerError> {
        let server_config = ServerConfig::from(&config.server);
        let state = AppState::from_config(config)?;
        Ok(Self::new(server_config, state))
    }

    /// Listen configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Shared state
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Bind and serve until Ctrl+C or SIGTERM
    pub async fn run(self) -> Result<(), ServerError> {
        self.run_until(shutdown_signal()).await
    }

    /// Bind and serve until `signal` resolves
    pub async fn run_until<F>(self, signal: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.addr()?;
        let listener = TcpListener::bind(addr).await?;
        self.serve(listener, signal).await
    }

    /// Serve on an already bound listener until `signal` resolves
    pub async fn serve<F>(self, listener: TcpListener, signal: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local_addr = listener.local_addr()?;
        info!(
            address = %local_addr,
            invoker = self.state.invoker.id(),
            text_variant = ?self.state.config.bedrock.text_variant,
            "Recipe AI gateway listening"
        );

        let router = create_router(self.state);
        axum::serve(listener, router)
            .with_graceful_shutdown(signal)
            .await?;

        info!("Server stopped");
        Ok(())
    }
}
