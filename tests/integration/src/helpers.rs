//! Test helper utilities for integration tests

use recipe_config::GatewayConfig;
use recipe_core::NormalizedResult;
use recipe_server::{AppState, Server, ServerConfig};
use reqwest::{Client, Response};
use secrecy::SecretString;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Once;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Initialize tracing for tests when `TEST_LOG` is set
pub fn init_tracing() {
    TRACING.call_once(|| {
        if std::env::var("TEST_LOG").is_ok() {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::from_default_env())
                .with_test_writer()
                .try_init();
        }
    });
}

/// Gateway configuration pointing at a mock Bedrock endpoint
pub fn config_for(endpoint: &str) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.server.host = "127.0.0.1".to_string();
    config.bedrock.endpoint_url = Some(endpoint.to_string());
    config.bedrock.access_key_id = Some("AKIDEXAMPLE".to_string());
    config.bedrock.secret_access_key =
        Some(SecretString::new("wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY".to_string()));
    config
}

/// A gateway running on an ephemeral port
pub struct TestServer {
    /// The server address
    pub addr: SocketAddr,
    /// HTTP client for making requests
    pub client: Client,
    /// Base URL for the server
    pub base_url: String,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Start a gateway with the given configuration
    pub async fn start(config: GatewayConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get local addr");

        let server_config = ServerConfig::from(&config.server);
        let state = AppState::from_config(config).expect("Failed to build state");
        let server = Server::new(server_config, state);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(server.serve(listener, async {
            let _ = shutdown_rx.await;
        }));

        Self {
            addr,
            client: Client::new(),
            base_url: format!("http://{addr}"),
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// POST a JSON body
    pub async fn post_json(&self, path: &str, body: &Value) -> Response {
        self.client
            .post(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .await
            .expect("Failed to send request")
    }

    /// GET a path
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
            .expect("Failed to send request")
    }

    /// Call `askBedrock` and decode the result
    pub async fn ask(&self, args: &Value) -> NormalizedResult {
        let response = self.post_json("/v1/ask-bedrock", args).await;
        assert_eq!(response.status(), 200);
        response.json().await.expect("Failed to decode result")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
