//! Mock Bedrock runtime for integration testing

use serde_json::Value;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header_exists, method, path_regex};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

/// Wiremock server answering `POST /model/{id}/invoke`
pub struct MockBedrock {
    /// The underlying server
    pub server: MockServer,
}

impl MockBedrock {
    /// Start a new mock runtime
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Endpoint URL for the gateway configuration
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Respond to any signed invocation whose body contains `expected`
    pub async fn mock_invoke(&self, expected: Value, status: u16, response: Value) {
        Mock::given(method("POST"))
            .and(path_regex(r"^/model/[^/]+/invoke$"))
            .and(header_exists("authorization"))
            .and(header_exists("x-amz-content-sha256"))
            .and(body_partial_json(expected))
            .respond_with(ResponseTemplate::new(status).set_body_json(response))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Respond to every invocation with a raw body
    pub async fn mock_raw(&self, status: u16, body: &str) {
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Respond after a delay
    pub async fn mock_delayed(&self, response: Value, delay: Duration) {
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(response)
                    .set_delay(delay),
            )
            .mount(&self.server)
            .await;
    }

    /// Requests received so far
    pub async fn received(&self) -> Vec<Request> {
        self.server.received_requests().await.unwrap_or_default()
    }
}
