//! # AWS Bedrock Transport
//!
//! Sends built invocations to the Bedrock runtime and returns the raw
//! response. Requests are signed with AWS Signature Version 4.
//!
//! Credentials come from the gateway configuration, which falls back to
//! the standard AWS environment variables.
//!
//! ## Example
//!
//! ```rust,ignore
//! use recipe_providers::bedrock::{BedrockConfig, BedrockInvoker};
//!
//! let config = BedrockConfig::builder()
//!     .region("us-east-1")
//!     .access_key_id("AKIDEXAMPLE")
//!     .secret_access_key("secret")
//!     .build();
//!
//! let invoker = BedrockInvoker::new(config)?;
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use recipe_core::{HttpMethod, InvokeError, ModelInvoker, ProviderRequest, ProviderResponse};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use std::{collections::BTreeMap, time::Duration};
use tracing::{debug, warn};
use url::Url;

const SERVICE: &str = "bedrock";
const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// AWS Bedrock configuration
#[derive(Debug, Clone)]
pub struct BedrockConfig {
    /// Invoker ID used in logs
    pub id: String,
    /// AWS region (e.g., "us-east-1")
    pub region: String,
    /// AWS access key ID
    pub access_key_id: Option<String>,
    /// AWS secret access key
    pub secret_access_key: Option<SecretString>,
    /// AWS session token (for temporary credentials)
    pub session_token: Option<SecretString>,
    /// Custom endpoint URL (for testing/VPC endpoints)
    pub endpoint_url: Option<String>,
    /// Request timeout
    pub timeout: Duration,
}

impl BedrockConfig {
    /// Create a new builder
    pub fn builder() -> BedrockConfigBuilder {
        BedrockConfigBuilder::default()
    }

    /// Get the Bedrock runtime endpoint
    pub fn base_url(&self) -> String {
        self.endpoint_url.clone().unwrap_or_else(|| {
            format!("https://bedrock-runtime.{}.amazonaws.com", self.region)
        })
    }

    /// Whether both halves of a key pair are present
    pub fn has_credentials(&self) -> bool {
        self.access_key_id.as_deref().is_some_and(|k| !k.is_empty())
            && self
                .secret_access_key
                .as_ref()
                .is_some_and(|s| !s.expose_secret().is_empty())
    }
}

/// Builder for `BedrockConfig`
#[derive(Debug, Default)]
pub struct BedrockConfigBuilder {
    id: Option<String>,
    region: Option<String>,
    access_key_id: Option<String>,
    secret_access_key: Option<SecretString>,
    session_token: Option<SecretString>,
    endpoint_url: Option<String>,
    timeout: Option<Duration>,
}

impl BedrockConfigBuilder {
    /// Set the invoker ID
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the AWS region
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the AWS access key ID
    pub fn access_key_id(mut self, key: impl Into<String>) -> Self {
        self.access_key_id = Some(key.into());
        self
    }

    /// Set the AWS secret access key
    pub fn secret_access_key(mut self, secret: impl Into<String>) -> Self {
        self.secret_access_key = Some(SecretString::new(secret.into()));
        self
    }

    /// Set the AWS session token
    pub fn session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(SecretString::new(token.into()));
        self
    }

    /// Set custom endpoint URL
    pub fn endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.endpoint_url = Some(url.into());
        self
    }

    /// Set request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the configuration
    pub fn build(self) -> BedrockConfig {
        BedrockConfig {
            id: self.id.unwrap_or_else(|| "bedrock".to_string()),
            region: self.region.unwrap_or_else(|| "us-east-1".to_string()),
            access_key_id: self.access_key_id,
            secret_access_key: self.secret_access_key,
            session_token: self.session_token,
            endpoint_url: self.endpoint_url,
            timeout: self.timeout.unwrap_or(Duration::from_secs(300)),
        }
    }
}

/// Bedrock runtime invoker
pub struct BedrockInvoker {
    config: BedrockConfig,
    client: Client,
    base_url: String,
}

impl std::fmt::Debug for BedrockInvoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BedrockInvoker")
            .field("id", &self.config.id)
            .field("region", &self.config.region)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl BedrockInvoker {
    /// Create a new Bedrock invoker
    pub fn new(config: BedrockConfig) -> Result<Self, InvokeError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| InvokeError::transport(format!("failed to create HTTP client: {e}")))?;

        let base_url = config.base_url();
        if !config.has_credentials() {
            warn!(id = %config.id, "Bedrock credentials are not configured");
        }

        Ok(Self {
            config,
            client,
            base_url,
        })
    }

    /// Full URL for a resource path, with each segment percent-encoded
    fn invoke_url(&self, resource_path: &str) -> Result<Url, InvokeError> {
        let url = format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            encode_path(resource_path)
        );
        Url::parse(&url).map_err(|e| InvokeError::endpoint(format!("{url}: {e}")))
    }

    /// Sign a request with AWS Signature Version 4
    fn sign_request(
        &self,
        method: HttpMethod,
        url: &Url,
        body: &[u8],
        headers: &mut BTreeMap<String, String>,
        now: DateTime<Utc>,
    ) -> Result<(), InvokeError> {
        let access_key = self
            .config
            .access_key_id
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| InvokeError::credentials("AWS access key ID not configured"))?;
        let secret_key = self
            .config
            .secret_access_key
            .as_ref()
            .map(ExposeSecret::expose_secret)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| InvokeError::credentials("AWS secret access key not configured"))?;

        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
        let date_stamp = now.format("%Y%m%d").to_string();
        let region = &self.config.region;

        let host = url
            .host_str()
            .ok_or_else(|| InvokeError::endpoint("URL has no host"))?;
        let host = url
            .port()
            .map_or_else(|| host.to_string(), |port| format!("{host}:{port}"));

        let payload_hash = hex::encode(sha256_hash(body));

        headers.insert("host".to_string(), host);
        headers.insert("x-amz-date".to_string(), amz_date.clone());
        headers.insert("x-amz-content-sha256".to_string(), payload_hash.clone());
        if let Some(token) = &self.config.session_token {
            headers.insert(
                "x-amz-security-token".to_string(),
                token.expose_secret().clone(),
            );
        }

        // BTreeMap keys are already sorted
        let signed_headers = headers.keys().map(String::as_str).collect::<Vec<_>>().join(";");
        let canonical_headers: String = headers
            .iter()
            .map(|(name, value)| format!("{name}:{}\n", value.trim()))
            .collect();

        let canonical_request = format!(
            "{method}\n{}\n\n{canonical_headers}\n{signed_headers}\n{payload_hash}",
            encode_path(url.path())
        );

        let credential_scope = format!("{date_stamp}/{region}/{SERVICE}/aws4_request");
        let string_to_sign = format!(
            "{ALGORITHM}\n{amz_date}\n{credential_scope}\n{}",
            hex::encode(sha256_hash(canonical_request.as_bytes()))
        );

        let k_date = hmac_sha256(format!("AWS4{secret_key}").as_bytes(), date_stamp.as_bytes())?;
        let k_region = hmac_sha256(&k_date, region.as_bytes())?;
        let k_service = hmac_sha256(&k_region, SERVICE.as_bytes())?;
        let k_signing = hmac_sha256(&k_service, b"aws4_request")?;
        let signature = hex::encode(hmac_sha256(&k_signing, string_to_sign.as_bytes())?);

        headers.insert(
            "authorization".to_string(),
            format!(
                "{ALGORITHM} Credential={access_key}/{credential_scope}, SignedHeaders={signed_headers}, Signature={signature}"
            ),
        );

        Ok(())
    }
}

#[async_trait]
impl ModelInvoker for BedrockInvoker {
    fn id(&self) -> &str {
        &self.config.id
    }

    async fn invoke(&self, request: &ProviderRequest) -> Result<ProviderResponse, InvokeError> {
        let url = self.invoke_url(&request.resource_path)?;

        let mut headers: BTreeMap<String, String> = request
            .headers
            .iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v.clone()))
            .collect();
        self.sign_request(
            request.method,
            &url,
            request.body.as_bytes(),
            &mut headers,
            Utc::now(),
        )?;

        // reqwest derives Host from the URL
        let mut req_builder = self.client.post(url.clone());
        for (key, value) in headers.iter().filter(|(k, _)| k.as_str() != "host") {
            req_builder = req_builder.header(key, value);
        }

        debug!(model = %request.model_id, url = %url, "Sending request to Bedrock");

        let response = req_builder
            .body(request.body.clone())
            .send()
            .await
            .map_err(|e| InvokeError::transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| InvokeError::transport(format!("failed to read response body: {e}")))?;

        debug!(status, bytes = body.len(), "Received Bedrock response");

        Ok(ProviderResponse::new(status, body))
    }

    fn is_ready(&self) -> bool {
        self.config.has_credentials()
    }
}

/// Percent-encode every segment of a path per the SigV4 rules
fn encode_path(path: &str) -> String {
    path.split('/').map(uri_encode).collect::<Vec<_>>().join("/")
}

fn uri_encode(segment: &str) -> String {
    let mut encoded = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char);
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}

/// Calculate SHA-256 hash
fn sha256_hash(data: &[u8]) -> [u8; 32] {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Calculate HMAC-SHA256
fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<[u8; 32], InvokeError> {
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    let mut mac = Hmac::<Sha256>::new_from_slice(key)
        .map_err(|e| InvokeError::credentials(format!("invalid signing key: {e}")))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use wiremock::matchers::{header, header_exists, method, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config() -> BedrockConfigBuilder {
        BedrockConfig::builder()
            .region("us-east-1")
            .access_key_id("AKIATEST")
            .secret_access_key("secret")
    }

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_config_builder() {
        let config = BedrockConfig::builder()
            .id("bedrock-test")
            .region("us-west-2")
            .access_key_id("AKIATEST")
            .secret_access_key("secret")
            .timeout(Duration::from_secs(10))
            .build();

        assert_eq!(config.id, "bedrock-test");
        assert_eq!(config.region, "us-west-2");
        assert_eq!(config.access_key_id.as_deref(), Some("AKIATEST"));
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.has_credentials());
    }

    #[test]
    fn test_base_url() {
        let config = BedrockConfig::builder().region("eu-west-1").build();
        assert_eq!(
            config.base_url(),
            "https://bedrock-runtime.eu-west-1.amazonaws.com"
        );

        let config = BedrockConfig::builder()
            .endpoint_url("http://localhost:4566")
            .build();
        assert_eq!(config.base_url(), "http://localhost:4566");
    }

    #[test]
    fn test_invoke_url_encodes_model_id() {
        let invoker = BedrockInvoker::new(test_config().build()).unwrap();
        let url = invoker
            .invoke_url("/model/anthropic.claude-3-sonnet-20240229-v1:0/invoke")
            .unwrap();

        assert_eq!(
            url.as_str(),
            "https://bedrock-runtime.us-east-1.amazonaws.com/model/anthropic.claude-3-sonnet-20240229-v1%3A0/invoke"
        );
    }

    #[test]
    fn test_canonical_path_is_double_encoded() {
        assert_eq!(
            encode_path("/model/anthropic.claude-v2%3A1/invoke"),
            "/model/anthropic.claude-v2%253A1/invoke"
        );
        assert_eq!(uri_encode("a b~c"), "a%20b~c");
    }

    #[test]
    fn test_sign_request_is_deterministic() {
        let invoker = BedrockInvoker::new(test_config().session_token("token").build()).unwrap();
        let url = invoker.invoke_url("/model/anthropic.claude-v2/invoke").unwrap();

        let sign = || {
            let mut headers = BTreeMap::new();
            headers.insert("content-type".to_string(), "application/json".to_string());
            invoker
                .sign_request(HttpMethod::Post, &url, b"{}", &mut headers, fixed_time())
                .unwrap();
            headers
        };

        let first = sign();
        let second = sign();
        assert_eq!(first, second);

        let authorization = &first["authorization"];
        assert!(authorization.starts_with(
            "AWS4-HMAC-SHA256 Credential=AKIATEST/20240229/us-east-1/bedrock/aws4_request, "
        ));
        assert!(authorization.contains(
            "SignedHeaders=content-type;host;x-amz-content-sha256;x-amz-date;x-amz-security-token"
        ));
        assert_eq!(first["x-amz-date"], "20240229T120000Z");
        assert_eq!(first["x-amz-security-token"], "token");
        assert_eq!(
            first["x-amz-content-sha256"],
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
    }

    #[test]
    fn test_signature_depends_on_body() {
        let invoker = BedrockInvoker::new(test_config().build()).unwrap();
        let url = invoker.invoke_url("/model/anthropic.claude-v2/invoke").unwrap();

        let mut a = BTreeMap::new();
        let mut b = BTreeMap::new();
        invoker
            .sign_request(HttpMethod::Post, &url, b"{\"a\":1}", &mut a, fixed_time())
            .unwrap();
        invoker
            .sign_request(HttpMethod::Post, &url, b"{\"a\":2}", &mut b, fixed_time())
            .unwrap();
        assert_ne!(a["authorization"], b["authorization"]);
    }

    #[test]
    fn test_missing_credentials() {
        let invoker = BedrockInvoker::new(BedrockConfig::builder().build()).unwrap();
        assert!(!invoker.is_ready());

        let url = invoker.invoke_url("/model/m/invoke").unwrap();
        let result =
            invoker.sign_request(HttpMethod::Post, &url, b"", &mut BTreeMap::new(), fixed_time());
        assert!(matches!(result, Err(InvokeError::Credentials(_))));
    }

    #[tokio::test]
    async fn test_invoke_returns_raw_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path_regex(r"^/model/.+/invoke$"))
            .and(header_exists("authorization"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"content":[{"type":"text","text":"Pancakes"}]}"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let invoker = BedrockInvoker::new(test_config().endpoint_url(server.uri()).build()).unwrap();
        let request = ProviderRequest::post_json(
            "anthropic.claude-3-sonnet-20240229-v1:0",
            "{}".to_string(),
        );

        let response = invoker.invoke(&request).await.unwrap();
        assert_eq!(response.status_code, 200);
        assert!(response.body.contains("Pancakes"));
    }

    #[tokio::test]
    async fn test_invoke_passes_error_status_through() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
            .mount(&server)
            .await;

        let invoker = BedrockInvoker::new(test_config().endpoint_url(server.uri()).build()).unwrap();
        let request = ProviderRequest::post_json("anthropic.claude-v2", "{}".to_string());

        let response = invoker.invoke(&request).await.unwrap();
        assert_eq!(response, ProviderResponse::new(500, "internal"));
    }

    #[tokio::test]
    async fn test_invoke_transport_failure() {
        let invoker = BedrockInvoker::new(
            test_config()
                .endpoint_url("http://127.0.0.1:1")
                .timeout(Duration::from_secs(2))
                .build(),
        )
        .unwrap();
        let request = ProviderRequest::post_json("anthropic.claude-v2", "{}".to_string());

        let result = invoker.invoke(&request).await;
        assert!(matches!(result, Err(InvokeError::Transport(_))));
    }
}
