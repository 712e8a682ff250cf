//! The transport seam between the gateway and a model provider.

use crate::error::InvokeError;
use crate::request::ProviderRequest;
use crate::response::ProviderResponse;
use async_trait::async_trait;
use std::fmt;

/// Sends a built request to a provider and hands back the raw response.
///
/// Every HTTP status is a `ProviderResponse`; only failures that produce no
/// response at all are errors. Implementations never retry.
#[async_trait]
pub trait ModelInvoker: Send + Sync + fmt::Debug {
    /// Invoker identifier for logs
    fn id(&self) -> &str;

    /// Perform a single invocation
    async fn invoke(&self, request: &ProviderRequest) -> Result<ProviderResponse, InvokeError>;

    /// Whether the invoker is able to sign and send requests
    fn is_ready(&self) -> bool {
        true
    }
}
