use async_trait::async_trait;

use crate::submission::ForwardedPayload;

/// Longest downstream response body kept for logging.
const BODY_LOG_CHARS: usize = 1024;

/// Raw answer from the downstream endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// Issues a single POST to the downstream webhook. Network-level failures are
/// returned as `Err` with a human-readable message.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(
        &self,
        url: &str,
        payload: &ForwardedPayload,
    ) -> Result<TransportResponse, String>;
}

pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Timeouts are enforced per attempt by the retry loop, not by the client.
    pub fn new() -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {e}"))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(
        &self,
        url: &str,
        payload: &ForwardedPayload,
    ) -> Result<TransportResponse, String> {
        let resp = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .await
            .map_err(|e| format!("Webhook request failed: {e}"))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .unwrap_or_default()
            .chars()
            .take(BODY_LOG_CHARS)
            .collect::<String>();

        Ok(TransportResponse { status, body })
    }
}
