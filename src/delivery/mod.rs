pub mod transport;

use std::time::Duration;

use crate::submission::ForwardedPayload;

pub use transport::{HttpTransport, Transport, TransportResponse};

pub const TIMEOUT_MS: u64 = 30_000;
pub const MAX_RETRIES: u32 = 3;
pub const RETRY_DELAY_MS: u64 = 1_000;

/// Retry budget for one submission. `Default` holds the production constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeliveryPolicy {
    pub max_attempts: u32,
    pub attempt_timeout: Duration,
    pub retry_delay: Duration,
}

impl Default for DeliveryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_RETRIES,
            attempt_timeout: Duration::from_millis(TIMEOUT_MS),
            retry_delay: Duration::from_millis(RETRY_DELAY_MS),
        }
    }
}

/// Result of a single POST to the downstream endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    Success { status: u16 },
    /// Downstream rejected the payload (4xx); retrying would not help.
    Permanent { status: u16, body: String },
    /// 5xx, timeout or network error.
    Transient { error: String, status: Option<u16> },
}

/// Summary of a whole delivery run.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryResult {
    pub success: bool,
    pub attempt: u32,
    pub error: Option<String>,
    pub status: Option<u16>,
}

/// Map a downstream status code to an attempt outcome.
pub fn classify(status: u16, body: String) -> AttemptOutcome {
    match status {
        200..=299 => AttemptOutcome::Success { status },
        400..=499 => AttemptOutcome::Permanent { status, body },
        _ => AttemptOutcome::Transient {
            error: format!("HTTP {status}"),
            status: Some(status),
        },
    }
}

/// One POST bounded by the per-attempt timeout. On expiry the in-flight call
/// is dropped.
pub async fn attempt(
    transport: &dyn Transport,
    url: &str,
    payload: &ForwardedPayload,
    timeout: Duration,
) -> AttemptOutcome {
    match tokio::time::timeout(timeout, transport.post_json(url, payload)).await {
        Ok(Ok(resp)) => {
            tracing::info!(status = resp.status, "Downstream responded");
            if !(200..300).contains(&resp.status) {
                tracing::warn!(status = resp.status, body = %resp.body, "Non-OK downstream response");
            }
            classify(resp.status, resp.body)
        }
        Ok(Err(error)) => AttemptOutcome::Transient {
            error,
            status: None,
        },
        Err(_) => AttemptOutcome::Transient {
            error: format!("Request timed out after {}ms", timeout.as_millis()),
            status: None,
        },
    }
}

/// Deliver `payload` sequentially, up to `policy.max_attempts` times, with a
/// fixed pause between transient failures.
pub async fn deliver_with_retry(
    transport: &dyn Transport,
    url: &str,
    payload: &ForwardedPayload,
    policy: &DeliveryPolicy,
) -> DeliveryResult {
    let max_attempts = policy.max_attempts.max(1);
    let mut last_error = String::from("Max retries exceeded");
    let mut last_status = None;

    for n in 1..=max_attempts {
        tracing::info!(attempt = n, max_attempts, "Calling downstream webhook");

        match attempt(transport, url, payload, policy.attempt_timeout).await {
            AttemptOutcome::Success { status } => {
                tracing::info!(attempt = n, status, "Webhook delivered");
                return DeliveryResult {
                    success: true,
                    attempt: n,
                    error: None,
                    status: Some(status),
                };
            }
            AttemptOutcome::Permanent { status, body } => {
                tracing::warn!(attempt = n, status, "Webhook rejected payload, not retrying");
                let error = if body.is_empty() {
                    format!("HTTP {status}")
                } else {
                    format!("HTTP {status}: {body}")
                };
                return DeliveryResult {
                    success: false,
                    attempt: n,
                    error: Some(error),
                    status: Some(status),
                };
            }
            AttemptOutcome::Transient { error, status } => {
                tracing::warn!(attempt = n, ?status, "Webhook attempt failed: {error}");
                last_error = error;
                last_status = status;
            }
        }

        if n < max_attempts {
            tokio::time::sleep(policy.retry_delay).await;
        }
    }

    DeliveryResult {
        success: false,
        attempt: max_attempts,
        error: Some(last_error),
        status: last_status,
    }
}
