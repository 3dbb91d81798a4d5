use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Every way a submission can fail. Details are logged, never returned.
#[derive(Debug)]
pub enum RelayError {
    Unauthorized(String),
    PayloadTooLarge(String),
    InvalidRequest(String),
    DeliveryFailed(String),
    Internal(String),
}

impl std::fmt::Display for RelayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelayError::Unauthorized(msg) => write!(f, "Unauthorized: {msg}"),
            RelayError::PayloadTooLarge(msg) => write!(f, "Payload Too Large: {msg}"),
            RelayError::InvalidRequest(msg) => write!(f, "Invalid Request: {msg}"),
            RelayError::DeliveryFailed(msg) => write!(f, "Delivery Failed: {msg}"),
            RelayError::Internal(msg) => write!(f, "Internal Error: {msg}"),
        }
    }
}

impl std::error::Error for RelayError {}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            RelayError::Unauthorized(msg) => {
                tracing::warn!("Rejected request: {msg}");
                (StatusCode::FORBIDDEN, json!({ "error": "Unauthorized" }))
            }
            RelayError::PayloadTooLarge(msg) => {
                tracing::warn!("Rejected request: {msg}");
                (
                    StatusCode::PAYLOAD_TOO_LARGE,
                    json!({ "error": "Payload too large" }),
                )
            }
            RelayError::InvalidRequest(msg) => {
                tracing::warn!("Validation error: {msg}");
                (
                    StatusCode::BAD_REQUEST,
                    json!({ "error": "Invalid request data" }),
                )
            }
            RelayError::DeliveryFailed(msg) => {
                tracing::error!("All delivery attempts failed: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    json!({ "success": false, "error": "Webhook delivery failed" }),
                )
            }
            RelayError::Internal(msg) => {
                tracing::error!("Error processing request: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "An error occurred processing your request" }),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}
