use axum::body::Body;
use axum::extract::State;
use axum::http::header::{CONTENT_LENGTH, ORIGIN};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::MAX_PAYLOAD_BYTES;
use crate::delivery;
use crate::error::RelayError;
use crate::state::SharedState;
use crate::submission::parser::BodyReadError;
use crate::submission::{self, parser, ForwardedPayload};

/// Accept one lead-capture submission and relay it downstream.
///
/// Gates run in a fixed order: origin, declared size, configuration, then
/// body validation. Nothing reaches the downstream endpoint unless all pass.
pub async fn ingest(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Body,
) -> Result<Response, RelayError> {
    let origin = headers.get(ORIGIN).and_then(|v| v.to_str().ok());
    if !state.origins.is_allowed(origin) {
        return Err(RelayError::Unauthorized(format!(
            "origin not allowed: {}",
            origin.unwrap_or("<missing>")
        )));
    }

    if let Some(len) = declared_length(&headers) {
        if len > MAX_PAYLOAD_BYTES as u64 {
            return Err(RelayError::PayloadTooLarge(format!(
                "declared {len} bytes, limit is {MAX_PAYLOAD_BYTES}"
            )));
        }
    }

    let webhook_url = state
        .config
        .webhook_url
        .clone()
        .ok_or_else(|| RelayError::Internal("RELAY_WEBHOOK_URL is not configured".to_string()))?;

    // Bodies without a length header are still capped while reading.
    let bytes = parser::read_capped(body, MAX_PAYLOAD_BYTES)
        .await
        .map_err(|e| match e {
            BodyReadError::TooLarge { limit } => {
                RelayError::PayloadTooLarge(format!("body exceeded {limit} bytes while reading"))
            }
            BodyReadError::Failed(msg) => {
                RelayError::InvalidRequest(format!("Failed to read body: {msg}"))
            }
        })?;

    let raw = parser::parse_body(&bytes).map_err(RelayError::InvalidRequest)?;
    let submission =
        submission::validate(&raw).map_err(|e| RelayError::InvalidRequest(e.to_string()))?;

    let submission_id = Uuid::now_v7();
    tracing::info!(%submission_id, origin = origin.unwrap_or_default(), "Received valid submission");

    let payload = ForwardedPayload::stamp(submission);
    let span = tracing::info_span!("delivery", %submission_id);
    let task_state = state.clone();

    // Spawned so that a client hanging up does not cancel an in-flight delivery.
    let result = tokio::spawn(
        async move {
            delivery::deliver_with_retry(
                task_state.transport.as_ref(),
                &webhook_url,
                &payload,
                &task_state.config.delivery,
            )
            .await
        }
        .instrument(span),
    )
    .await
    .map_err(|e| RelayError::Internal(format!("Delivery task failed: {e}")))?;

    if !result.success {
        return Err(RelayError::DeliveryFailed(format!(
            "{} (submission {submission_id}, attempt {})",
            result.error.as_deref().unwrap_or("unknown error"),
            result.attempt
        )));
    }

    Ok((StatusCode::OK, Json(json!({ "success": true }))).into_response())
}

/// CORS preflight. The CORS middleware supplies the headers.
pub async fn ingest_options() -> StatusCode {
    StatusCode::NO_CONTENT
}

fn declared_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}
