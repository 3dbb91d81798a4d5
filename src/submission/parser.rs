use axum::body::Body;
use futures_util::StreamExt;
use serde_json::Value;

#[derive(Debug, PartialEq)]
pub enum BodyReadError {
    /// More than the cap arrived; reading stopped there.
    TooLarge { limit: usize },
    /// The stream failed before completing (client abort, bad framing).
    Failed(String),
}

/// Collect a request body, giving up as soon as it grows past `limit` bytes.
pub async fn read_capped(body: Body, limit: usize) -> Result<Vec<u8>, BodyReadError> {
    let mut stream = body.into_data_stream();
    let mut buf = Vec::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| BodyReadError::Failed(e.to_string()))?;
        if buf.len() + chunk.len() > limit {
            return Err(BodyReadError::TooLarge { limit });
        }
        buf.extend_from_slice(&chunk);
    }

    Ok(buf)
}

/// Parse a JSON request body. Only JSON is accepted from the signup form.
pub fn parse_body(body: &[u8]) -> Result<Value, String> {
    if body.is_empty() {
        return Err("Empty body".to_string());
    }
    serde_json::from_slice(body).map_err(|e| format!("Invalid JSON: {e}"))
}
