use axum::extract::{Request, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ORIGIN, VARY,
};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;

use crate::state::SharedState;

pub const ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type, x-supabase-client-platform, x-supabase-client-platform-version, x-supabase-client-runtime, x-supabase-client-runtime-version";
pub const ALLOW_METHODS: &str = "POST, OPTIONS";

/// Middleware that stamps CORS headers on every response. An allowed origin is
/// echoed back, anything else gets `null`.
pub async fn attach_cors_headers(
    State(state): State<SharedState>,
    req: Request,
    next: Next,
) -> Response {
    let origin = req
        .headers()
        .get(ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let mut response = next.run(req).await;

    let allow_origin = HeaderValue::from_str(state.origins.allow_origin_value(origin.as_deref()))
        .unwrap_or_else(|_| HeaderValue::from_static("null"));

    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin);
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(VARY, HeaderValue::from_static("Origin"));

    response
}
