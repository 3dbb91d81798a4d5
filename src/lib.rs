pub mod config;
pub mod delivery;
pub mod error;
pub mod middleware;
pub mod origin;
pub mod routes;
pub mod state;
pub mod submission;

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::delivery::{HttpTransport, Transport};
use crate::middleware::cors::attach_cors_headers;
use crate::origin::OriginPolicy;
use crate::state::{AppState, SharedState};

/// Build the relay with the production `reqwest` transport.
pub fn build_app(config: Config) -> Result<Router, String> {
    let transport = HttpTransport::new()?;
    Ok(build_app_with_transport(config, Arc::new(transport)))
}

/// Build the relay around any downstream transport.
pub fn build_app_with_transport(config: Config, transport: Arc<dyn Transport>) -> Router {
    let origins = OriginPolicy::new(
        config.allowed_origins.clone(),
        config.preview_suffix.clone(),
    );

    let state: SharedState = Arc::new(AppState {
        config,
        origins,
        transport,
    });

    Router::new()
        .merge(routes::ingest_routes())
        .route("/health", axum::routing::get(health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(SetResponseHeaderLayer::overriding(
                    HeaderName::from_static("x-content-type-options"),
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    HeaderName::from_static("x-frame-options"),
                    HeaderValue::from_static("DENY"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    HeaderName::from_static("referrer-policy"),
                    HeaderValue::from_static("strict-origin-when-cross-origin"),
                ))
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    attach_cors_headers,
                )),
        )
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
