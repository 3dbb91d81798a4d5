pub mod ingest;

use axum::routing::post;
use axum::Router;

use crate::state::SharedState;

/// The relay answers on any path, matching how the signup form is deployed.
pub fn ingest_routes() -> Router<SharedState> {
    Router::new()
        .route("/", post(ingest::ingest).options(ingest::ingest_options))
        .route(
            "/{*path}",
            post(ingest::ingest).options(ingest::ingest_options),
        )
}
