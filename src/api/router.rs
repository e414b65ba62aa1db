//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Resource routes are nested under `/api/`; `GET /` is a liveness probe.

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::routing::{delete, get};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::endpoints::{health, insights, notes, patients};
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the API router.
///
/// `cors_allowed_origins` restricts cross-origin callers; an empty list
/// allows any origin.
pub fn api_router(core: Arc<CoreState>, cors_allowed_origins: &[String]) -> Router {
    build_router(ApiContext::new(core)).layer(cors_layer(cors_allowed_origins))
}

fn build_router(ctx: ApiContext) -> Router {
    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let api = Router::new()
        .route("/health", get(health::check))
        .route("/patients", get(patients::list).post(patients::create))
        .route(
            "/patients/:id",
            get(patients::detail).delete(patients::remove),
        )
        .route("/patients/:id/notes", get(notes::list).post(notes::create))
        .route("/patients/:id/notes/:note_id", delete(notes::remove))
        .route("/patients/:id/summary", get(insights::summary))
        .route("/patients/:id/summary-perplexity", get(insights::summary))
        .route(
            "/patients/:id/predictive-analysis",
            get(insights::predictive_analysis),
        )
        .route(
            "/patients/:id/predictive-analysis-perplexity",
            get(insights::predictive_analysis),
        );

    Router::new()
        .route("/", get(health::home))
        .nest("/api", api)
        .with_state(ctx)
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}
