//! REST API module using Axum
//!
//! Provides the HTTP endpoints for the quoting service:
//! - `POST /api/predict-rate` — price a shipment
//! - `POST /api/confirm-booking` / `POST /api/decline-quote` — log outcomes
//! - `GET /api/analytics` — counters, rolling window, model performance
//! - `GET /api/health` — liveness probe

pub mod handlers;
mod routes;

pub use handlers::ApiState;

use axum::http::{header, Method};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build a CORS layer that is restrictive by default (same-origin only).
///
/// Set `RATECAST_CORS_ORIGINS` to a comma-separated list of allowed
/// origins for development (e.g., `http://localhost:5173`).
fn build_cors_layer() -> CorsLayer {
    match std::env::var("RATECAST_CORS_ORIGINS") {
        Ok(origins) => {
            let allowed: Vec<_> = origins
                .split(',')
                .filter_map(|o| o.trim().parse().ok())
                .collect();
            tracing::info!(origins = %origins, "CORS: allowing configured origins");
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE])
        }
        Err(_) => {
            // No cross-origin allowed — the dashboard is same-origin
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE])
        }
    }
}

/// Create the complete application router.
pub fn create_app(state: ApiState) -> Router {
    Router::new()
        .nest("/api", routes::api_routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(build_cors_layer())
}
