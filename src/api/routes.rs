//! API route table.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{self, ApiState};

/// Build the API router.
pub fn api_routes(state: ApiState) -> Router {
    Router::new()
        .route("/predict-rate", post(handlers::predict_rate))
        .route("/confirm-booking", post(handlers::confirm_booking))
        .route("/decline-quote", post(handlers::decline_quote))
        .route("/analytics", get(handlers::analytics))
        .route("/health", get(handlers::health))
        .with_state(state)
}
