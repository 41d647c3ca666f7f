//! API route handlers
//!
//! Request handling for all endpoints: required-field validation (400
//! with a static message), the quote pipeline orchestration, outcome
//! logging, and the analytics view. Unexpected failures surface as 500
//! with the raw error text; unknown enum values degrade silently to
//! neutral multipliers instead of erroring.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Datelike, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::ledger::{EventLedger, LedgerError, RecentWindow};
use crate::market::MarketBoard;
use crate::pricing::RatePredictor;
use crate::tariff::RateBook;
use crate::types::{
    round3, round_cents, AnalyticsSnapshot, CargoType, ConfidenceBand, MarginRange, QuoteParams,
    ServiceType, TrainingEvent,
};

// ============================================================================
// API State
// ============================================================================

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub ledger: EventLedger,
    pub rate_book: Arc<RateBook>,
    pub market: Arc<MarketBoard>,
    pub predictor: Arc<RatePredictor>,
}

// ============================================================================
// Error body
// ============================================================================

/// Error payload: the client displays `error` verbatim.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

fn bad_request(error: &str, message: String) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody { error: error.to_string(), message }),
    )
        .into_response()
}

fn internal(error: &str, source: &LedgerError) -> Response {
    error!(error = %source, "request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            error: error.to_string(),
            message: source.to_string(),
        }),
    )
        .into_response()
}

// ============================================================================
// Predict Rate
// ============================================================================

/// Raw request body. Required-field checks happen here, not in serde, so
/// a missing field yields the documented 400 body instead of a
/// deserialization rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteForm {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub cargo_type: Option<CargoType>,
    pub weight: Option<f64>,
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default)]
    pub service_type: Option<ServiceType>,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub forwarder_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateBreakdown {
    pub base_cost: f64,
    pub surcharges: f64,
    pub total_cost: f64,
    pub currency: String,
    pub route: String,
    pub market_adjustment: f64,
    pub competitiveness_index: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictResponse {
    pub request_id: String,
    pub predicted_price: f64,
    pub confidence: f64,
    pub confidence_band: ConfidenceBand,
    pub margin_range: MarginRange,
    pub ml_adjustment: f64,
    pub breakdown: RateBreakdown,
    pub timestamp: DateTime<Utc>,
}

/// POST /api/predict-rate
pub async fn predict_rate(
    State(state): State<ApiState>,
    Json(form): Json<QuoteForm>,
) -> Response {
    let mut missing = Vec::new();
    if form.origin.is_none() {
        missing.push("origin");
    }
    if form.destination.is_none() {
        missing.push("destination");
    }
    if form.cargo_type.is_none() {
        missing.push("cargoType");
    }
    if form.weight.is_none() {
        missing.push("weight");
    }
    if !missing.is_empty() {
        return bad_request(
            "Missing required fields",
            format!("required: {}", missing.join(", ")),
        );
    }

    let params = QuoteParams {
        origin: form.origin.unwrap_or_default(),
        destination: form.destination.unwrap_or_default(),
        cargo_type: form.cargo_type.unwrap_or(CargoType::Unknown),
        weight_kg: form.weight.unwrap_or_default(),
        volume_cbm: form.volume.unwrap_or_default(),
        service: form.service_type.unwrap_or_default(),
        customer_id: form.customer_id.unwrap_or_default(),
        forwarder_id: form.forwarder_id.unwrap_or_default(),
    };

    let cost = state.rate_book.fetch(&params).await;
    let market = state.market.fetch(&params.origin, &params.destination).await;
    let now = Utc::now();
    let prediction = state.predictor.predict(&cost, &market, &params, now.month());

    info!(
        route = %cost.route,
        cargo = params.cargo_type.as_str(),
        price = prediction.price,
        confidence = prediction.confidence,
        "quote computed"
    );

    Json(PredictResponse {
        request_id: Uuid::new_v4().to_string(),
        predicted_price: prediction.price,
        confidence: prediction.confidence,
        confidence_band: prediction.confidence_band,
        margin_range: prediction.margin_range,
        ml_adjustment: prediction.ml_adjustment,
        breakdown: RateBreakdown {
            base_cost: cost.base_cost,
            surcharges: cost.surcharges,
            total_cost: cost.total_cost,
            currency: cost.currency,
            route: cost.route,
            market_adjustment: market.adjustment,
            competitiveness_index: market.competitiveness_index,
        },
        timestamp: now,
    })
    .into_response()
}

// ============================================================================
// Confirm Booking / Decline Quote
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingForm {
    pub request_id: Option<String>,
    pub booking_id: Option<String>,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub forwarder_id: Option<String>,
    pub final_price: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub success: bool,
    pub message: String,
    pub booking_id: String,
    pub timestamp: DateTime<Utc>,
}

/// POST /api/confirm-booking
pub async fn confirm_booking(
    State(state): State<ApiState>,
    Json(form): Json<BookingForm>,
) -> Response {
    let mut missing = Vec::new();
    if form.request_id.is_none() {
        missing.push("requestId");
    }
    if form.booking_id.is_none() {
        missing.push("bookingId");
    }
    if form.final_price.is_none() {
        missing.push("finalPrice");
    }
    if !missing.is_empty() {
        return bad_request(
            "Missing required fields",
            format!("required: {}", missing.join(", ")),
        );
    }

    let booking_id = form.booking_id.unwrap_or_default();
    let event = TrainingEvent::booking(
        form.request_id.unwrap_or_default(),
        booking_id.clone(),
        form.customer_id.unwrap_or_default(),
        form.forwarder_id.unwrap_or_default(),
        form.final_price.unwrap_or_default(),
    );

    match state.ledger.log_booking(event).await {
        Ok(()) => Json(BookingResponse {
            success: true,
            message: "Booking confirmed and recorded".to_string(),
            booking_id,
            timestamp: Utc::now(),
        })
        .into_response(),
        Err(e) => internal("Failed to record booking", &e),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclineForm {
    pub request_id: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub forwarder_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclineResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// POST /api/decline-quote
pub async fn decline_quote(
    State(state): State<ApiState>,
    Json(form): Json<DeclineForm>,
) -> Response {
    let Some(request_id) = form.request_id else {
        return bad_request("Missing required fields", "required: requestId".to_string());
    };

    let event = TrainingEvent::decline(
        request_id,
        form.reason,
        form.customer_id.unwrap_or_default(),
        form.forwarder_id.unwrap_or_default(),
    );

    match state.ledger.log_decline(event).await {
        Ok(()) => Json(DeclineResponse {
            success: true,
            message: "Quote decline recorded".to_string(),
            timestamp: Utc::now(),
        })
        .into_response(),
        Err(e) => internal("Failed to record decline", &e),
    }
}

// ============================================================================
// Analytics
// ============================================================================

/// Simulated model performance block. Randomly generated per call — not
/// computed from logged events.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelPerformance {
    pub accuracy: f64,
    pub mean_absolute_error: f64,
    pub r_squared: f64,
    pub evaluated_samples: u32,
}

fn model_performance(rng: &mut impl Rng) -> ModelPerformance {
    ModelPerformance {
        accuracy: round3(0.84 + rng.gen_range(0.0..0.10)),
        mean_absolute_error: round_cents(40.0 + rng.gen_range(0.0..35.0)),
        r_squared: round3(0.75 + rng.gen_range(0.0..0.18)),
        evaluated_samples: rng.gen_range(400..1200),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    #[serde(flatten)]
    pub totals: AnalyticsSnapshot,
    pub recent: RecentWindow,
    pub model_performance: ModelPerformance,
    pub timestamp: DateTime<Utc>,
}

/// GET /api/analytics
pub async fn analytics(State(state): State<ApiState>) -> Response {
    match state.ledger.analytics().await {
        Ok(report) => Json(AnalyticsResponse {
            totals: report.totals,
            recent: report.recent,
            model_performance: model_performance(&mut rand::thread_rng()),
            timestamp: Utc::now(),
        })
        .into_response(),
        Err(e) => internal("Failed to read analytics", &e),
    }
}

// ============================================================================
// Health
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// GET /api/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "ratecast",
        timestamp: Utc::now(),
    })
}
