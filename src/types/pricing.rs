//! Per-request derived values: cost lookup output, market snapshot, and
//! the final prediction returned to the caller.
//!
//! All of these are constructed fresh per request and never persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Output of the tariff book for one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostData {
    /// Base route cost after jitter and forwarder discount, in USD.
    pub base_cost: f64,
    /// Sum of all applicable percentage surcharges, in USD.
    pub surcharges: f64,
    pub total_cost: f64,
    pub currency: String,
    /// Directional route key this cost was resolved for.
    pub route: String,
    pub forwarder_id: String,
    pub timestamp: DateTime<Utc>,
}

/// Synthetic market indicators for one route at one point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketData {
    /// Blended route competitiveness score in [0, 1].
    pub competitiveness_index: f64,
    /// Signed price adjustment fraction applied by the predictor.
    pub adjustment: f64,
    /// Route volatility in [0.05, 0.5].
    pub volatility: f64,
    pub route_popularity: f64,
    pub congestion_level: f64,
    pub bunker_fuel_price: f64,
    pub shanghai_index: f64,
    /// Synthetic sample quality in [0.5, 1].
    pub data_quality: f64,
}

/// Symmetric interval around the predicted price, derived from the
/// confidence score. Not a statistical prediction interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidenceBand {
    pub lower: f64,
    pub upper: f64,
    /// Band half-width as a whole percentage of the price.
    pub percentage: f64,
}

/// Fixed ±20% window around the point-estimate margin, for forwarder
/// decision support.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarginRange {
    pub absolute: f64,
    pub percentage: f64,
    pub min_margin: f64,
    pub max_margin: f64,
}

/// Final output of the quote compute pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub price: f64,
    /// Confidence score in [0.5, 0.95].
    pub confidence: f64,
    pub confidence_band: ConfidenceBand,
    pub margin_range: MarginRange,
    /// Price minus base cost, for display/breakdown only.
    pub ml_adjustment: f64,
}
