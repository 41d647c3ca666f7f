//! Rate predictor — the six-step quote pipeline.

use tracing::debug;

use crate::config::PricingConfig;
use crate::types::{
    round_cents, CargoType, ConfidenceBand, CostData, MarginRange, MarketData, Prediction,
    QuoteParams,
};

use super::multipliers::{cargo_factor, customer_multiplier, seasonal_factor, service_factor};

/// Quote pipeline over the configured multiplier tables.
///
/// Deterministic given its inputs; the calendar month is an explicit
/// parameter rather than an ambient clock read.
pub struct RatePredictor {
    cfg: PricingConfig,
}

impl RatePredictor {
    pub fn new(cfg: PricingConfig) -> Self {
        Self { cfg }
    }

    /// Compute the final prediction for a quote.
    ///
    /// 1. Base prediction: cargo/weight/volume/service factors over the
    ///    base cost, market adjustment, surcharges added last.
    /// 2. Optimization adjustment: customer tier, competitiveness bonus,
    ///    seasonal factor.
    /// 3-5. Confidence score, symmetric band, margin range.
    pub fn predict(
        &self,
        cost: &CostData,
        market: &MarketData,
        q: &QuoteParams,
        month: u32,
    ) -> Prediction {
        let mut price = cost.base_cost;
        price *= cargo_factor(q.cargo_type);
        if q.weight_kg > 1000.0 {
            price *= 1.1;
        }
        if q.volume_cbm > 50.0 {
            price *= 1.05;
        }
        price *= service_factor(q.service);
        price *= 1.0 + market.adjustment;
        price += cost.surcharges;
        price = round_cents(price);

        price *= customer_multiplier(&self.cfg, &q.customer_id);
        price *= 1.0 + 0.1 * market.competitiveness_index;
        price *= 1.0 + seasonal_factor(&self.cfg, month);
        price = round_cents(price);

        let confidence = score_confidence(market, q);
        let band_pct = (1.0 - confidence) * 0.3;
        let confidence_band = ConfidenceBand {
            lower: round_cents(price * (1.0 - band_pct)),
            upper: round_cents(price * (1.0 + band_pct)),
            percentage: (band_pct * 100.0).round(),
        };

        let margin = round_cents(price - cost.base_cost);
        // Zero base cost would make the percentage non-finite; define it
        // as zero instead of propagating NaN to callers.
        let percentage = if cost.base_cost > 0.0 {
            round_cents(margin / cost.base_cost * 100.0)
        } else {
            0.0
        };
        let margin_range = MarginRange {
            absolute: margin,
            percentage,
            min_margin: round_cents(margin * 0.8),
            max_margin: round_cents(margin * 1.2),
        };

        debug!(route = %cost.route, price, confidence, "prediction computed");

        Prediction {
            price,
            confidence,
            confidence_band,
            margin_range,
            ml_adjustment: margin,
        }
    }
}

/// Confidence score in [0.5, 0.95].
///
/// Starts at 0.8 and moves on volatility, cargo risk, weight, and route
/// popularity.
pub fn score_confidence(market: &MarketData, q: &QuoteParams) -> f64 {
    let mut confidence: f64 = 0.8;
    if market.volatility > 0.3 {
        confidence -= 0.1;
    }
    if matches!(q.cargo_type, CargoType::Hazardous | CargoType::Oversized) {
        confidence -= 0.05;
    }
    if q.weight_kg > 2000.0 {
        confidence -= 0.05;
    }
    if market.route_popularity > 0.7 {
        confidence += 0.05;
    }
    confidence.clamp(0.5, 0.95)
}
