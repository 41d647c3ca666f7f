//! Core domain types shared across the quoting pipeline.
//!
//! - `quote`: shipment parameters and the cargo/service enums
//! - `pricing`: per-request derived values (cost, market, prediction)
//! - `events`: persisted booking/decline events and analytics counters

pub mod events;
pub mod pricing;
pub mod quote;

pub use events::{AnalyticsSnapshot, EventKind, TrainingEvent};
pub use pricing::{ConfidenceBand, CostData, MarginRange, MarketData, Prediction};
pub use quote::{CargoType, QuoteParams, ServiceType};

/// Round to the cent, half-up.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round to three decimals (fractional indicators on the wire).
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Round to one decimal (percentage displays).
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_cents_half_up() {
        assert_eq!(round_cents(2707.505), 2707.51);
        assert_eq!(round_cents(2707.504), 2707.5);
        assert_eq!(round_cents(0.125), 0.13);
    }

    #[test]
    fn test_round3() {
        assert_eq!(round3(0.0125), 0.013);
        assert_eq!(round3(-0.0014), -0.001);
    }
}
