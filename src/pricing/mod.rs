//! Quote compute pipeline
//!
//! Combines tariff cost data and a market snapshot with cargo, service,
//! customer, and seasonal multipliers into a final price, a confidence
//! score with a symmetric band, and a margin range.
//!
//! ## Architecture
//! - `multipliers`: the fixed factor tables and tier selection
//! - `predictor`: the six-step pipeline orchestrator
//!
//! Unlike the upstream connectors, this stage draws no randomness: given
//! the same cost data, market snapshot, request, and calendar month it
//! always produces the same prediction.

pub mod multipliers;
pub mod predictor;

pub use multipliers::{cargo_factor, customer_multiplier, seasonal_factor, service_factor};
pub use predictor::{score_confidence, RatePredictor};
