//! Ratecast: freight rate quoting and booking analytics
//!
//! A demonstration quoting service: shipment parameters in, a synthetic
//! "predicted price" out, with booking/decline outcomes logged for a mock
//! analytics dashboard.
//!
//! ## Architecture
//!
//! - **Tariff Book**: directional route cost profiles plus a surcharge
//!   schedule (the in-memory "RMS" connector)
//! - **Market Board**: synthetic per-route market indicators (the
//!   in-memory "LCI" connector)
//! - **Rate Predictor**: deterministic multiplier pipeline producing the
//!   price, confidence band, and margin range
//! - **Event Ledger**: single-writer actor persisting booking/decline
//!   events and analytics counters as flat JSON documents

pub mod api;
pub mod config;
pub mod ledger;
pub mod market;
pub mod pricing;
pub mod tariff;
pub mod types;

// Re-export the configuration root
pub use config::RateConfig;

// Re-export the service components
pub use ledger::{EventLedger, LedgerError};
pub use market::MarketBoard;
pub use pricing::RatePredictor;
pub use tariff::RateBook;

// Re-export commonly used types
pub use types::{
    AnalyticsSnapshot, CargoType, CostData, MarketData, Prediction, QuoteParams, ServiceType,
    TrainingEvent,
};
