//! Service configuration
//!
//! Every lookup table the pricing core consumes (route cost profiles,
//! market metadata, surcharge schedule, forwarder multipliers, customer
//! tiers, seasonal factors) is an operator-tunable TOML section. Built-in
//! defaults reproduce the canonical demo tables, so the service runs with
//! no config file at all.
//!
//! ## Loading Order
//!
//! 1. `RATECAST_CONFIG` environment variable (path to TOML file)
//! 2. `ratecast.toml` in the current working directory
//! 3. Built-in defaults
//!
//! ## Usage
//!
//! Call `config::init()` once at startup, then `config::get()` anywhere:
//!
//! ```ignore
//! // In main():
//! config::init(RateConfig::load());
//!
//! // Anywhere in the codebase:
//! let addr = &config::get().server.addr;
//! ```

mod rate_config;

pub use rate_config::*;

use std::sync::OnceLock;

/// Global service configuration, initialized once at startup.
static RATE_CONFIG: OnceLock<RateConfig> = OnceLock::new();

/// Initialize the global configuration.
///
/// Must be called exactly once before any calls to `get()`.
pub fn init(config: RateConfig) {
    if RATE_CONFIG.set(config).is_err() {
        tracing::warn!("config::init() called more than once — ignoring");
    }
}

/// Get a reference to the global configuration.
///
/// Panics if `init()` has not been called. A missing config is a fatal
/// startup error, not a recoverable condition.
pub fn get() -> &'static RateConfig {
    RATE_CONFIG
        .get()
        .expect("config::get() called before config::init() — this is a startup bug")
}

/// Check whether the config has been initialized.
///
/// Useful for tests and optional config paths.
pub fn is_initialized() -> bool {
    RATE_CONFIG.get().is_some()
}
