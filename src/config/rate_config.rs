//! Rate configuration - all pricing tables as operator-tunable TOML values
//!
//! Each struct implements `Default` with the canonical demo values,
//! ensuring zero-change behavior when no config file is present.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for a ratecast deployment.
///
/// Load with `RateConfig::load()` which searches:
/// 1. `$RATECAST_CONFIG` env var
/// 2. `./ratecast.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RateConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// On-disk ledger location
    #[serde(default)]
    pub data: DataConfig,

    /// Simulated upstream connector latency
    #[serde(default)]
    pub connectors: ConnectorConfig,

    /// Route cost profiles and surcharge schedule
    #[serde(default)]
    pub tariff: TariffConfig,

    /// Route market metadata and sampling windows
    #[serde(default)]
    pub market: MarketConfig,

    /// Multiplier tables for the quote compute pipeline
    #[serde(default)]
    pub pricing: PricingConfig,
}

impl RateConfig {
    /// Load configuration using the standard search order:
    /// 1. `$RATECAST_CONFIG` environment variable
    /// 2. `./ratecast.toml` in the current working directory
    /// 3. Built-in defaults (canonical demo tables)
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("RATECAST_CONFIG") {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded config from RATECAST_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from RATECAST_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "RATECAST_CONFIG points to non-existent file, falling back");
            }
        }

        let local = PathBuf::from("ratecast.toml");
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded config from ./ratecast.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./ratecast.toml, using defaults");
                }
            }
        }

        info!("No ratecast.toml found — using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
    }
}

/// Configuration load errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {1}", .0.display())]
    Io(PathBuf, #[source] std::io::Error),
    #[error("failed to parse {}: {1}", .0.display())]
    Parse(PathBuf, #[source] toml::de::Error),
}

// ============================================================================
// Server / Data / Connectors
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the HTTP server
    #[serde(default = "default_addr")]
    pub addr: String,
}

fn default_addr() -> String {
    "0.0.0.0:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { addr: default_addr() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding the persisted ledger documents
    #[serde(default = "default_data_dir")]
    pub dir: String,
}

fn default_data_dir() -> String {
    "./data".to_string()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self { dir: default_data_dir() }
    }
}

/// Uniform millisecond delay range for a simulated upstream connector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatencyRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl LatencyRange {
    /// No simulated delay (tests, demo binary).
    pub const fn none() -> Self {
        Self { min_ms: 0, max_ms: 0 }
    }

    /// Sample a delay from the range.
    pub fn sample(&self, rng: &mut impl rand::Rng) -> Duration {
        if self.max_ms <= self.min_ms {
            return Duration::from_millis(self.min_ms);
        }
        Duration::from_millis(rng.gen_range(self.min_ms..=self.max_ms))
    }
}

/// Simulated latency for the in-memory "RMS" (rate management) and "LCI"
/// (logistics cost index) connectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorConfig {
    #[serde(default = "default_rms_latency")]
    pub rms: LatencyRange,
    #[serde(default = "default_lci_latency")]
    pub lci: LatencyRange,
}

fn default_rms_latency() -> LatencyRange {
    LatencyRange { min_ms: 50, max_ms: 200 }
}

fn default_lci_latency() -> LatencyRange {
    LatencyRange { min_ms: 30, max_ms: 150 }
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            rms: default_rms_latency(),
            lci: default_lci_latency(),
        }
    }
}

// ============================================================================
// Tariff Tables
// ============================================================================

/// Per-route cost profile. Keys in the route table are directional
/// "Origin-Destination" strings; reverse lanes may carry different rates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteCostProfile {
    pub distance_km: f64,
    /// USD per kilometer of route distance
    pub per_km: f64,
    /// USD per metric ton of cargo weight
    pub per_ton: f64,
    /// USD per cubic meter of cargo volume
    pub per_cbm: f64,
}

/// Percentage surcharges applied as fractions of base cost.
///
/// Fractions are summed, not compounded: a hazardous heavy shipment pays
/// fuel + security + hazardous + heavy_cargo of base, applied once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurchargeSchedule {
    /// Always applied
    #[serde(default = "default_fuel")]
    pub fuel: f64,
    /// Always applied
    #[serde(default = "default_security")]
    pub security: f64,
    /// Hazardous cargo only
    #[serde(default = "default_hazardous")]
    pub hazardous: f64,
    /// Refrigerated cargo only
    #[serde(default = "default_refrigerated")]
    pub refrigerated: f64,
    /// Applied when weight exceeds `heavy_threshold_kg`
    #[serde(default = "default_heavy_cargo")]
    pub heavy_cargo: f64,
    #[serde(default = "default_heavy_threshold")]
    pub heavy_threshold_kg: f64,
    /// Express service only
    #[serde(default = "default_express")]
    pub express: f64,
}

fn default_fuel() -> f64 {
    0.08
}
fn default_security() -> f64 {
    0.02
}
fn default_hazardous() -> f64 {
    0.15
}
fn default_refrigerated() -> f64 {
    0.12
}
fn default_heavy_cargo() -> f64 {
    0.05
}
fn default_heavy_threshold() -> f64 {
    1000.0
}
fn default_express() -> f64 {
    0.20
}

impl Default for SurchargeSchedule {
    fn default() -> Self {
        Self {
            fuel: default_fuel(),
            security: default_security(),
            hazardous: default_hazardous(),
            refrigerated: default_refrigerated(),
            heavy_cargo: default_heavy_cargo(),
            heavy_threshold_kg: default_heavy_threshold(),
            express: default_express(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TariffConfig {
    /// Directional route cost table
    #[serde(default = "default_cost_routes")]
    pub routes: HashMap<String, RouteCostProfile>,

    /// Fallback profile for routes absent from the table
    #[serde(default = "default_cost_profile")]
    pub default_route: RouteCostProfile,

    #[serde(default)]
    pub surcharges: SurchargeSchedule,

    /// Forwarder-specific base cost multipliers (volume discounts)
    #[serde(default = "default_forwarder_multipliers")]
    pub forwarder_multipliers: HashMap<String, f64>,

    /// Half-width of the uniform base cost perturbation (0.1 = ±10%)
    #[serde(default = "default_jitter")]
    pub jitter: f64,
}

fn default_jitter() -> f64 {
    0.1
}

fn default_cost_profile() -> RouteCostProfile {
    RouteCostProfile {
        distance_km: 9000.0,
        per_km: 0.13,
        per_ton: 1000.0,
        per_cbm: 70.0,
    }
}

fn default_cost_routes() -> HashMap<String, RouteCostProfile> {
    let mut m = HashMap::new();
    let mut add = |key: &str, distance_km: f64, per_km: f64, per_ton: f64, per_cbm: f64| {
        m.insert(
            key.to_string(),
            RouteCostProfile { distance_km, per_km, per_ton, per_cbm },
        );
    };
    add("Shanghai-Los Angeles", 10000.0, 0.15, 1200.0, 80.0);
    add("Los Angeles-Shanghai", 10000.0, 0.11, 950.0, 60.0);
    add("Shanghai-Rotterdam", 19500.0, 0.12, 1100.0, 75.0);
    add("Rotterdam-Shanghai", 19500.0, 0.09, 850.0, 55.0);
    add("Singapore-Hamburg", 16800.0, 0.13, 1050.0, 70.0);
    add("Shenzhen-Long Beach", 11500.0, 0.14, 1150.0, 78.0);
    add("Ningbo-Oakland", 10400.0, 0.15, 1180.0, 76.0);
    add("Hong Kong-New York", 21000.0, 0.16, 1250.0, 85.0);
    add("Busan-Seattle", 8300.0, 0.14, 1100.0, 72.0);
    add("Rotterdam-New York", 6100.0, 0.13, 980.0, 68.0);
    m
}

fn default_forwarder_multipliers() -> HashMap<String, f64> {
    // forwarder-001 carries the volume discount in the demo data set
    let mut m = HashMap::new();
    m.insert("forwarder-001".to_string(), 0.95);
    m
}

impl Default for TariffConfig {
    fn default() -> Self {
        Self {
            routes: default_cost_routes(),
            default_route: default_cost_profile(),
            surcharges: SurchargeSchedule::default(),
            forwarder_multipliers: default_forwarder_multipliers(),
            jitter: default_jitter(),
        }
    }
}

// ============================================================================
// Market Tables
// ============================================================================

/// Competition intensity on a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompetitionLevel {
    High,
    Medium,
    Low,
}

impl CompetitionLevel {
    /// Bonus added to the competitiveness index.
    pub fn competitiveness_bonus(self) -> f64 {
        match self {
            Self::High => 0.2,
            Self::Medium => 0.1,
            Self::Low => 0.0,
        }
    }
}

/// Static market metadata for a route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteMarketProfile {
    /// Route popularity in [0, 1]
    pub popularity: f64,
    /// Historical volatility floor
    pub historical_volatility: f64,
    pub competition: CompetitionLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Directional route metadata table
    #[serde(default = "default_market_routes")]
    pub routes: HashMap<String, RouteMarketProfile>,

    /// Fallback metadata for routes absent from the table
    #[serde(default = "default_market_profile")]
    pub default_route: RouteMarketProfile,

    /// Congestion gets a fixed bump inside this UTC hour window
    #[serde(default = "default_business_start")]
    pub business_hours_start: u32,
    #[serde(default = "default_business_end")]
    pub business_hours_end: u32,
}

fn default_business_start() -> u32 {
    8
}
fn default_business_end() -> u32 {
    18
}

fn default_market_profile() -> RouteMarketProfile {
    RouteMarketProfile {
        popularity: 0.5,
        historical_volatility: 0.2,
        competition: CompetitionLevel::Medium,
    }
}

fn default_market_routes() -> HashMap<String, RouteMarketProfile> {
    let mut m = HashMap::new();
    let mut add = |key: &str, popularity: f64, historical_volatility: f64, competition: CompetitionLevel| {
        m.insert(
            key.to_string(),
            RouteMarketProfile { popularity, historical_volatility, competition },
        );
    };
    add("Shanghai-Los Angeles", 0.9, 0.18, CompetitionLevel::High);
    add("Los Angeles-Shanghai", 0.6, 0.15, CompetitionLevel::Medium);
    add("Shanghai-Rotterdam", 0.85, 0.2, CompetitionLevel::High);
    add("Rotterdam-Shanghai", 0.55, 0.16, CompetitionLevel::Medium);
    add("Singapore-Hamburg", 0.75, 0.22, CompetitionLevel::Medium);
    add("Shenzhen-Long Beach", 0.8, 0.19, CompetitionLevel::High);
    add("Ningbo-Oakland", 0.65, 0.21, CompetitionLevel::Medium);
    add("Hong Kong-New York", 0.7, 0.24, CompetitionLevel::Medium);
    add("Busan-Seattle", 0.45, 0.25, CompetitionLevel::Low);
    add("Rotterdam-New York", 0.6, 0.17, CompetitionLevel::Medium);
    m
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            routes: default_market_routes(),
            default_route: default_market_profile(),
            business_hours_start: default_business_start(),
            business_hours_end: default_business_end(),
        }
    }
}

// ============================================================================
// Pricing Tables
// ============================================================================

/// A customer tier and its price multiplier. Order matters: the legacy
/// tier-selection rule indexes this list by customer id length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierEntry {
    pub name: String,
    pub multiplier: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Ordered customer tiers
    #[serde(default = "default_tiers")]
    pub tiers: Vec<TierEntry>,

    /// Explicit customer id → tier name assignments. Consulted before the
    /// legacy length-derived selection.
    #[serde(default)]
    pub customer_tiers: HashMap<String, String>,

    /// Seasonal price adjustment per calendar month (Jan..Dec)
    #[serde(default = "default_seasonal")]
    pub seasonal: Vec<f64>,
}

fn default_tiers() -> Vec<TierEntry> {
    vec![
        TierEntry { name: "standard".to_string(), multiplier: 1.0 },
        TierEntry { name: "silver".to_string(), multiplier: 0.98 },
        TierEntry { name: "gold".to_string(), multiplier: 0.95 },
        TierEntry { name: "platinum".to_string(), multiplier: 0.92 },
    ]
}

fn default_seasonal() -> Vec<f64> {
    // Pre-Chinese-New-Year rush in January, post-holiday lull in February,
    // peak season building through Q3 into October.
    vec![
        0.08, -0.05, -0.02, 0.0, 0.02, 0.03, 0.05, 0.08, 0.10, 0.12, 0.06, 0.04,
    ]
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            tiers: default_tiers(),
            customer_tiers: HashMap::new(),
            seasonal: default_seasonal(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_include_canonical_transpacific_lane() {
        let cfg = RateConfig::default();
        let p = &cfg.tariff.routes["Shanghai-Los Angeles"];
        assert_eq!(p.distance_km, 10000.0);
        assert_eq!(p.per_km, 0.15);
        assert_eq!(p.per_ton, 1200.0);
        assert_eq!(p.per_cbm, 80.0);
        assert_eq!(cfg.tariff.forwarder_multipliers["forwarder-001"], 0.95);
    }

    #[test]
    fn test_reverse_lane_has_distinct_rates() {
        let cfg = TariffConfig::default();
        let head = &cfg.routes["Shanghai-Los Angeles"];
        let back = &cfg.routes["Los Angeles-Shanghai"];
        assert!(back.per_ton < head.per_ton);
    }

    #[test]
    fn test_partial_toml_merges_with_defaults() {
        let cfg: RateConfig = toml::from_str(
            r#"
            [server]
            addr = "127.0.0.1:9999"

            [tariff.surcharges]
            fuel = 0.1
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.addr, "127.0.0.1:9999");
        assert_eq!(cfg.tariff.surcharges.fuel, 0.1);
        // Untouched sections keep canonical defaults
        assert_eq!(cfg.tariff.surcharges.security, 0.02);
        assert_eq!(cfg.pricing.seasonal.len(), 12);
        assert_eq!(cfg.connectors.rms.max_ms, 200);
    }

    #[test]
    fn test_latency_range_sampling() {
        use rand::SeedableRng;
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let range = LatencyRange { min_ms: 50, max_ms: 200 };
        for _ in 0..100 {
            let d = range.sample(&mut rng).as_millis() as u64;
            assert!((50..=200).contains(&d));
        }
        assert!(LatencyRange::none().sample(&mut rng).is_zero());
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let cfg = RateConfig::default();
        let text = toml::to_string(&cfg).unwrap();
        let back: RateConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.tariff.routes.len(), cfg.tariff.routes.len());
        assert_eq!(back.pricing.tiers.len(), 4);
    }
}
