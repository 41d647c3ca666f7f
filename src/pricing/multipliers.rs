//! Fixed multiplier tables for the quote pipeline.

use crate::config::PricingConfig;
use crate::types::{CargoType, ServiceType};

/// Cargo handling factor. Anything outside the table prices neutrally.
pub fn cargo_factor(cargo: CargoType) -> f64 {
    match cargo {
        CargoType::Hazardous => 1.3,
        CargoType::Refrigerated => 1.2,
        CargoType::Oversized => 1.4,
        CargoType::Fragile => 1.1,
        _ => 1.0,
    }
}

/// Service level factor. Anything outside the table prices neutrally.
pub fn service_factor(service: ServiceType) -> f64 {
    match service {
        ServiceType::Express => 1.3,
        ServiceType::Economy => 0.8,
        ServiceType::Premium => 1.5,
        _ => 1.0,
    }
}

/// Resolve the customer's price multiplier.
///
/// An explicit `customer_tiers` assignment wins. Otherwise the tier is
/// selected by `tiers[customer_id.len() % tiers.len()]` — the id's
/// length, not its identity. Kept for compatibility with historical
/// quotes; pin customers in the config map to opt out.
pub fn customer_multiplier(cfg: &PricingConfig, customer_id: &str) -> f64 {
    if let Some(tier_name) = cfg.customer_tiers.get(customer_id) {
        if let Some(tier) = cfg.tiers.iter().find(|t| t.name == *tier_name) {
            return tier.multiplier;
        }
    }
    if cfg.tiers.is_empty() {
        return 1.0;
    }
    cfg.tiers[customer_id.len() % cfg.tiers.len()].multiplier
}

/// Seasonal adjustment for a 1-based calendar month.
pub fn seasonal_factor(cfg: &PricingConfig, month: u32) -> f64 {
    let idx = (month.saturating_sub(1) as usize) % 12;
    cfg.seasonal.get(idx).copied().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cargo_factors_match_table() {
        assert_eq!(cargo_factor(CargoType::General), 1.0);
        assert_eq!(cargo_factor(CargoType::Hazardous), 1.3);
        assert_eq!(cargo_factor(CargoType::Oversized), 1.4);
        assert_eq!(cargo_factor(CargoType::HighValue), 1.0);
        assert_eq!(cargo_factor(CargoType::Unknown), 1.0);
    }

    #[test]
    fn test_service_factors_match_table() {
        assert_eq!(service_factor(ServiceType::Economy), 0.8);
        assert_eq!(service_factor(ServiceType::Premium), 1.5);
        assert_eq!(service_factor(ServiceType::Unknown), 1.0);
    }

    #[test]
    fn test_legacy_tier_selection_by_id_length() {
        let cfg = PricingConfig::default();
        // len 4 -> index 0 (standard), len 2 -> index 2 (gold)
        assert_eq!(customer_multiplier(&cfg, "abcd"), 1.0);
        assert_eq!(customer_multiplier(&cfg, "ab"), 0.95);
        // Ids of equal length land in the same tier regardless of identity
        assert_eq!(
            customer_multiplier(&cfg, "aaaa"),
            customer_multiplier(&cfg, "zzzz")
        );
    }

    #[test]
    fn test_explicit_assignment_beats_legacy_rule() {
        let mut cfg = PricingConfig::default();
        cfg.customer_tiers
            .insert("acme-logistics".to_string(), "platinum".to_string());
        assert_eq!(customer_multiplier(&cfg, "acme-logistics"), 0.92);
    }

    #[test]
    fn test_seasonal_factor_by_month() {
        let cfg = PricingConfig::default();
        assert_eq!(seasonal_factor(&cfg, 1), 0.08);
        assert_eq!(seasonal_factor(&cfg, 4), 0.0);
        assert_eq!(seasonal_factor(&cfg, 10), 0.12);
    }
}
