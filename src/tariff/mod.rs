//! Tariff book — route cost resolution and surcharge accumulation
//!
//! Stands in for a rate-management-system (RMS) feed: an in-memory
//! directional route table with a default fallback, a ±10% uniform
//! perturbation on the base cost, and a schedule of percentage
//! surcharges. The async connector wrapper adds a simulated network
//! delay; the computation itself is synchronous and takes an injected
//! random source so tests can pin outputs.

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::debug;

use crate::config::{LatencyRange, RouteCostProfile, SurchargeSchedule, TariffConfig};
use crate::types::{round_cents, CargoType, CostData, QuoteParams, ServiceType};

/// Route cost lookup over the configured tariff tables.
pub struct RateBook {
    cfg: TariffConfig,
    latency: LatencyRange,
}

impl RateBook {
    pub fn new(cfg: TariffConfig, latency: LatencyRange) -> Self {
        Self { cfg, latency }
    }

    fn profile(&self, route_key: &str) -> &RouteCostProfile {
        self.cfg
            .routes
            .get(route_key)
            .unwrap_or(&self.cfg.default_route)
    }

    fn forwarder_multiplier(&self, forwarder_id: &str) -> f64 {
        // Unknown forwarders price at list rate
        self.cfg
            .forwarder_multipliers
            .get(forwarder_id)
            .copied()
            .unwrap_or(1.0)
    }

    /// Resolve cost data for a quote.
    ///
    /// `base = distance*per_km + tons*per_ton + volume*per_cbm`, jittered
    /// uniformly within the configured band and scaled by the forwarder
    /// multiplier before surcharges are added. All monetary outputs are
    /// rounded to the cent.
    pub fn cost_data(
        &self,
        q: &QuoteParams,
        now: DateTime<Utc>,
        rng: &mut impl Rng,
    ) -> CostData {
        let route = q.route_key();
        let p = self.profile(&route);

        let raw = p.distance_km * p.per_km
            + (q.weight_kg / 1000.0) * p.per_ton
            + q.volume_cbm * p.per_cbm;
        let jitter = rng.gen_range(1.0 - self.cfg.jitter..=1.0 + self.cfg.jitter);
        let base_cost = round_cents(raw * jitter * self.forwarder_multiplier(&q.forwarder_id));

        let fraction =
            surcharge_fraction(&self.cfg.surcharges, q.cargo_type, q.weight_kg, q.service);
        let surcharges = round_cents(base_cost * fraction);

        debug!(
            route = %route,
            base_cost,
            surcharges,
            "resolved tariff cost"
        );

        CostData {
            base_cost,
            surcharges,
            total_cost: round_cents(base_cost + surcharges),
            currency: "USD".to_string(),
            route,
            forwarder_id: q.forwarder_id.clone(),
            timestamp: now,
        }
    }

    /// Connector entry point: simulated RMS latency, then cost resolution
    /// with unseeded randomness.
    pub async fn fetch(&self, q: &QuoteParams) -> CostData {
        let delay = self.latency.sample(&mut rand::thread_rng());
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.cost_data(q, Utc::now(), &mut rand::thread_rng())
    }
}

/// Sum of all applicable surcharge fractions.
///
/// Fractions accumulate independently (summed, not compounded); fuel and
/// security always apply.
pub fn surcharge_fraction(
    s: &SurchargeSchedule,
    cargo: CargoType,
    weight_kg: f64,
    service: ServiceType,
) -> f64 {
    let mut fraction = s.fuel + s.security;
    if cargo == CargoType::Hazardous {
        fraction += s.hazardous;
    }
    if cargo == CargoType::Refrigerated {
        fraction += s.refrigerated;
    }
    if weight_kg > s.heavy_threshold_kg {
        fraction += s.heavy_cargo;
    }
    if service == ServiceType::Express {
        fraction += s.express;
    }
    fraction
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn params(forwarder: &str) -> QuoteParams {
        QuoteParams {
            origin: "Shanghai".to_string(),
            destination: "Los Angeles".to_string(),
            cargo_type: CargoType::General,
            weight_kg: 1000.0,
            volume_cbm: 5.0,
            service: ServiceType::Standard,
            customer_id: "customer-42".to_string(),
            forwarder_id: forwarder.to_string(),
        }
    }

    fn book(jitter: f64) -> RateBook {
        let mut cfg = TariffConfig::default();
        cfg.jitter = jitter;
        RateBook::new(cfg, LatencyRange::none())
    }

    #[test]
    fn test_canonical_lane_midpoint_without_jitter() {
        // 10000*0.15 + 1*1200 + 5*80 = 3100, x0.95 forwarder discount
        let book = book(0.0);
        let mut rng = StdRng::seed_from_u64(1);
        let cost = book.cost_data(&params("forwarder-001"), Utc::now(), &mut rng);
        assert_eq!(cost.base_cost, 2945.0);
        assert_eq!(cost.route, "Shanghai-Los Angeles");
        assert_eq!(cost.currency, "USD");
    }

    #[test]
    fn test_base_cost_stays_inside_jitter_band() {
        let book = book(0.1);
        let mut rng = StdRng::seed_from_u64(99);
        let q = params("forwarder-001");
        for _ in 0..300 {
            let cost = book.cost_data(&q, Utc::now(), &mut rng);
            assert!(cost.base_cost >= 2945.0 * 0.9 - 0.01, "low: {}", cost.base_cost);
            assert!(cost.base_cost <= 2945.0 * 1.1 + 0.01, "high: {}", cost.base_cost);
        }
    }

    #[test]
    fn test_surcharges_sum_not_compound() {
        let s = SurchargeSchedule::default();
        // Hazardous 1500 kg express: fuel + security + hazardous + heavy + express
        let f = surcharge_fraction(&s, CargoType::Hazardous, 1500.0, ServiceType::Express);
        assert!((f - 0.50).abs() < 1e-12);
        // Refrigerated light standard: fuel + security + refrigerated
        let f = surcharge_fraction(&s, CargoType::Refrigerated, 500.0, ServiceType::Standard);
        assert!((f - 0.22).abs() < 1e-12);
        // Exactly at the heavy threshold does not trigger the surcharge
        let f = surcharge_fraction(&s, CargoType::General, 1000.0, ServiceType::Standard);
        assert!((f - 0.10).abs() < 1e-12);
    }

    #[test]
    fn test_surcharge_amount_matches_manual_calculation() {
        let book = book(0.0);
        let mut rng = StdRng::seed_from_u64(5);
        let mut q = params("");
        q.cargo_type = CargoType::Hazardous;
        q.weight_kg = 1500.0;
        let cost = book.cost_data(&q, Utc::now(), &mut rng);
        // base = 10000*0.15 + 1.5*1200 + 5*80 = 3700, fraction = 0.30
        assert_eq!(cost.base_cost, 3700.0);
        assert_eq!(cost.surcharges, 1110.0);
        assert_eq!(cost.total_cost, 4810.0);
    }

    #[test]
    fn test_unknown_cargo_and_service_price_neutrally() {
        let s = SurchargeSchedule::default();
        let f = surcharge_fraction(&s, CargoType::Unknown, 500.0, ServiceType::Unknown);
        assert!((f - 0.10).abs() < 1e-12);
    }

    #[test]
    fn test_reverse_lane_resolves_its_own_profile() {
        let book = book(0.0);
        let mut rng = StdRng::seed_from_u64(3);
        let mut q = params("");
        std::mem::swap(&mut q.origin, &mut q.destination);
        let cost = book.cost_data(&q, Utc::now(), &mut rng);
        // 10000*0.11 + 1*950 + 5*60 = 2350
        assert_eq!(cost.base_cost, 2350.0);
        assert_eq!(cost.route, "Los Angeles-Shanghai");
    }

    #[test]
    fn test_unlisted_route_falls_back_to_default_profile() {
        let book = book(0.0);
        let mut rng = StdRng::seed_from_u64(3);
        let mut q = params("");
        q.origin = "Atlantis".to_string();
        let cost = book.cost_data(&q, Utc::now(), &mut rng);
        // default profile: 9000*0.13 + 1*1000 + 5*70 = 2520
        assert_eq!(cost.base_cost, 2520.0);
    }

    #[test]
    fn test_unknown_forwarder_pays_list_rate() {
        let book = book(0.0);
        let mut rng = StdRng::seed_from_u64(3);
        let cost = book.cost_data(&params("nobody"), Utc::now(), &mut rng);
        assert_eq!(cost.base_cost, 3100.0);
    }
}
