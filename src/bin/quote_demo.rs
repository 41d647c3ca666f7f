//! Quote Pipeline Demo
//!
//! Drives the full in-process quoting pipeline (tariff book → market
//! board → rate predictor) for a batch of synthetic shipments and prints
//! one JSON quote per line. No HTTP server involved.
//!
//! # Usage
//! ```bash
//! ./quote-demo --count 20 --seed 42 | jq .price
//! ```

use chrono::{Datelike, Utc};
use clap::Parser;
use rand::prelude::*;

use ratecast::config::{LatencyRange, RateConfig};
use ratecast::market::MarketBoard;
use ratecast::pricing::RatePredictor;
use ratecast::tariff::RateBook;
use ratecast::types::{CargoType, QuoteParams, ServiceType};

/// Demo lanes cycled through when no --route is given.
const LANES: &[(&str, &str)] = &[
    ("Shanghai", "Los Angeles"),
    ("Shanghai", "Rotterdam"),
    ("Singapore", "Hamburg"),
    ("Shenzhen", "Long Beach"),
    ("Busan", "Seattle"),
    ("Rotterdam", "New York"),
];

const CARGO_TYPES: &[CargoType] = &[
    CargoType::General,
    CargoType::Hazardous,
    CargoType::Refrigerated,
    CargoType::Oversized,
    CargoType::Fragile,
    CargoType::HighValue,
];

const SERVICE_TYPES: &[ServiceType] = &[
    ServiceType::Standard,
    ServiceType::Express,
    ServiceType::Economy,
    ServiceType::Premium,
];

#[derive(Parser, Debug)]
#[command(name = "quote-demo")]
#[command(about = "Synthetic quote generation for ratecast testing")]
#[command(version)]
struct Args {
    /// Number of quotes to generate
    #[arg(short = 'n', long, default_value = "10")]
    count: u32,

    /// Random seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Fixed lane as "Origin-Destination" (default: cycle the demo lanes)
    #[arg(long)]
    route: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let cfg = RateConfig::default();
    let book = RateBook::new(cfg.tariff.clone(), LatencyRange::none());
    let board = MarketBoard::new(cfg.market.clone(), LatencyRange::none());
    let predictor = RatePredictor::new(cfg.pricing.clone());

    let mut rng: StdRng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let fixed_lane = args
        .route
        .as_deref()
        .and_then(|r| r.split_once('-'))
        .map(|(o, d)| (o.to_string(), d.to_string()));

    for i in 0..args.count {
        let (origin, destination) = match &fixed_lane {
            Some((o, d)) => (o.clone(), d.clone()),
            None => {
                let (o, d) = LANES[i as usize % LANES.len()];
                (o.to_string(), d.to_string())
            }
        };

        let params = QuoteParams {
            origin,
            destination,
            cargo_type: CARGO_TYPES[i as usize % CARGO_TYPES.len()],
            weight_kg: (rng.gen_range(200.0..5000.0_f64) * 10.0).round() / 10.0,
            volume_cbm: (rng.gen_range(1.0..80.0_f64) * 10.0).round() / 10.0,
            service: SERVICE_TYPES[i as usize % SERVICE_TYPES.len()],
            customer_id: format!("customer-{:03}", rng.gen_range(1..50)),
            forwarder_id: format!("forwarder-{:03}", rng.gen_range(1..5)),
        };

        let now = Utc::now();
        let cost = book.cost_data(&params, now, &mut rng);
        let market = board.snapshot(&params.origin, &params.destination, now, &mut rng);
        let prediction = predictor.predict(&cost, &market, &params, now.month());

        let line = serde_json::json!({
            "request": params,
            "cost": cost,
            "market": market,
            "prediction": prediction,
        });
        println!("{line}");
    }

    Ok(())
}
