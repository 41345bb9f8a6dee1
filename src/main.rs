use std::error::Error;

use pairing_algo::config::Settings;
use pairing_algo::core::{blocking_pairs, is_stable, StableMatcher, WeightedBiddingMatcher};
use pairing_algo::models::{BiddingReport, Dataset, MatchReport, StableReport};
use pairing_algo::toolkit::{random_bidding_dataset, random_preference_dataset};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(2);
        }
    };

    init_logging(&settings);
    info!("Configuration loaded successfully");

    match run(&settings) {
        Ok(report) => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to serialize report: {}", e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            error!("Matching failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn init_logging(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.logging.level.as_str()));

    // Logs go to stderr; stdout carries the report
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    if settings.logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }
}

fn run(settings: &Settings) -> Result<MatchReport, Box<dyn Error>> {
    let dataset = load_dataset(settings)?;

    let stable = match &dataset.preferences {
        Some(preferences) => {
            let table = preferences.to_table()?;
            let matcher =
                StableMatcher::new().require_balanced_sides(settings.matching.require_balanced_sides);
            let (matching, log) = matcher.run_logged(&table)?;
            let stable = is_stable(&matching, &table)?;

            info!("Stable matching: {} pairs, stable = {}", matching.len(), stable);

            Some(StableReport {
                matching,
                proposals: log.proposals(),
                is_stable: stable,
            })
        }
        None => None,
    };

    let bidding = match &dataset.bidding {
        Some(bidding) => {
            let market = bidding.to_market()?;
            let matcher = WeightedBiddingMatcher::new(settings.bidding.params());
            let outcome = matcher.run_detailed(&market.weights, &market.budgets, &market.capacities)?;
            let blocking = blocking_pairs(&outcome.matching, &market.weights)?;

            info!(
                "Bidding matching: {} pairs, {} blocking pairs",
                outcome.matching.len(),
                blocking.len()
            );

            Some(BiddingReport {
                matching: outcome.matching,
                satisfaction: outcome.satisfaction,
                awards: outcome.awards,
                blocking_pairs: blocking,
            })
        }
        None => None,
    };

    Ok(MatchReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        generated_at: chrono::Utc::now(),
        stable,
        bidding,
    })
}

/// CLI argument first, then `dataset.path`, otherwise a generated market
fn load_dataset(settings: &Settings) -> Result<Dataset, Box<dyn Error>> {
    if let Some(path) = std::env::args().nth(1).or_else(|| settings.dataset.path.clone()) {
        info!("Loading dataset from {}", path);
        return Ok(Dataset::load(&path)?);
    }

    let size = settings.dataset.size;
    let mut rng = match settings.dataset.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    info!("Generating a {}x{} dataset (seed: {:?})", size, size, settings.dataset.seed);

    Ok(Dataset {
        preferences: Some(random_preference_dataset(size, size, &mut rng)),
        bidding: Some(random_bidding_dataset(size, size, &mut rng)),
    })
}
