use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::{MatchError, PreferenceTable};
use crate::models::{
    BidderEntry, BiddingDataset, PreferenceDataset, PreferenceEntry, ReceiverEntry,
};
use crate::toolkit::search::Station;

const WEIGHT_RANGE: std::ops::RangeInclusive<i64> = 1..=10;
const BUDGET_RANGE: std::ops::RangeInclusive<u32> = 500..=1500;
const CAPACITY_RANGE: std::ops::RangeInclusive<u32> = 20..=100;

/// `prefix1`, `prefix2`, ... `prefixN`
pub fn participant_names(prefix: &str, n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("{}{}", prefix, i)).collect()
}

/// Complete preference lists with every list an independent shuffle
///
/// Proposers are named `P1..`, receivers `R1..`.
pub fn random_preference_dataset<R>(
    n_proposers: usize,
    n_receivers: usize,
    rng: &mut R,
) -> PreferenceDataset
where
    R: Rng + ?Sized,
{
    let proposers = participant_names("P", n_proposers);
    let receivers = participant_names("R", n_receivers);

    let shuffled = |names: &[String], rng: &mut R| {
        let mut list = names.to_vec();
        list.shuffle(rng);
        list
    };

    PreferenceDataset {
        proposers: proposers
            .iter()
            .map(|name| PreferenceEntry {
                name: name.clone(),
                preferences: shuffled(&receivers, rng),
            })
            .collect(),
        receivers: receivers
            .iter()
            .map(|name| PreferenceEntry {
                name: name.clone(),
                preferences: shuffled(&proposers, rng),
            })
            .collect(),
    }
}

/// Random complete [`PreferenceTable`]
pub fn random_preference_table<R>(
    n_proposers: usize,
    n_receivers: usize,
    rng: &mut R,
) -> Result<PreferenceTable, MatchError>
where
    R: Rng + ?Sized,
{
    random_preference_dataset(n_proposers, n_receivers, rng).to_table()
}

/// Random bidding market: weights in 1..=10, budgets in 500..=1500,
/// capacities in 20..=100
pub fn random_bidding_dataset<R>(
    n_proposers: usize,
    n_receivers: usize,
    rng: &mut R,
) -> BiddingDataset
where
    R: Rng + ?Sized,
{
    let proposers = participant_names("P", n_proposers);
    let receivers = participant_names("R", n_receivers);

    let weights_over = |names: &[String], rng: &mut R| -> Vec<(String, i64)> {
        names
            .iter()
            .map(|name| (name.clone(), rng.gen_range(WEIGHT_RANGE)))
            .collect()
    };

    BiddingDataset {
        proposers: proposers
            .iter()
            .map(|name| BidderEntry {
                name: name.clone(),
                budget: f64::from(rng.gen_range(BUDGET_RANGE)),
                weights: weights_over(&receivers, rng),
            })
            .collect(),
        receivers: receivers
            .iter()
            .map(|name| ReceiverEntry {
                name: name.clone(),
                capacity: f64::from(rng.gen_range(CAPACITY_RANGE)),
                weights: weights_over(&proposers, rng),
            })
            .collect(),
    }
}

/// Stations with ids `1..=n`, none faulty
pub fn sequential_stations(n: usize) -> Vec<Station> {
    (1..=n as i64).map(station).collect()
}

/// Stations with strictly increasing ids and random gaps of 1..=100
pub fn non_uniform_stations<R>(n: usize, rng: &mut R) -> Vec<Station>
where
    R: Rng + ?Sized,
{
    let mut id = 0i64;
    (0..n)
        .map(|_| {
            id += rng.gen_range(1..=100);
            station(id)
        })
        .collect()
}

/// Marks every station from `index` onward as faulty; an index past the end
/// marks nothing
pub fn mark_faulty_from(stations: &mut [Station], index: usize) {
    for (i, s) in stations.iter_mut().enumerate() {
        s.faulty = i >= index;
    }
}

fn station(id: i64) -> Station {
    Station {
        id,
        name: format!("Station {}", id),
        faulty: false,
    }
}
