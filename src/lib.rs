//! Pairing Algo - two-sided stable matching engine
//!
//! This library implements proposer-optimal deferred acceptance over complete
//! strict preference lists, a stability checker, and a greedy weighted bidding
//! variant scored from mutual weights, budgets and capacities.

pub mod config;
pub mod core;
pub mod models;
pub mod toolkit;

// Re-export commonly used types
pub use core::{
    blocking_pairs, is_stable, MatchError, PreferenceTable, StableMatcher, WeightTable,
    WeightedBiddingMatcher,
};
pub use models::{BiddingParams, Dataset, MatchReport, MatchResult, ProposalLog};
