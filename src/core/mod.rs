// Core algorithm exports
pub mod bidding;
pub mod error;
pub mod matcher;
pub mod preferences;
pub mod scheduler;
pub mod scoring;
pub mod stability;
pub mod state;

pub use bidding::{WeightTable, WeightTableBuilder, WeightedBiddingMatcher};
pub use error::MatchError;
pub use matcher::StableMatcher;
pub use preferences::{PreferenceTable, PreferenceTableBuilder};
pub use scheduler::ProposalScheduler;
pub use scoring::{calculate_bid_score, calculate_satisfaction};
pub use stability::{blocking_pairs, is_stable, PreferenceOrder};
pub use state::MatchingState;
