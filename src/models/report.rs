use serde::{Deserialize, Serialize};

use crate::models::domain::{BidAward, BlockingPair, MatchResult, SatisfactionScores};

/// Report printed by the driver binary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub version: String,
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub stable: Option<StableReport>,
    pub bidding: Option<BiddingReport>,
}

/// Deferred-acceptance section of a report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StableReport {
    pub matching: MatchResult,
    pub proposals: usize,
    pub is_stable: bool,
}

/// Weighted bidding section of a report
///
/// `blocking_pairs` is advisory: the auction does not promise stability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BiddingReport {
    pub matching: MatchResult,
    pub satisfaction: SatisfactionScores,
    pub awards: Vec<BidAward>,
    pub blocking_pairs: Vec<BlockingPair>,
}
