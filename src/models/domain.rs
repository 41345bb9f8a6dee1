use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::core::MatchError;

/// One of the two disjoint sides of the market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Proposer,
    Receiver,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Proposer => Side::Receiver,
            Side::Receiver => Side::Proposer,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Proposer => write!(f, "proposer"),
            Side::Receiver => write!(f, "receiver"),
        }
    }
}

/// Terminal engagement table of a matching run
///
/// Each receiver maps to at most one proposer and no proposer appears twice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Receiver -> engaged proposer
    pub engagements: BTreeMap<String, String>,
    /// Proposers that ended the run without a partner, in canonical order
    #[serde(default)]
    pub unmatched: Vec<String>,
}

impl MatchResult {
    pub fn new(engagements: BTreeMap<String, String>, unmatched: Vec<String>) -> Self {
        Self {
            engagements,
            unmatched,
        }
    }

    /// Number of matched pairs
    pub fn len(&self) -> usize {
        self.engagements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engagements.is_empty()
    }

    pub fn partner_of_receiver(&self, receiver: &str) -> Option<&str> {
        self.engagements.get(receiver).map(String::as_str)
    }

    /// Scans the table for the receiver holding `proposer`
    pub fn partner_of_proposer(&self, proposer: &str) -> Option<&str> {
        self.engagements
            .iter()
            .find(|(_, p)| p.as_str() == proposer)
            .map(|(r, _)| r.as_str())
    }

    pub fn contains_pair(&self, proposer: &str, receiver: &str) -> bool {
        self.partner_of_receiver(receiver) == Some(proposer)
    }

    /// Matched pairs as `(proposer, receiver)`, ordered by receiver
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.engagements
            .iter()
            .map(|(r, p)| (p.as_str(), r.as_str()))
    }
}

/// Outcome of a single proposal in the deferred-acceptance loop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProposalEvent {
    /// The receiver was free and accepted
    Accepted { proposer: String, receiver: String },
    /// The receiver traded up, freeing `displaced`
    Displaced {
        proposer: String,
        receiver: String,
        displaced: String,
    },
    /// The receiver kept `holder` and turned the proposer down
    Rejected {
        proposer: String,
        receiver: String,
        holder: String,
    },
    /// The proposer ran out of candidates and stays unmatched
    Exhausted { proposer: String },
}

/// Ordered record of every proposal made during a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalLog {
    pub events: Vec<ProposalEvent>,
}

impl ProposalLog {
    pub fn push(&mut self, event: ProposalEvent) {
        self.events.push(event);
    }

    /// Number of proposals made (exhaustion markers are not proposals)
    pub fn proposals(&self) -> usize {
        self.events
            .iter()
            .filter(|e| !matches!(e, ProposalEvent::Exhausted { .. }))
            .count()
    }

    /// Re-applies the events to an empty engagement table.
    ///
    /// Fails at the first event that would leave a receiver holding two
    /// proposers, a proposer engaged twice, or that contradicts the table.
    pub fn replay(&self) -> Result<BTreeMap<String, String>, MatchError> {
        let mut held: BTreeMap<String, String> = BTreeMap::new();

        for (step, event) in self.events.iter().enumerate() {
            match event {
                ProposalEvent::Accepted { proposer, receiver } => {
                    if let Some(current) = held.get(receiver) {
                        return Err(MatchError::InvalidMatching(format!(
                            "step {}: {} accepted {} while holding {}",
                            step, receiver, proposer, current
                        )));
                    }
                    ensure_unengaged(&held, proposer, step)?;
                    held.insert(receiver.clone(), proposer.clone());
                }
                ProposalEvent::Displaced {
                    proposer,
                    receiver,
                    displaced,
                } => {
                    if held.get(receiver) != Some(displaced) {
                        return Err(MatchError::InvalidMatching(format!(
                            "step {}: {} displaced {} without holding it",
                            step, receiver, displaced
                        )));
                    }
                    ensure_unengaged(&held, proposer, step)?;
                    held.insert(receiver.clone(), proposer.clone());
                }
                ProposalEvent::Rejected {
                    receiver, holder, ..
                } => {
                    if held.get(receiver) != Some(holder) {
                        return Err(MatchError::InvalidMatching(format!(
                            "step {}: {} rejected in favour of {} without holding it",
                            step, receiver, holder
                        )));
                    }
                }
                ProposalEvent::Exhausted { proposer } => {
                    ensure_unengaged(&held, proposer, step)?;
                }
            }
        }

        Ok(held)
    }
}

fn ensure_unengaged(
    held: &BTreeMap<String, String>,
    proposer: &str,
    step: usize,
) -> Result<(), MatchError> {
    match held.iter().find(|(_, p)| p.as_str() == proposer) {
        Some((receiver, _)) => Err(MatchError::InvalidMatching(format!(
            "step {}: {} is already engaged to {}",
            step, proposer, receiver
        ))),
        None => Ok(()),
    }
}

/// A proposer-receiver pair that would both rather be with each other
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockingPair {
    pub proposer: String,
    pub receiver: String,
}

/// Satisfaction per proposer (0 for unmatched proposers)
pub type SatisfactionScores = BTreeMap<String, f64>;

/// One committed pair of the greedy auction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidAward {
    pub round: usize,
    pub proposer: String,
    pub receiver: String,
    pub score: f64,
}

/// Everything the bidding matcher produces in one run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BiddingOutcome {
    pub matching: MatchResult,
    pub satisfaction: SatisfactionScores,
    pub awards: Vec<BidAward>,
}

/// Normalization constants for bid scores
///
/// These scale absolute score magnitudes only; the relative order of pairs
/// (and therefore the matching) does not depend on them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreNormalization {
    pub budget_max: f64,
    pub capacity_max: f64,
}

impl Default for ScoreNormalization {
    fn default() -> Self {
        Self {
            budget_max: 1500.0,
            capacity_max: 100.0,
        }
    }
}

/// Parameters of a bidding run
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BiddingParams {
    pub normalization: ScoreNormalization,
    /// Maximum number of awards; `None` means `min(|P|, |R|)`
    pub round_cap: Option<usize>,
}
