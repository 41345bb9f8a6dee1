use std::collections::{BTreeMap, HashMap};

use crate::core::{
    error::MatchError,
    preferences::index_side,
    scoring::{calculate_bid_score, calculate_satisfaction},
    stability::PreferenceOrder,
};
use crate::models::{
    BidAward, BiddingOutcome, BiddingParams, MatchResult, SatisfactionScores, ScoreNormalization,
    Side,
};

/// Integer preference weights for both sides (higher = better)
///
/// Unlike [`PreferenceTable`](crate::core::PreferenceTable) ranks, weights
/// need not be distinct. Every participant must weight every member of the
/// opposite side, and weights are never negative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightTable {
    proposers: Vec<String>,
    receivers: Vec<String>,
    proposer_index: HashMap<String, usize>,
    receiver_index: HashMap<String, usize>,
    /// `proposer_weights[p][r]`
    proposer_weights: Vec<Vec<i64>>,
    /// `receiver_weights[r][p]`
    receiver_weights: Vec<Vec<i64>>,
}

impl WeightTable {
    pub fn builder() -> WeightTableBuilder {
        WeightTableBuilder::default()
    }

    pub fn proposers(&self) -> &[String] {
        &self.proposers
    }

    pub fn receivers(&self) -> &[String] {
        &self.receivers
    }

    pub fn proposer_weight(&self, proposer: &str, receiver: &str) -> Result<i64, MatchError> {
        let p = self.require(Side::Proposer, proposer)?;
        let r = self.require(Side::Receiver, receiver)?;
        Ok(self.proposer_weights[p][r])
    }

    pub fn receiver_weight(&self, receiver: &str, proposer: &str) -> Result<i64, MatchError> {
        let r = self.require(Side::Receiver, receiver)?;
        let p = self.require(Side::Proposer, proposer)?;
        Ok(self.receiver_weights[r][p])
    }

    /// Exchanges the weights `proposer` gives `a` and `b`
    pub fn swap_proposer_weights(&mut self, proposer: &str, a: &str, b: &str) -> Result<(), MatchError> {
        let p = self.require(Side::Proposer, proposer)?;
        let ra = self.require(Side::Receiver, a)?;
        let rb = self.require(Side::Receiver, b)?;
        self.proposer_weights[p].swap(ra, rb);
        Ok(())
    }

    /// Exchanges the weights `receiver` gives `a` and `b`
    pub fn swap_receiver_weights(&mut self, receiver: &str, a: &str, b: &str) -> Result<(), MatchError> {
        let r = self.require(Side::Receiver, receiver)?;
        let pa = self.require(Side::Proposer, a)?;
        let pb = self.require(Side::Proposer, b)?;
        self.receiver_weights[r].swap(pa, pb);
        Ok(())
    }

    fn require(&self, side: Side, name: &str) -> Result<usize, MatchError> {
        let index = match side {
            Side::Proposer => self.proposer_index.get(name),
            Side::Receiver => self.receiver_index.get(name),
        };
        index.copied().ok_or_else(|| MatchError::unknown(side, name))
    }
}

impl PreferenceOrder for WeightTable {
    fn proposer_names(&self) -> &[String] {
        &self.proposers
    }

    fn receiver_names(&self) -> &[String] {
        &self.receivers
    }

    fn proposer_prefers(
        &self,
        proposer: &str,
        candidate: &str,
        current: &str,
    ) -> Result<bool, MatchError> {
        Ok(self.proposer_weight(proposer, candidate)? > self.proposer_weight(proposer, current)?)
    }

    fn receiver_prefers(
        &self,
        receiver: &str,
        candidate: &str,
        current: &str,
    ) -> Result<bool, MatchError> {
        Ok(self.receiver_weight(receiver, candidate)? > self.receiver_weight(receiver, current)?)
    }
}

/// Builder for [`WeightTable`]; insertion order is canonical order
#[derive(Debug, Clone, Default)]
pub struct WeightTableBuilder {
    proposers: Vec<(String, Vec<(String, i64)>)>,
    receivers: Vec<(String, Vec<(String, i64)>)>,
}

impl WeightTableBuilder {
    pub fn proposer<I, S>(mut self, name: impl Into<String>, weights: I) -> Self
    where
        I: IntoIterator<Item = (S, i64)>,
        S: Into<String>,
    {
        let weights = weights.into_iter().map(|(s, w)| (s.into(), w)).collect();
        self.proposers.push((name.into(), weights));
        self
    }

    pub fn receiver<I, S>(mut self, name: impl Into<String>, weights: I) -> Self
    where
        I: IntoIterator<Item = (S, i64)>,
        S: Into<String>,
    {
        let weights = weights.into_iter().map(|(s, w)| (s.into(), w)).collect();
        self.receivers.push((name.into(), weights));
        self
    }

    pub fn build(self) -> Result<WeightTable, MatchError> {
        let proposer_index = index_side(Side::Proposer, self.proposers.iter().map(|(n, _)| n))?;
        let receiver_index = index_side(Side::Receiver, self.receivers.iter().map(|(n, _)| n))?;

        if let Some((name, _)) = self
            .proposers
            .iter()
            .find(|(name, _)| receiver_index.contains_key(name))
        {
            return Err(MatchError::OverlappingSides { name: name.clone() });
        }

        let proposers: Vec<String> = self.proposers.iter().map(|(n, _)| n.clone()).collect();
        let receivers: Vec<String> = self.receivers.iter().map(|(n, _)| n.clone()).collect();

        let proposer_weights = self
            .proposers
            .iter()
            .map(|(name, entries)| {
                dense_weights(Side::Proposer, name, entries, &receivers, &receiver_index)
            })
            .collect::<Result<Vec<_>, _>>()?;
        let receiver_weights = self
            .receivers
            .iter()
            .map(|(name, entries)| {
                dense_weights(Side::Receiver, name, entries, &proposers, &proposer_index)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(WeightTable {
            proposers,
            receivers,
            proposer_index,
            receiver_index,
            proposer_weights,
            receiver_weights,
        })
    }
}

fn dense_weights(
    side: Side,
    participant: &str,
    entries: &[(String, i64)],
    opposite: &[String],
    opposite_index: &HashMap<String, usize>,
) -> Result<Vec<i64>, MatchError> {
    let mut weights: Vec<Option<i64>> = vec![None; opposite.len()];

    for (entry, weight) in entries {
        let idx = opposite_index
            .get(entry.as_str())
            .copied()
            .ok_or_else(|| MatchError::UnexpectedPreference {
                side,
                participant: participant.to_string(),
                entry: entry.clone(),
            })?;
        if *weight < 0 {
            return Err(MatchError::InvalidWeight {
                side,
                participant: participant.to_string(),
                entry: entry.clone(),
                weight: *weight,
            });
        }
        if weights[idx].replace(*weight).is_some() {
            return Err(MatchError::DuplicatePreference {
                side,
                participant: participant.to_string(),
                entry: entry.clone(),
            });
        }
    }

    weights
        .into_iter()
        .enumerate()
        .map(|(idx, w)| {
            w.ok_or_else(|| MatchError::MissingPreference {
                side,
                participant: participant.to_string(),
                missing: opposite[idx].clone(),
            })
        })
        .collect()
}

/// Greedy global auction over bid scores
///
/// # Rounds
/// 1. Score every (proposer, receiver) pair once up front
/// 2. Award the highest-scoring pair among still-unmatched participants
///    (ties go to the earlier proposer, then the earlier receiver)
/// 3. Stop when a side is exhausted, the best remaining score is <= 0,
///    or the round cap is reached
///
/// The result is not guaranteed to be stable under either side's weights;
/// run [`blocking_pairs`](crate::core::blocking_pairs) against the
/// [`WeightTable`] for a diagnostic.
#[derive(Debug, Clone, Default)]
pub struct WeightedBiddingMatcher {
    params: BiddingParams,
}

impl WeightedBiddingMatcher {
    pub fn new(params: BiddingParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &BiddingParams {
        &self.params
    }

    /// Runs the auction, returning the matching and per-proposer satisfaction
    pub fn run(
        &self,
        weights: &WeightTable,
        budgets: &HashMap<String, f64>,
        capacities: &HashMap<String, f64>,
    ) -> Result<(MatchResult, SatisfactionScores), MatchError> {
        self.run_detailed(weights, budgets, capacities)
            .map(|outcome| (outcome.matching, outcome.satisfaction))
    }

    /// Runs the auction, also returning every award in order
    pub fn run_detailed(
        &self,
        weights: &WeightTable,
        budgets: &HashMap<String, f64>,
        capacities: &HashMap<String, f64>,
    ) -> Result<BiddingOutcome, MatchError> {
        check_normalization(&self.params.normalization)?;
        let budget = resolve_budgets(weights, budgets)?;
        let capacity = resolve_capacities(weights, capacities)?;

        let n_proposers = weights.proposers.len();
        let n_receivers = weights.receivers.len();

        let scores: Vec<Vec<f64>> = (0..n_proposers)
            .map(|p| {
                (0..n_receivers)
                    .map(|r| {
                        calculate_bid_score(
                            weights.proposer_weights[p][r],
                            weights.receiver_weights[r][p],
                            budget[p],
                            capacity[r],
                            &self.params.normalization,
                        )
                    })
                    .collect()
            })
            .collect();

        let smaller_side = n_proposers.min(n_receivers);
        let round_cap = match self.params.round_cap {
            Some(cap) if cap < smaller_side => {
                tracing::warn!(
                    "Round cap {} is below the smaller side ({}); some pairs may go unmatched",
                    cap,
                    smaller_side
                );
                cap
            }
            Some(cap) => cap,
            None => smaller_side,
        };

        let mut proposer_taken = vec![false; n_proposers];
        let mut receiver_taken = vec![false; n_receivers];
        let mut awards = Vec::new();

        for round in 1..=round_cap {
            let mut best: Option<(usize, usize, f64)> = None;
            for p in (0..n_proposers).filter(|&p| !proposer_taken[p]) {
                for r in (0..n_receivers).filter(|&r| !receiver_taken[r]) {
                    let score = scores[p][r];
                    if best.map_or(true, |(_, _, top)| score > top) {
                        best = Some((p, r, score));
                    }
                }
            }

            let Some((p, r, score)) = best else {
                break;
            };
            if score <= 0.0 {
                tracing::debug!("Best remaining bid scores {:.3}; stopping", score);
                break;
            }

            proposer_taken[p] = true;
            receiver_taken[r] = true;
            tracing::debug!(
                "Round {}: {} wins {} with score {:.3}",
                round,
                weights.proposers[p],
                weights.receivers[r],
                score
            );
            awards.push(BidAward {
                round,
                proposer: weights.proposers[p].clone(),
                receiver: weights.receivers[r].clone(),
                score,
            });
        }

        let engagements: BTreeMap<String, String> = awards
            .iter()
            .map(|a| (a.receiver.clone(), a.proposer.clone()))
            .collect();
        let unmatched: Vec<String> = weights
            .proposers
            .iter()
            .zip(&proposer_taken)
            .filter(|(_, taken)| !**taken)
            .map(|(name, _)| name.clone())
            .collect();

        let market_size = n_proposers + n_receivers;
        let mut satisfaction: SatisfactionScores = unmatched
            .iter()
            .map(|name| (name.clone(), 0.0))
            .collect();
        for award in &awards {
            let p = weights.proposer_index[&award.proposer];
            let r = weights.receiver_index[&award.receiver];
            satisfaction.insert(
                award.proposer.clone(),
                calculate_satisfaction(
                    weights.proposer_weights[p][r],
                    weights.receiver_weights[r][p],
                    market_size,
                ),
            );
        }

        tracing::info!(
            "Bidding finished: {} awards, {} proposers unmatched",
            awards.len(),
            unmatched.len()
        );

        Ok(BiddingOutcome {
            matching: MatchResult::new(engagements, unmatched),
            satisfaction,
            awards,
        })
    }
}

fn check_normalization(normalization: &ScoreNormalization) -> Result<(), MatchError> {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if valid(normalization.budget_max) && valid(normalization.capacity_max) {
        Ok(())
    } else {
        Err(MatchError::InvalidNormalization {
            budget_max: normalization.budget_max,
            capacity_max: normalization.capacity_max,
        })
    }
}

fn resolve_budgets(
    weights: &WeightTable,
    budgets: &HashMap<String, f64>,
) -> Result<Vec<f64>, MatchError> {
    weights
        .proposers
        .iter()
        .map(|name| {
            let value = *budgets.get(name).ok_or_else(|| MatchError::MissingBudget {
                participant: name.clone(),
            })?;
            if !value.is_finite() || value < 0.0 {
                return Err(MatchError::InvalidBudget {
                    participant: name.clone(),
                    value,
                });
            }
            Ok(value)
        })
        .collect()
}

fn resolve_capacities(
    weights: &WeightTable,
    capacities: &HashMap<String, f64>,
) -> Result<Vec<f64>, MatchError> {
    weights
        .receivers
        .iter()
        .map(|name| {
            let value = *capacities.get(name).ok_or_else(|| MatchError::MissingCapacity {
                participant: name.clone(),
            })?;
            if !value.is_finite() || value <= 0.0 {
                return Err(MatchError::InvalidCapacity {
                    participant: name.clone(),
                    value,
                });
            }
            Ok(value)
        })
        .collect()
}
