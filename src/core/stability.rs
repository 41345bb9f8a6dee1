use std::collections::{HashMap, HashSet};

use crate::core::{error::MatchError, preferences::PreferenceTable};
use crate::models::{BlockingPair, MatchResult, Side};

/// A two-sided preference relation a matching can be checked against
pub trait PreferenceOrder {
    /// Proposers in canonical order
    fn proposer_names(&self) -> &[String];

    /// Receivers in canonical order
    fn receiver_names(&self) -> &[String];

    /// Whether `proposer` strictly prefers `candidate` over `current`
    fn proposer_prefers(
        &self,
        proposer: &str,
        candidate: &str,
        current: &str,
    ) -> Result<bool, MatchError>;

    /// Whether `receiver` strictly prefers `candidate` over `current`
    fn receiver_prefers(
        &self,
        receiver: &str,
        candidate: &str,
        current: &str,
    ) -> Result<bool, MatchError>;
}

impl PreferenceOrder for PreferenceTable {
    fn proposer_names(&self) -> &[String] {
        self.proposers()
    }

    fn receiver_names(&self) -> &[String] {
        self.receivers()
    }

    fn proposer_prefers(
        &self,
        proposer: &str,
        candidate: &str,
        current: &str,
    ) -> Result<bool, MatchError> {
        Ok(self.proposer_rank(proposer, candidate)? < self.proposer_rank(proposer, current)?)
    }

    fn receiver_prefers(
        &self,
        receiver: &str,
        candidate: &str,
        current: &str,
    ) -> Result<bool, MatchError> {
        Ok(self.receiver_rank(receiver, candidate)? < self.receiver_rank(receiver, current)?)
    }
}

/// Lists every blocking pair of `matching` under `preferences`
///
/// The matching is read as-is: partners are recomputed from its engagement
/// table, never taken from a matcher's internal state. Pairs come out in
/// proposer-then-receiver canonical order. Unmatched participants prefer
/// any partner to none.
pub fn blocking_pairs<P>(
    matching: &MatchResult,
    preferences: &P,
) -> Result<Vec<BlockingPair>, MatchError>
where
    P: PreferenceOrder + ?Sized,
{
    let proposer_partner = validate_matching(matching, preferences)?;
    let mut blocking = Vec::new();

    for proposer in preferences.proposer_names() {
        let current = proposer_partner.get(proposer.as_str()).copied();

        for receiver in preferences.receiver_names() {
            if current == Some(receiver.as_str()) {
                continue;
            }

            let proposer_wants = match current {
                None => true,
                Some(held) => preferences.proposer_prefers(proposer, receiver, held)?,
            };
            if !proposer_wants {
                continue;
            }

            let receiver_wants = match matching.partner_of_receiver(receiver) {
                None => true,
                Some(held) => preferences.receiver_prefers(receiver, proposer, held)?,
            };

            if receiver_wants {
                blocking.push(BlockingPair {
                    proposer: proposer.clone(),
                    receiver: receiver.clone(),
                });
            }
        }
    }

    if !blocking.is_empty() {
        tracing::debug!("Found {} blocking pairs", blocking.len());
    }

    Ok(blocking)
}

/// True when `matching` has no blocking pair under `preferences`
pub fn is_stable<P>(matching: &MatchResult, preferences: &P) -> Result<bool, MatchError>
where
    P: PreferenceOrder + ?Sized,
{
    Ok(blocking_pairs(matching, preferences)?.is_empty())
}

/// Checks names against the market and rebuilds proposer -> receiver
fn validate_matching<'a, P>(
    matching: &'a MatchResult,
    preferences: &P,
) -> Result<HashMap<&'a str, &'a str>, MatchError>
where
    P: PreferenceOrder + ?Sized,
{
    let proposers: HashSet<&str> = preferences
        .proposer_names()
        .iter()
        .map(String::as_str)
        .collect();
    let receivers: HashSet<&str> = preferences
        .receiver_names()
        .iter()
        .map(String::as_str)
        .collect();

    let mut proposer_partner = HashMap::with_capacity(matching.len());

    for (receiver, proposer) in &matching.engagements {
        if !receivers.contains(receiver.as_str()) {
            return Err(MatchError::unknown(Side::Receiver, receiver));
        }
        if !proposers.contains(proposer.as_str()) {
            return Err(MatchError::unknown(Side::Proposer, proposer));
        }
        if let Some(other) = proposer_partner.insert(proposer.as_str(), receiver.as_str()) {
            return Err(MatchError::InvalidMatching(format!(
                "{} is matched to both {} and {}",
                proposer, other, receiver
            )));
        }
    }

    Ok(proposer_partner)
}
