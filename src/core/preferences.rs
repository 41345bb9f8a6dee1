use std::collections::{HashMap, HashSet};

use crate::core::error::MatchError;
use crate::models::Side;

/// Strict preference orders for both sides of the market
///
/// Every participant ranks every member of the opposite side exactly once,
/// 1 = most preferred. Tables are only produced by [`PreferenceTableBuilder`],
/// so a built table never has missing, duplicate or tied ranks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceTable {
    proposers: Vec<String>,
    receivers: Vec<String>,
    proposer_index: HashMap<String, usize>,
    receiver_index: HashMap<String, usize>,
    /// `proposer_ranks[p][r]` is the rank `p` gives `r`
    proposer_ranks: Vec<Vec<u32>>,
    /// `receiver_ranks[r][p]` is the rank `r` gives `p`
    receiver_ranks: Vec<Vec<u32>>,
    /// `proposer_order[p][k]` is the receiver `p` ranks `k + 1`
    proposer_order: Vec<Vec<usize>>,
}

impl PreferenceTable {
    pub fn builder() -> PreferenceTableBuilder {
        PreferenceTableBuilder::default()
    }

    /// Proposers in canonical (insertion) order
    pub fn proposers(&self) -> &[String] {
        &self.proposers
    }

    /// Receivers in canonical (insertion) order
    pub fn receivers(&self) -> &[String] {
        &self.receivers
    }

    pub fn proposer_count(&self) -> usize {
        self.proposers.len()
    }

    pub fn receiver_count(&self) -> usize {
        self.receivers.len()
    }

    pub fn is_balanced(&self) -> bool {
        self.proposers.len() == self.receivers.len()
    }

    /// Rank `proposer` gives `receiver`
    pub fn proposer_rank(&self, proposer: &str, receiver: &str) -> Result<u32, MatchError> {
        let p = self.require(Side::Proposer, proposer)?;
        let r = self.require(Side::Receiver, receiver)?;
        Ok(self.proposer_ranks[p][r])
    }

    /// Rank `receiver` gives `proposer`
    pub fn receiver_rank(&self, receiver: &str, proposer: &str) -> Result<u32, MatchError> {
        let r = self.require(Side::Receiver, receiver)?;
        let p = self.require(Side::Proposer, proposer)?;
        Ok(self.receiver_ranks[r][p])
    }

    /// Best-first preference list of a proposer
    pub fn proposer_preferences(&self, proposer: &str) -> Result<Vec<&str>, MatchError> {
        let p = self.require(Side::Proposer, proposer)?;
        Ok(self.proposer_order[p]
            .iter()
            .map(|&r| self.receivers[r].as_str())
            .collect())
    }

    /// Best-first preference list of a receiver
    pub fn receiver_preferences(&self, receiver: &str) -> Result<Vec<&str>, MatchError> {
        let r = self.require(Side::Receiver, receiver)?;
        Ok(order_from_ranks(&self.receiver_ranks[r])
            .into_iter()
            .map(|p| self.proposers[p].as_str())
            .collect())
    }

    /// Exchanges the ranks `proposer` gives `a` and `b`
    pub fn swap_proposer_preferences(
        &mut self,
        proposer: &str,
        a: &str,
        b: &str,
    ) -> Result<(), MatchError> {
        let p = self.require(Side::Proposer, proposer)?;
        let ra = self.require(Side::Receiver, a)?;
        let rb = self.require(Side::Receiver, b)?;

        self.proposer_ranks[p].swap(ra, rb);
        self.proposer_order[p] = order_from_ranks(&self.proposer_ranks[p]);
        Ok(())
    }

    /// Exchanges the ranks `receiver` gives `a` and `b`
    pub fn swap_receiver_preferences(
        &mut self,
        receiver: &str,
        a: &str,
        b: &str,
    ) -> Result<(), MatchError> {
        let r = self.require(Side::Receiver, receiver)?;
        let pa = self.require(Side::Proposer, a)?;
        let pb = self.require(Side::Proposer, b)?;

        self.receiver_ranks[r].swap(pa, pb);
        Ok(())
    }

    pub(crate) fn proposer_idx(&self, name: &str) -> Option<usize> {
        self.proposer_index.get(name).copied()
    }

    pub(crate) fn receiver_idx(&self, name: &str) -> Option<usize> {
        self.receiver_index.get(name).copied()
    }

    /// Receiver a proposer ranks `position + 1`, if any
    #[inline]
    pub(crate) fn choice(&self, proposer: usize, position: usize) -> Option<usize> {
        self.proposer_order[proposer].get(position).copied()
    }

    #[inline]
    pub(crate) fn receiver_rank_of(&self, receiver: usize, proposer: usize) -> u32 {
        self.receiver_ranks[receiver][proposer]
    }

    fn require(&self, side: Side, name: &str) -> Result<usize, MatchError> {
        let index = match side {
            Side::Proposer => self.proposer_idx(name),
            Side::Receiver => self.receiver_idx(name),
        };
        index.ok_or_else(|| MatchError::unknown(side, name))
    }
}

/// Preference input for one participant
#[derive(Debug, Clone)]
enum PreferenceInput {
    /// Best-first list of opposite-side names
    Ordered(Vec<String>),
    /// Explicit `(name, rank)` entries
    Ranked(Vec<(String, u32)>),
}

#[derive(Debug, Clone)]
struct PendingSwap {
    side: Side,
    participant: String,
    a: String,
    b: String,
}

/// Validated entry point for building a [`PreferenceTable`]
///
/// The order of `proposer`/`receiver` calls fixes each side's canonical order.
#[derive(Debug, Clone, Default)]
pub struct PreferenceTableBuilder {
    proposers: Vec<(String, PreferenceInput)>,
    receivers: Vec<(String, PreferenceInput)>,
    swaps: Vec<PendingSwap>,
}

impl PreferenceTableBuilder {
    /// Adds a proposer with a best-first list of receivers
    pub fn proposer<I, S>(mut self, name: impl Into<String>, preferences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list = preferences.into_iter().map(Into::into).collect();
        self.proposers
            .push((name.into(), PreferenceInput::Ordered(list)));
        self
    }

    /// Adds a receiver with a best-first list of proposers
    pub fn receiver<I, S>(mut self, name: impl Into<String>, preferences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list = preferences.into_iter().map(Into::into).collect();
        self.receivers
            .push((name.into(), PreferenceInput::Ordered(list)));
        self
    }

    /// Adds a proposer with explicit ranks (1 = best) for each receiver
    pub fn proposer_ranks<I, S>(mut self, name: impl Into<String>, ranks: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let ranks = ranks.into_iter().map(|(s, r)| (s.into(), r)).collect();
        self.proposers
            .push((name.into(), PreferenceInput::Ranked(ranks)));
        self
    }

    /// Adds a receiver with explicit ranks (1 = best) for each proposer
    pub fn receiver_ranks<I, S>(mut self, name: impl Into<String>, ranks: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let ranks = ranks.into_iter().map(|(s, r)| (s.into(), r)).collect();
        self.receivers
            .push((name.into(), PreferenceInput::Ranked(ranks)));
        self
    }

    /// Swaps two entries of a proposer's ranking once the table is built
    pub fn swap_proposer_preferences(
        mut self,
        proposer: impl Into<String>,
        a: impl Into<String>,
        b: impl Into<String>,
    ) -> Self {
        self.swaps.push(PendingSwap {
            side: Side::Proposer,
            participant: proposer.into(),
            a: a.into(),
            b: b.into(),
        });
        self
    }

    /// Swaps two entries of a receiver's ranking once the table is built
    pub fn swap_receiver_preferences(
        mut self,
        receiver: impl Into<String>,
        a: impl Into<String>,
        b: impl Into<String>,
    ) -> Self {
        self.swaps.push(PendingSwap {
            side: Side::Receiver,
            participant: receiver.into(),
            a: a.into(),
            b: b.into(),
        });
        self
    }

    pub fn build(self) -> Result<PreferenceTable, MatchError> {
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

        let proposer_ranks = self
            .proposers
            .iter()
            .map(|(name, input)| {
                resolve_ranks(Side::Proposer, name, input, &receivers, &receiver_index)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let receiver_ranks = self
            .receivers
            .iter()
            .map(|(name, input)| {
                resolve_ranks(Side::Receiver, name, input, &proposers, &proposer_index)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let proposer_order = proposer_ranks.iter().map(|r| order_from_ranks(r)).collect();

        let mut table = PreferenceTable {
            proposers,
            receivers,
            proposer_index,
            receiver_index,
            proposer_ranks,
            receiver_ranks,
            proposer_order,
        };

        for swap in &self.swaps {
            match swap.side {
                Side::Proposer => {
                    table.swap_proposer_preferences(&swap.participant, &swap.a, &swap.b)?
                }
                Side::Receiver => {
                    table.swap_receiver_preferences(&swap.participant, &swap.a, &swap.b)?
                }
            }
        }

        Ok(table)
    }
}

/// Maps each name of one side to its canonical position, rejecting repeats
pub(crate) fn index_side<'a, I>(side: Side, names: I) -> Result<HashMap<String, usize>, MatchError>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut index = HashMap::new();
    for (i, name) in names.into_iter().enumerate() {
        if index.insert(name.clone(), i).is_some() {
            return Err(MatchError::DuplicateParticipant {
                side,
                name: name.clone(),
            });
        }
    }
    Ok(index)
}

/// Turns one participant's input into a dense rank vector over the opposite side
fn resolve_ranks(
    side: Side,
    participant: &str,
    input: &PreferenceInput,
    opposite: &[String],
    opposite_index: &HashMap<String, usize>,
) -> Result<Vec<u32>, MatchError> {
    let n = opposite.len();
    // 0 marks "not ranked yet"
    let mut ranks = vec![0u32; n];

    let lookup = |entry: &str| {
        opposite_index
            .get(entry)
            .copied()
            .ok_or_else(|| MatchError::UnexpectedPreference {
                side,
                participant: participant.to_string(),
                entry: entry.to_string(),
            })
    };
    let duplicate = |entry: &str| MatchError::DuplicatePreference {
        side,
        participant: participant.to_string(),
        entry: entry.to_string(),
    };

    match input {
        PreferenceInput::Ordered(list) => {
            for (position, entry) in list.iter().enumerate() {
                let idx = lookup(entry.as_str())?;
                if ranks[idx] != 0 {
                    return Err(duplicate(entry.as_str()));
                }
                ranks[idx] = position as u32 + 1;
            }
        }
        PreferenceInput::Ranked(entries) => {
            let mut used = HashSet::with_capacity(entries.len());
            for (entry, rank) in entries {
                let idx = lookup(entry.as_str())?;
                if ranks[idx] != 0 {
                    return Err(duplicate(entry.as_str()));
                }
                if *rank == 0 || *rank as usize > n || !used.insert(*rank) {
                    return Err(MatchError::InvalidRank {
                        side,
                        participant: participant.to_string(),
                        entry: entry.clone(),
                        rank: *rank,
                        max: n,
                    });
                }
                ranks[idx] = *rank;
            }
        }
    }

    if let Some(missing) = ranks.iter().position(|&r| r == 0) {
        return Err(MatchError::MissingPreference {
            side,
            participant: participant.to_string(),
            missing: opposite[missing].clone(),
        });
    }

    Ok(ranks)
}

/// Inverts a dense permutation of ranks into a best-first index list
fn order_from_ranks(ranks: &[u32]) -> Vec<usize> {
    let mut order = vec![0usize; ranks.len()];
    for (idx, &rank) in ranks.iter().enumerate() {
        order[rank as usize - 1] = idx;
    }
    order
}
