use std::collections::BTreeMap;

use crate::core::preferences::PreferenceTable;
use crate::models::MatchResult;

/// Mutable engagement table of one matching run
///
/// `holder[r]` is the proposer receiver `r` currently holds and
/// `partner[p]` mirrors it from the proposer side, so a proposer can never
/// be held by two receivers at once.
#[derive(Debug, Clone)]
pub struct MatchingState {
    holder: Vec<Option<usize>>,
    partner: Vec<Option<usize>>,
}

impl MatchingState {
    pub fn new(proposers: usize, receivers: usize) -> Self {
        Self {
            holder: vec![None; receivers],
            partner: vec![None; proposers],
        }
    }

    pub fn holder_of(&self, receiver: usize) -> Option<usize> {
        self.holder[receiver]
    }

    pub fn partner_of(&self, proposer: usize) -> Option<usize> {
        self.partner[proposer]
    }

    pub fn is_engaged(&self, proposer: usize) -> bool {
        self.partner[proposer].is_some()
    }

    /// Engages `proposer` with `receiver`, returning the proposer it displaced
    ///
    /// A proposer already engaged elsewhere releases its previous receiver first.
    pub fn engage(&mut self, proposer: usize, receiver: usize) -> Option<usize> {
        if let Some(previous) = self.partner[proposer].take() {
            self.holder[previous] = None;
        }

        let displaced = self.holder[receiver].replace(proposer);
        if let Some(previous) = displaced {
            self.partner[previous] = None;
        }
        self.partner[proposer] = Some(receiver);
        displaced
    }

    pub fn engaged_pairs(&self) -> usize {
        self.holder.iter().filter(|h| h.is_some()).count()
    }

    /// Converts the table into a named [`MatchResult`]
    pub fn into_result(self, table: &PreferenceTable) -> MatchResult {
        let engagements: BTreeMap<String, String> = self
            .holder
            .iter()
            .enumerate()
            .filter_map(|(r, holder)| {
                holder.map(|p| (table.receivers()[r].clone(), table.proposers()[p].clone()))
            })
            .collect();

        let unmatched = self
            .partner
            .iter()
            .enumerate()
            .filter(|(_, partner)| partner.is_none())
            .map(|(p, _)| table.proposers()[p].clone())
            .collect();

        MatchResult::new(engagements, unmatched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engage_free_receiver() {
        let mut state = MatchingState::new(2, 2);

        assert_eq!(state.engage(0, 1), None);
        assert_eq!(state.holder_of(1), Some(0));
        assert_eq!(state.partner_of(0), Some(1));
        assert!(state.is_engaged(0));
        assert!(!state.is_engaged(1));
    }

    #[test]
    fn test_engage_displaces_previous_holder() {
        let mut state = MatchingState::new(2, 1);
        state.engage(0, 0);

        assert_eq!(state.engage(1, 0), Some(0));
        assert!(!state.is_engaged(0));
        assert_eq!(state.holder_of(0), Some(1));
        assert_eq!(state.engaged_pairs(), 1);
    }

    #[test]
    fn test_reengaging_proposer_releases_old_receiver() {
        let mut state = MatchingState::new(1, 2);
        state.engage(0, 0);

        assert_eq!(state.engage(0, 1), None);
        assert_eq!(state.holder_of(0), None);
        assert_eq!(state.holder_of(1), Some(0));
        assert_eq!(state.partner_of(0), Some(1));
        assert_eq!(state.engaged_pairs(), 1);
    }
}
