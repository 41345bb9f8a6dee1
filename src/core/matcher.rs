use std::collections::BTreeSet;

use crate::core::{
    error::MatchError,
    preferences::PreferenceTable,
    scheduler::ProposalScheduler,
    state::MatchingState,
};
use crate::models::{MatchResult, ProposalEvent, ProposalLog};

/// Proposer-optimal deferred acceptance (Gale-Shapley)
///
/// # Loop
/// 1. Take the first free proposer (canonical order) that still has candidates
/// 2. Propose to the next receiver on its list, advancing its cursor
/// 3. A free receiver accepts; an engaged receiver keeps whichever of the
///    two proposers it ranks better and frees the other
///
/// Every iteration advances one cursor, so a run makes at most
/// `|proposers| * |receivers|` proposals. Each run starts from fresh
/// cursors and an empty engagement table.
#[derive(Debug, Clone, Default)]
pub struct StableMatcher {
    require_balanced_sides: bool,
}

impl StableMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject tables whose sides differ in size instead of leaving
    /// surplus proposers unmatched
    pub fn require_balanced_sides(mut self, required: bool) -> Self {
        self.require_balanced_sides = required;
        self
    }

    /// Runs deferred acceptance and returns the final engagement table
    pub fn run(&self, table: &PreferenceTable) -> Result<MatchResult, MatchError> {
        self.run_logged(table).map(|(result, _)| result)
    }

    /// Runs deferred acceptance, also returning every proposal in order
    pub fn run_logged(
        &self,
        table: &PreferenceTable,
    ) -> Result<(MatchResult, ProposalLog), MatchError> {
        if self.require_balanced_sides && !table.is_balanced() {
            return Err(MatchError::UnbalancedSides {
                proposers: table.proposer_count(),
                receivers: table.receiver_count(),
            });
        }

        let mut scheduler = ProposalScheduler::new(table);
        let mut state = MatchingState::new(table.proposer_count(), table.receiver_count());
        let mut log = ProposalLog::default();
        let mut free: BTreeSet<usize> = (0..table.proposer_count()).collect();

        while let Some(proposer) = free.pop_first() {
            let name = &table.proposers()[proposer];

            let Some(receiver) = scheduler.next_candidate(table, proposer) else {
                tracing::debug!("{} exhausted its preference list", name);
                log.push(ProposalEvent::Exhausted {
                    proposer: name.clone(),
                });
                continue;
            };
            let receiver_name = &table.receivers()[receiver];

            let event = match state.holder_of(receiver) {
                None => {
                    state.engage(proposer, receiver);
                    tracing::debug!("{} proposes to {}: accepted", name, receiver_name);
                    ProposalEvent::Accepted {
                        proposer: name.clone(),
                        receiver: receiver_name.clone(),
                    }
                }
                Some(current)
                    if table.receiver_rank_of(receiver, proposer)
                        < table.receiver_rank_of(receiver, current) =>
                {
                    state.engage(proposer, receiver);
                    free.insert(current);
                    let displaced = &table.proposers()[current];
                    tracing::debug!(
                        "{} proposes to {}: accepted, {} released",
                        name,
                        receiver_name,
                        displaced
                    );
                    ProposalEvent::Displaced {
                        proposer: name.clone(),
                        receiver: receiver_name.clone(),
                        displaced: displaced.clone(),
                    }
                }
                Some(current) => {
                    free.insert(proposer);
                    let holder = &table.proposers()[current];
                    tracing::debug!(
                        "{} proposes to {}: rejected, {} kept",
                        name,
                        receiver_name,
                        holder
                    );
                    ProposalEvent::Rejected {
                        proposer: name.clone(),
                        receiver: receiver_name.clone(),
                        holder: holder.clone(),
                    }
                }
            };
            log.push(event);
        }

        tracing::info!(
            "Deferred acceptance finished: {} pairs, {} proposals",
            state.engaged_pairs(),
            log.proposals()
        );

        Ok((state.into_result(table), log))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_by_three() -> PreferenceTable {
        PreferenceTable::builder()
            .proposer("A", ["X", "Y", "Z"])
            .proposer("B", ["X", "Z", "Y"])
            .proposer("C", ["Y", "X", "Z"])
            .receiver("X", ["B", "A", "C"])
            .receiver("Y", ["A", "C", "B"])
            .receiver("Z", ["A", "B", "C"])
            .build()
            .unwrap()
    }

    #[test]
    fn test_run_resolves_conflicts() {
        let result = StableMatcher::new().run(&three_by_three()).unwrap();

        assert!(result.contains_pair("B", "X"));
        assert!(result.contains_pair("A", "Y"));
        assert!(result.contains_pair("C", "Z"));
        assert!(result.unmatched.is_empty());
    }

    #[test]
    fn test_proposal_sequence_follows_canonical_order() {
        let (_, log) = StableMatcher::new().run_logged(&three_by_three()).unwrap();

        let accepted = |p: &str, r: &str| ProposalEvent::Accepted {
            proposer: p.to_string(),
            receiver: r.to_string(),
        };
        let rejected = |p: &str, r: &str, h: &str| ProposalEvent::Rejected {
            proposer: p.to_string(),
            receiver: r.to_string(),
            holder: h.to_string(),
        };

        assert_eq!(
            log.events,
            vec![
                accepted("A", "X"),
                ProposalEvent::Displaced {
                    proposer: "B".to_string(),
                    receiver: "X".to_string(),
                    displaced: "A".to_string(),
                },
                accepted("A", "Y"),
                rejected("C", "Y", "A"),
                rejected("C", "X", "B"),
                accepted("C", "Z"),
            ]
        );
        assert_eq!(log.proposals(), 6);
    }

    #[test]
    fn test_surplus_proposer_left_unmatched() {
        let table = PreferenceTable::builder()
            .proposer("A", ["X"])
            .proposer("B", ["X"])
            .receiver("X", ["B", "A"])
            .build()
            .unwrap();

        let (result, log) = StableMatcher::new().run_logged(&table).unwrap();

        assert!(result.contains_pair("B", "X"));
        assert_eq!(result.unmatched, vec!["A".to_string()]);
        assert_eq!(
            log.events.last(),
            Some(&ProposalEvent::Exhausted {
                proposer: "A".to_string()
            })
        );
    }

    #[test]
    fn test_balanced_sides_can_be_required() {
        let table = PreferenceTable::builder()
            .proposer("A", ["X"])
            .proposer("B", ["X"])
            .receiver("X", ["B", "A"])
            .build()
            .unwrap();

        let err = StableMatcher::new()
            .require_balanced_sides(true)
            .run(&table)
            .unwrap_err();

        assert_eq!(
            err,
            MatchError::UnbalancedSides {
                proposers: 2,
                receivers: 1
            }
        );
    }

    #[test]
    fn test_empty_market() {
        let table = PreferenceTable::builder().build().unwrap();
        let result = StableMatcher::new().run(&table).unwrap();

        assert!(result.is_empty());
        assert!(result.unmatched.is_empty());
    }
}
