use crate::core::preferences::PreferenceTable;

/// Per-proposer cursor over its own best-first preference list
///
/// `cursor[p]` counts how many candidates `p` has already approached.
/// Cursors only move forward and never exceed the list length.
#[derive(Debug, Clone)]
pub struct ProposalScheduler {
    cursors: Vec<usize>,
    limit: usize,
}

impl ProposalScheduler {
    /// Fresh scheduler with every cursor at 0
    pub fn new(table: &PreferenceTable) -> Self {
        Self {
            cursors: vec![0; table.proposer_count()],
            limit: table.receiver_count(),
        }
    }

    pub fn cursor(&self, proposer: usize) -> usize {
        self.cursors[proposer]
    }

    pub fn has_remaining(&self, proposer: usize) -> bool {
        self.cursors[proposer] < self.limit
    }

    /// Returns the next receiver for `proposer` and advances its cursor.
    ///
    /// The cursor moves whatever the outcome of the proposal turns out to be.
    pub fn next_candidate(&mut self, table: &PreferenceTable, proposer: usize) -> Option<usize> {
        let position = self.cursors[proposer];
        let receiver = table.choice(proposer, position)?;
        self.cursors[proposer] = position + 1;
        Some(receiver)
    }

    pub fn reset(&mut self) {
        self.cursors.iter_mut().for_each(|c| *c = 0);
    }
}
