use crate::models::Side;
use thiserror::Error;

/// Precondition violations raised while building or running a matching market
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    #[error("Unknown {side}: {name}")]
    UnknownParticipant { side: Side, name: String },

    #[error("Duplicate {side}: {name}")]
    DuplicateParticipant { side: Side, name: String },

    #[error("Participant {name} appears on both sides")]
    OverlappingSides { name: String },

    #[error("{side} {participant} has no preference entry for {missing}")]
    MissingPreference {
        side: Side,
        participant: String,
        missing: String,
    },

    #[error("{side} {participant} lists {entry} more than once")]
    DuplicatePreference {
        side: Side,
        participant: String,
        entry: String,
    },

    #[error("{side} {participant} lists {entry}, which is not on the opposite side")]
    UnexpectedPreference {
        side: Side,
        participant: String,
        entry: String,
    },

    #[error("{side} {participant} gives {entry} rank {rank}, expected a distinct rank in 1..={max}")]
    InvalidRank {
        side: Side,
        participant: String,
        entry: String,
        rank: u32,
        max: usize,
    },

    #[error("Unbalanced sides: {proposers} proposers vs {receivers} receivers")]
    UnbalancedSides { proposers: usize, receivers: usize },

    #[error("{side} {participant} has invalid weight {weight} for {entry}")]
    InvalidWeight {
        side: Side,
        participant: String,
        entry: String,
        weight: i64,
    },

    #[error("Proposer {participant} has no budget")]
    MissingBudget { participant: String },

    #[error("Receiver {participant} has no capacity")]
    MissingCapacity { participant: String },

    #[error("Proposer {participant} has invalid budget {value}")]
    InvalidBudget { participant: String, value: f64 },

    #[error("Receiver {participant} has invalid capacity {value}")]
    InvalidCapacity { participant: String, value: f64 },

    #[error("Invalid score normalization: budget_max {budget_max}, capacity_max {capacity_max}")]
    InvalidNormalization { budget_max: f64, capacity_max: f64 },

    #[error("Invalid matching: {0}")]
    InvalidMatching(String),
}

impl MatchError {
    pub(crate) fn unknown(side: Side, name: &str) -> Self {
        MatchError::UnknownParticipant {
            side,
            name: name.to_string(),
        }
    }
}
