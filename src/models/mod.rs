// Model exports
pub mod dataset;
pub mod domain;
pub mod report;

pub use dataset::{
    BidderEntry, BiddingDataset, BiddingMarket, Dataset, DatasetError, PreferenceDataset,
    PreferenceEntry, ReceiverEntry,
};
pub use domain::{
    BidAward, BiddingOutcome, BiddingParams, BlockingPair, MatchResult, ProposalEvent,
    ProposalLog, SatisfactionScores, ScoreNormalization, Side,
};
pub use report::{BiddingReport, MatchReport, StableReport};
