//! Search, sort and data-generation utilities used around the matching core.
//!
//! None of these touch matching state; they are standalone procedures with
//! their own pre/post-conditions, documented per function.

pub mod generate;
pub mod search;
pub mod sort;

pub use generate::{
    mark_faulty_from, non_uniform_stations, participant_names, random_bidding_dataset,
    random_preference_dataset, random_preference_table, sequential_stations,
};
pub use search::{
    first_faulty_binary, first_faulty_linear, interpolation_search, Keyed, SearchOutcome,
    Station,
};
pub use sort::{bucket_sort, is_sorted};
