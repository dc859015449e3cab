//! # space-ranker
//!
//! Hourly availability encoding and weighted ranking of bookable space
//! combinations.
//!
//! Each space's reservation-free intervals are encoded into one bitmask per
//! calendar day (one bit per hour). Every non-empty subset of spaces is then
//! merged into a single combined availability, and the subsets are ranked by
//! how closely their total free time matches a target, penalised by how many
//! spaces (and cancellable spaces) they tie up.
//!
//! ## Modules
//!
//! - [`interval`] — Input model: spaces and their free intervals
//! - [`encoder`] — Intervals → per-day hour bitmasks
//! - [`combinations`] — Enumerate every non-empty subset of spaces
//! - [`merger`] — OR member bitmasks together, aggregate subset metadata
//! - [`scoring`] — z-score deviation and the weighted heuristic ranking
//! - [`tuning`] — Entropy-method criteria weights
//! - [`topsis`] — TOPSIS closeness ranking
//! - [`config`] — Ranking configuration (TOML)
//! - [`input`] — JSON space-file loading
//! - [`pipeline`] — Encoder → Generator → Merger → Scoring in one call
//! - [`error`] — Error types

pub mod combinations;
pub mod config;
pub mod encoder;
pub mod error;
pub mod input;
pub mod interval;
pub mod merger;
pub mod pipeline;
pub mod scoring;
pub mod topsis;
pub mod tuning;

pub use combinations::{space_combinations, CombinationKey};
pub use config::{RankerConfig, RankingMethod};
pub use encoder::{encode_space, encode_spaces, Availability, DayBitmask, EncodedSpace};
pub use error::RankError;
pub use interval::{Interval, Space};
pub use merger::{merge_all, merge_combination, Combination};
pub use pipeline::{run, tune, Ranking};
pub use scoring::{rank_combinations, DeviationStats, ScoredCombination, Weights};
