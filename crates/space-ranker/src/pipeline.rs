//! The full run: encode → enumerate → merge → rank.

use serde::Serialize;
use tracing::{debug, info};

use crate::combinations::space_combinations;
use crate::config::{RankerConfig, RankingMethod};
use crate::encoder::encode_spaces;
use crate::error::{RankError, Result};
use crate::interval::Space;
use crate::merger::{merge_all, Combination};
use crate::scoring::{deviation_stats, rank_combinations, DeviationStats, ScoredCombination, Weights};
use crate::topsis::rank_topsis;
use crate::tuning::entropy_weights;

/// Result of a ranking run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranking {
    pub method: RankingMethod,
    pub target_hours: f64,
    /// The weights actually used (entropy weights when requested).
    pub weights: Weights,
    /// `None` when there are no combinations.
    pub stats: Option<DeviationStats>,
    /// Best first.
    pub combinations: Vec<ScoredCombination>,
}

/// Rank every non-empty combination of `spaces` according to `config`.
///
/// Any error aborts the whole run; no partial ranking is returned.
///
/// # Errors
/// Returns `RankError::TooManySpaces` if `spaces` exceeds `config.max_spaces`,
/// plus any error from configuration validation, encoding, merging or scoring.
pub fn run(spaces: &[Space], config: &RankerConfig) -> Result<Ranking> {
    config.validate()?;
    let combinations = combine(spaces, config)?;
    let stats = deviation_stats(&combinations);

    let weights = if config.entropy_weights && !combinations.is_empty() {
        entropy_weights(&combinations, config.target_hours)?
    } else {
        config.weights
    };

    let ranked = match config.method {
        RankingMethod::Heuristic => rank_combinations(combinations, config.target_hours, &weights)?,
        RankingMethod::Topsis => rank_topsis(combinations, config.target_hours, &weights)?,
    };

    info!(
        method = %config.method,
        spaces = spaces.len(),
        combinations = ranked.len(),
        "ranking complete"
    );

    Ok(Ranking {
        method: config.method,
        target_hours: config.target_hours,
        weights,
        stats,
        combinations: ranked,
    })
}

/// Entropy-method weights for every combination of `spaces`.
///
/// Only the target, day width and space limit of `config` are used.
///
/// # Errors
/// Returns `RankError::TooManySpaces` if `spaces` exceeds `config.max_spaces`,
/// `RankError::InsufficientData` for fewer than two combinations, plus any
/// configuration, encoding or merging error.
pub fn tune(spaces: &[Space], config: &RankerConfig) -> Result<Weights> {
    config.validate_bounds()?;
    let combinations = combine(spaces, config)?;
    entropy_weights(&combinations, config.target_hours)
}

/// Encode, enumerate and merge, refusing inputs beyond `max_spaces` before
/// any subset is generated.
fn combine(spaces: &[Space], config: &RankerConfig) -> Result<Vec<Combination>> {
    if spaces.len() > config.max_spaces {
        return Err(RankError::TooManySpaces {
            count: spaces.len(),
            max: config.max_spaces,
        });
    }

    let encoded = encode_spaces(spaces, config.day_width)?;
    let keys = space_combinations(&encoded.keys().collect::<Vec<_>>());
    debug!(spaces = encoded.len(), combinations = keys.len(), "enumerated combinations");

    merge_all(&keys, &encoded)
}
