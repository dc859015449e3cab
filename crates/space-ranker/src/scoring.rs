//! Score and rank combinations against a target total time span.
//!
//! Each combination's deviation from the target is measured as a z-score
//! against the population standard deviation of `total_time_range` across
//! all combinations, then blended with the space counts:
//!
//! - `z > 0`: `1 / (w_cancel * cancellable + w_spaces * spaces + w_dev * z)`
//! - `z <= 0`: `(w_dev * z) / (w_cancel * cancellable + w_spaces * spaces)`
//!
//! The two branches are deliberately asymmetric. Output is sorted by score
//! descending, ties broken by ascending [`CombinationKey`].

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::combinations::CombinationKey;
use crate::error::{RankError, Result};
use crate::merger::Combination;

/// Criteria weights. They need not sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    /// Weight of the z-score deviation from the target.
    pub deviation: f64,
    /// Weight of the number of spaces.
    pub spaces: f64,
    /// Weight of the number of cancellable spaces.
    pub cancellable: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            deviation: 0.1,
            spaces: 0.3,
            cancellable: 0.6,
        }
    }
}

impl Weights {
    pub fn new(deviation: f64, spaces: f64, cancellable: f64) -> Self {
        Self {
            deviation,
            spaces,
            cancellable,
        }
    }

    /// Every weight finite and non-negative, and not all of them zero.
    pub fn validate(&self) -> Result<()> {
        let all = [self.deviation, self.spaces, self.cancellable];
        if all.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(RankError::InvalidWeights(format!(
                "weights must be finite and non-negative, got {}",
                self
            )));
        }
        if all.iter().all(|w| *w == 0.0) {
            return Err(RankError::InvalidWeights("all weights are zero".to_string()));
        }
        Ok(())
    }

    /// [`validate`](Self::validate), plus the heuristic's denominator guard:
    /// `spaces` and `cancellable` may not both be zero.
    pub fn validate_heuristic(&self) -> Result<()> {
        self.validate()?;
        if self.spaces == 0.0 && self.cancellable == 0.0 {
            return Err(RankError::InvalidWeights(
                "space and cancellable weights are both zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl std::fmt::Display for Weights {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "deviation={}, spaces={}, cancellable={}",
            self.deviation, self.spaces, self.cancellable
        )
    }
}

/// Population statistics of `total_time_range` across combinations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DeviationStats {
    pub mean: f64,
    pub std_dev: f64,
}

/// A combination with its z-score and final score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCombination {
    pub combination: Combination,
    pub z_score: f64,
    pub score: f64,
}

impl ScoredCombination {
    pub fn key(&self) -> &CombinationKey {
        &self.combination.key
    }
}

/// Mean and population standard deviation of `total_time_range`.
///
/// Returns `None` for an empty slice.
pub fn deviation_stats(combinations: &[Combination]) -> Option<DeviationStats> {
    if combinations.is_empty() {
        return None;
    }
    let n = combinations.len() as f64;
    let mean = combinations
        .iter()
        .map(|c| f64::from(c.total_time_range))
        .sum::<f64>()
        / n;
    let variance = combinations
        .iter()
        .map(|c| (f64::from(c.total_time_range) - mean).powi(2))
        .sum::<f64>()
        / n;
    Some(DeviationStats {
        mean,
        std_dev: variance.sqrt(),
    })
}

/// z-score of every combination against `target`, in input order.
///
/// When the standard deviation is zero every z-score is 0.
pub fn z_scores(combinations: &[Combination], target: f64) -> Vec<f64> {
    let Some(stats) = deviation_stats(combinations) else {
        return Vec::new();
    };
    if stats.std_dev == 0.0 {
        warn!(
            combinations = combinations.len(),
            "zero standard deviation in total time range, all z-scores are 0"
        );
        return vec![0.0; combinations.len()];
    }
    combinations
        .iter()
        .map(|c| (f64::from(c.total_time_range) - target) / stats.std_dev)
        .collect()
}

/// Denominator of the score formula for the branch `z` selects.
///
/// Weights that pass [`Weights::validate_heuristic`] can still make this zero
/// for a particular combination (e.g. `spaces = 0` and no cancellable member).
pub fn score_denominator(
    z: f64,
    num_spaces: usize,
    num_cancellable_spaces: usize,
    weights: &Weights,
) -> f64 {
    let base = weights.cancellable * num_cancellable_spaces as f64
        + weights.spaces * num_spaces as f64;
    if z > 0.0 {
        base + weights.deviation * z
    } else {
        base
    }
}

/// Heuristic score of one combination.
///
/// Callers must have checked that [`score_denominator`] is non-zero;
/// [`rank_combinations`] does.
pub fn score(z: f64, num_spaces: usize, num_cancellable_spaces: usize, weights: &Weights) -> f64 {
    let denominator = score_denominator(z, num_spaces, num_cancellable_spaces, weights);
    if z > 0.0 {
        1.0 / denominator
    } else {
        (weights.deviation * z) / denominator
    }
}

/// Score every combination and sort by score descending.
///
/// # Errors
/// Returns `RankError::InvalidConfig` if `target` is not a positive number.
/// Returns `RankError::InvalidWeights` if the weights fail
/// [`Weights::validate_heuristic`], or if they leave the score denominator of
/// any combination at zero. No partial ranking is returned.
pub fn rank_combinations(
    combinations: Vec<Combination>,
    target: f64,
    weights: &Weights,
) -> Result<Vec<ScoredCombination>> {
    validate_target(target)?;
    weights.validate_heuristic()?;

    let zs = z_scores(&combinations, target);
    for (combination, &z) in combinations.iter().zip(&zs) {
        let denominator = score_denominator(
            z,
            combination.num_spaces,
            combination.num_cancellable_spaces,
            weights,
        );
        if denominator == 0.0 {
            return Err(RankError::InvalidWeights(format!(
                "weights ({}) give combination {} a zero score denominator",
                weights, combination.key
            )));
        }
    }

    let mut scored: Vec<ScoredCombination> = combinations
        .into_iter()
        .zip(zs)
        .map(|(combination, z_score)| ScoredCombination {
            score: score(
                z_score,
                combination.num_spaces,
                combination.num_cancellable_spaces,
                weights,
            ),
            combination,
            z_score,
        })
        .collect();

    sort_scored(&mut scored);
    debug!(combinations = scored.len(), target, %weights, "ranked combinations");
    Ok(scored)
}

pub(crate) fn validate_target(target: f64) -> Result<()> {
    if target.is_finite() && target > 0.0 {
        Ok(())
    } else {
        Err(RankError::InvalidConfig(format!(
            "target time span must be a positive number, got {}",
            target
        )))
    }
}

/// Score descending, then key ascending.
pub(crate) fn sort_scored(scored: &mut [ScoredCombination]) {
    scored.sort_by(by_score_then_key);
}

fn by_score_then_key(a: &ScoredCombination, b: &ScoredCombination) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.combination.key.cmp(&b.combination.key))
}
