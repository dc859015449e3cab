//! Entropy-method criteria weights.
//!
//! Derives [`Weights`] from how much each criterion varies across the
//! combinations: a criterion whose values are spread unevenly carries more
//! information and gets a larger weight. The criteria are the distance
//! `|total_time_range - target|`, the number of spaces, and the number of
//! cancellable spaces.

use tracing::debug;

use crate::error::{RankError, Result};
use crate::merger::Combination;
use crate::scoring::{validate_target, Weights};

/// Number of ranking criteria (distance, spaces, cancellable).
pub const CRITERIA: usize = 3;

/// One decision-matrix row per combination: `[distance, spaces, cancellable]`.
pub fn decision_matrix(combinations: &[Combination], target: f64) -> Vec<[f64; CRITERIA]> {
    combinations
        .iter()
        .map(|c| {
            [
                (f64::from(c.total_time_range) - target).abs(),
                c.num_spaces as f64,
                c.num_cancellable_spaces as f64,
            ]
        })
        .collect()
}

/// Compute criteria weights with the entropy method.
///
/// Zero cells contribute no entropy. If every criterion is perfectly uniform
/// the weights are split evenly.
///
/// # Errors
/// Returns `RankError::InsufficientData` for fewer than two combinations.
/// Returns `RankError::InvalidConfig` if `target` is not a positive number.
pub fn entropy_weights(combinations: &[Combination], target: f64) -> Result<Weights> {
    validate_target(target)?;
    if combinations.len() < 2 {
        return Err(RankError::InsufficientData(format!(
            "entropy weights need at least 2 combinations, got {}",
            combinations.len()
        )));
    }

    let matrix = decision_matrix(combinations, target);
    let k = 1.0 / (matrix.len() as f64).ln();

    let mut divergence = [0.0; CRITERIA];
    for (j, d) in divergence.iter_mut().enumerate() {
        let column_sum: f64 = matrix.iter().map(|row| row[j]).sum();
        let entropy: f64 = matrix
            .iter()
            .filter(|row| row[j] != 0.0)
            .map(|row| {
                let p = row[j] / column_sum;
                -k * p * p.ln()
            })
            .sum();
        *d = 1.0 - entropy;
    }

    let total: f64 = divergence.iter().sum();
    let [deviation, spaces, cancellable] = if total > 0.0 {
        divergence.map(|d| d / total)
    } else {
        [1.0 / CRITERIA as f64; CRITERIA]
    };

    let weights = Weights::new(deviation, spaces, cancellable);
    debug!(%weights, combinations = combinations.len(), "entropy weights");
    Ok(weights)
}
