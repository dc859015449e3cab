//! TOPSIS ranking (Technique for Order of Preference by Similarity to Ideal
//! Solution).
//!
//! Every criterion of the decision matrix is a cost: fewer hours off target,
//! fewer spaces and fewer cancellable spaces are all better. A combination's
//! score is its relative closeness to the ideal solution, in `[0, 1]`.

use tracing::debug;

use crate::error::Result;
use crate::merger::Combination;
use crate::scoring::{sort_scored, validate_target, ScoredCombination, Weights};
use crate::tuning::{decision_matrix, CRITERIA};

/// Rank combinations by TOPSIS closeness, highest first.
///
/// The `z_score` of each result is left at 0; TOPSIS does not use it.
///
/// # Errors
/// Returns `RankError::InvalidConfig` if `target` is not a positive number.
/// Returns `RankError::InvalidWeights` if the weights fail [`Weights::validate`].
pub fn rank_topsis(
    combinations: Vec<Combination>,
    target: f64,
    weights: &Weights,
) -> Result<Vec<ScoredCombination>> {
    validate_target(target)?;
    weights.validate()?;

    let closeness = closeness(&decision_matrix(&combinations, target), weights);
    let mut scored: Vec<ScoredCombination> = combinations
        .into_iter()
        .zip(closeness)
        .map(|(combination, score)| ScoredCombination {
            combination,
            z_score: 0.0,
            score,
        })
        .collect();

    sort_scored(&mut scored);
    debug!(combinations = scored.len(), %weights, "ranked combinations by TOPSIS");
    Ok(scored)
}

/// Relative closeness of each row to the ideal solution.
fn closeness(matrix: &[[f64; CRITERIA]], weights: &Weights) -> Vec<f64> {
    let w = [weights.deviation, weights.spaces, weights.cancellable];

    // Vector normalisation, then weighting. A zero column stays zero.
    let mut norms = [0.0; CRITERIA];
    for (j, norm) in norms.iter_mut().enumerate() {
        *norm = matrix.iter().map(|row| row[j] * row[j]).sum::<f64>().sqrt();
    }
    let weighted: Vec<[f64; CRITERIA]> = matrix
        .iter()
        .map(|row| {
            std::array::from_fn(|j| {
                if norms[j] == 0.0 {
                    0.0
                } else {
                    row[j] / norms[j] * w[j]
                }
            })
        })
        .collect();

    // Cost criteria: the ideal is the column minimum, the anti-ideal the maximum.
    let best: [f64; CRITERIA] = std::array::from_fn(|j| {
        weighted.iter().map(|row| row[j]).fold(f64::INFINITY, f64::min)
    });
    let worst: [f64; CRITERIA] = std::array::from_fn(|j| {
        weighted.iter().map(|row| row[j]).fold(f64::NEG_INFINITY, f64::max)
    });

    weighted
        .iter()
        .map(|row| {
            let to_best = distance(row, &best);
            let to_worst = distance(row, &worst);
            if to_best + to_worst == 0.0 {
                0.5
            } else {
                to_worst / (to_best + to_worst)
            }
        })
        .collect()
}

fn distance(a: &[f64; CRITERIA], b: &[f64; CRITERIA]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}
