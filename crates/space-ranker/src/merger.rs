//! Merge the encoded availability of a combination's member spaces.
//!
//! For every date any member has data for, the members' day bitmasks are
//! OR-ed together (a member without that date contributes an all-busy day).
//! OR is associative and commutative, so the result depends only on the set
//! of members, never on the order they were merged in.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::combinations::CombinationKey;
use crate::encoder::{Availability, EncodedSpace};
use crate::error::{RankError, Result};

/// A non-empty subset of spaces treated as one bookable unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Combination {
    pub key: CombinationKey,
    /// Date-wise OR of the members' bitmasks.
    pub availability: Availability,
    /// Free hours in the merged availability.
    pub total_time_range: u32,
    pub num_spaces: usize,
    pub num_cancellable_spaces: usize,
    /// `num_cancellable_spaces / num_spaces`.
    pub cancellable_percentage: f64,
    /// Runs of consecutive free hours across all merged days.
    pub free_blocks: u32,
    /// Sorted identifiers of the cancellable members.
    pub cancellable_spaces: Vec<String>,
}

impl Combination {
    fn from_parts(
        key: CombinationKey,
        availability: Availability,
        cancellable_spaces: Vec<String>,
    ) -> Self {
        let num_spaces = key.len();
        let num_cancellable_spaces = cancellable_spaces.len();
        Combination {
            total_time_range: availability.free_hours(),
            free_blocks: availability.free_blocks(),
            cancellable_percentage: num_cancellable_spaces as f64 / num_spaces as f64,
            key,
            availability,
            num_spaces,
            num_cancellable_spaces,
            cancellable_spaces,
        }
    }

    /// Merge two combinations into the combination of all their members.
    ///
    /// Shared members are counted once: `{A,B} ∪ {B,C}` is `{A,B,C}`.
    /// Both combinations must come from the same run (same day width).
    pub fn union(&self, other: &Combination) -> Combination {
        let key = CombinationKey::new(
            self.key
                .members()
                .iter()
                .chain(other.key.members())
                .cloned(),
        );
        let mut cancellable: Vec<String> = self
            .cancellable_spaces
            .iter()
            .chain(&other.cancellable_spaces)
            .cloned()
            .collect();
        cancellable.sort();
        cancellable.dedup();

        Combination::from_parts(
            key,
            self.availability.union(&other.availability),
            cancellable,
        )
    }
}

/// Merge the member spaces of `key` into a single [`Combination`].
///
/// # Errors
/// Returns `RankError::UnknownSpace` if a member has no encoded space.
/// Returns `RankError::InvalidConfig` if `key` is empty.
pub fn merge_combination(
    key: &CombinationKey,
    encoded: &BTreeMap<String, EncodedSpace>,
) -> Result<Combination> {
    let members = key
        .members()
        .iter()
        .map(|id| {
            encoded
                .get(id)
                .ok_or_else(|| RankError::UnknownSpace(id.clone()))
        })
        .collect::<Result<Vec<_>>>()?;

    let (first, rest) = members
        .split_first()
        .ok_or_else(|| RankError::InvalidConfig("empty combination".to_string()))?;

    // A singleton is just its own availability.
    let availability = rest.iter().fold(first.availability.clone(), |acc, space| {
        acc.union(&space.availability)
    });
    let cancellable_spaces = members
        .iter()
        .filter(|space| space.cancellable)
        .map(|space| space.id.clone())
        .collect();

    Ok(Combination::from_parts(
        key.clone(),
        availability,
        cancellable_spaces,
    ))
}

/// Merge every combination in `keys`, preserving their order.
pub fn merge_all(
    keys: &[CombinationKey],
    encoded: &BTreeMap<String, EncodedSpace>,
) -> Result<Vec<Combination>> {
    let merged = keys
        .iter()
        .map(|key| merge_combination(key, encoded))
        .collect::<Result<Vec<_>>>()?;
    debug!(combinations = merged.len(), "merged combinations");
    Ok(merged)
}
