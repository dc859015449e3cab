//! Enumerate every non-empty subset of a set of spaces.

use std::fmt;

use serde::Serialize;

/// Canonical identifier of a space combination: the sorted, deduplicated
/// member identifiers. Keys order lexicographically, member by member.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CombinationKey(Vec<String>);

impl CombinationKey {
    /// Build a canonical key. Member order and duplicates do not matter.
    pub fn new<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ids: Vec<String> = members.into_iter().map(Into::into).collect();
        ids.sort();
        ids.dedup();
        Self(ids)
    }

    pub fn members(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.binary_search_by(|m| m.as_str().cmp(id)).is_ok()
    }
}

impl fmt::Display for CombinationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0.join(", "))
    }
}

/// All `2^n - 1` non-empty subsets of `ids`.
///
/// Identifiers are deduplicated first. Subsets come out by ascending size,
/// and within a size in lexicographic order of member positions. An empty
/// input yields an empty result.
pub fn space_combinations<S: AsRef<str>>(ids: &[S]) -> Vec<CombinationKey> {
    let mut pool: Vec<&str> = ids.iter().map(AsRef::as_ref).collect();
    pool.sort_unstable();
    pool.dedup();

    let n = pool.len();
    let mut out = Vec::new();
    for size in 1..=n {
        // Indices of the current subset, always strictly increasing.
        let mut indices: Vec<usize> = (0..size).collect();
        loop {
            out.push(CombinationKey(
                indices.iter().map(|&i| pool[i].to_string()).collect(),
            ));

            // Find the rightmost index that can still advance.
            let Some(pos) = (0..size).rev().find(|&i| indices[i] != i + n - size) else {
                break;
            };
            indices[pos] += 1;
            for i in pos + 1..size {
                indices[i] = indices[i - 1] + 1;
            }
        }
    }
    out
}
