//! Ranking configuration, loadable from TOML.
//!
//! ```toml
//! target_hours = 102.0
//! entropy_weights = false
//! method = "heuristic"
//! day_width = 24
//! max_spaces = 16
//!
//! [weights]
//! deviation = 0.1
//! spaces = 0.3
//! cancellable = 0.6
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::encoder::HOURS_PER_DAY;
use crate::error::{RankError, Result};
use crate::scoring::{validate_target, Weights};

/// How combinations are scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankingMethod {
    /// z-score deviation blended with space counts.
    #[default]
    Heuristic,
    /// Closeness to the ideal solution over the same criteria.
    Topsis,
}

impl FromStr for RankingMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "heuristic" => Ok(RankingMethod::Heuristic),
            "topsis" => Ok(RankingMethod::Topsis),
            other => Err(format!(
                "unknown ranking method '{}'. Available methods: heuristic, topsis",
                other
            )),
        }
    }
}

impl fmt::Display for RankingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankingMethod::Heuristic => f.write_str("heuristic"),
            RankingMethod::Topsis => f.write_str("topsis"),
        }
    }
}

/// Parameters of one ranking run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RankerConfig {
    /// Goal total free hours for a combination.
    pub target_hours: f64,
    pub weights: Weights,
    /// Replace `weights` with entropy-method weights computed from the data.
    pub entropy_weights: bool,
    pub method: RankingMethod,
    /// Bits per day bitmask.
    pub day_width: u8,
    /// Upper bound on input spaces; combinations grow as `2^n - 1`.
    pub max_spaces: usize,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            target_hours: 8.0,
            weights: Weights::default(),
            entropy_weights: false,
            method: RankingMethod::Heuristic,
            day_width: HOURS_PER_DAY,
            max_spaces: 16,
        }
    }
}

impl RankerConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: RankerConfig = toml::from_str(s)?;
        Ok(config)
    }

    /// Check every field before a run starts.
    pub fn validate(&self) -> Result<()> {
        self.validate_bounds()?;
        // Entropy weights are computed later and validated then.
        if !self.entropy_weights {
            match self.method {
                RankingMethod::Heuristic => self.weights.validate_heuristic()?,
                RankingMethod::Topsis => self.weights.validate()?,
            }
        }
        Ok(())
    }

    /// Check the target, day width and space limit, ignoring the weights.
    pub fn validate_bounds(&self) -> Result<()> {
        validate_target(self.target_hours)?;
        if self.day_width == 0 || self.day_width > HOURS_PER_DAY {
            return Err(RankError::InvalidConfig(format!(
                "day_width must be in 1..={}, got {}",
                HOURS_PER_DAY, self.day_width
            )));
        }
        if self.max_spaces == 0 {
            return Err(RankError::InvalidConfig(
                "max_spaces must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
