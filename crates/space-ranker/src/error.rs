//! Error types for space-ranker operations.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RankError {
    /// An interval whose end is not after its start, or that spans dates.
    #[error("Invalid interval for space '{space}' on {date}: {message}")]
    InvalidInterval {
        space: String,
        date: NaiveDate,
        message: String,
    },

    /// An interval touching hours outside the configured day width.
    #[error("Hour {hour} out of range [0, {width}) for space '{space}' on {date}")]
    Range {
        space: String,
        date: NaiveDate,
        hour: u32,
        width: u8,
    },

    #[error("Invalid weights: {0}")]
    InvalidWeights(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown space: {0}")]
    UnknownSpace(String),

    #[error("Too many spaces: {count} exceeds the limit of {max}")]
    TooManySpaces { count: usize, max: usize },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Input parse error: {0}")]
    Input(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, RankError>;
