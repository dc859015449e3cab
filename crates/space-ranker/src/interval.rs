//! Input model: bookable spaces and the intervals during which they are free.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// A free interval on a single calendar day, in local wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    #[serde(deserialize_with = "wall_clock")]
    pub start: NaiveDateTime,
    #[serde(deserialize_with = "wall_clock")]
    pub end: NaiveDateTime,
}

impl Interval {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }
}

/// A bookable resource with its availability schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Space {
    /// Unique identifier (e.g., "A1").
    pub id: String,
    /// Whether the space can be released after booking.
    #[serde(default)]
    pub cancellable: bool,
    /// Free intervals, each within one calendar day.
    #[serde(default, rename = "available_dates")]
    pub intervals: Vec<Interval>,
}

impl Space {
    pub fn new(id: impl Into<String>, cancellable: bool, intervals: Vec<Interval>) -> Self {
        Self {
            id: id.into(),
            cancellable,
            intervals,
        }
    }
}

/// Accept both naive ISO-8601 timestamps and RFC 3339 timestamps with an
/// offset. The offset is dropped: bitmasks are keyed by local wall-clock hour.
fn wall_clock<'de, D>(deserializer: D) -> std::result::Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(naive) = raw.parse::<NaiveDateTime>() {
        return Ok(naive);
    }
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.naive_local())
        .map_err(|e| serde::de::Error::custom(format!("invalid timestamp '{}': {}", raw, e)))
}
