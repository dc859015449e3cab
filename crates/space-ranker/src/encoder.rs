//! Availability encoding -- converts a space's free intervals into one hour
//! bitmask per calendar day.
//!
//! Bit `h` of a day's mask is set when the space is free during hour `h`.
//! An interval covers hours `[start.hour, end.hour)`, extended through
//! `end.hour` when the end carries a sub-hour remainder (17:30 covers hour 17).
//! Overlapping intervals on the same day are unioned, so an hour is counted
//! at most once.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::ser::{Serialize, SerializeSeq, Serializer};
use tracing::debug;

use crate::error::{RankError, Result};
use crate::interval::{Interval, Space};

/// Default number of bits per day: one per hour.
pub const HOURS_PER_DAY: u8 = 24;

/// Fixed-width per-day availability, one bit per hour (1 = free).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DayBitmask {
    bits: u32,
    width: u8,
}

impl DayBitmask {
    /// An all-busy day of the given width.
    pub fn empty(width: u8) -> Self {
        Self { bits: 0, width }
    }

    /// Build a mask from a bit sequence, hour 0 first. Non-zero entries are free.
    pub fn from_bits(bits: &[u8]) -> Result<Self> {
        let width = validate_width(bits.len())?;
        let bits = bits
            .iter()
            .enumerate()
            .filter(|&(_, &b)| b != 0)
            .fold(0u32, |acc, (hour, _)| acc | (1 << hour));
        Ok(Self { bits, width })
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn is_free(&self, hour: u8) -> bool {
        hour < self.width && self.bits & (1 << hour) != 0
    }

    /// Mark hours `[from, to)` free. Callers guarantee `from < to <= width`.
    fn set_range(&mut self, from: u32, to: u32) {
        let span = (1u32 << (to - from)) - 1;
        self.bits |= span << from;
    }

    /// Bitwise OR of two masks.
    ///
    /// Only masks from one run meet here, and a run encodes every space with
    /// the same width.
    pub(crate) fn union(&self, other: &DayBitmask) -> DayBitmask {
        debug_assert_eq!(self.width, other.width, "day widths must match");
        DayBitmask {
            bits: self.bits | other.bits,
            width: self.width,
        }
    }

    /// Number of free hours in the day.
    pub fn free_hours(&self) -> u32 {
        self.bits.count_ones()
    }

    /// Number of maximal runs of consecutive free hours.
    ///
    /// `1,0,1,0,1,0,1,1,0` has 4 runs.
    pub fn free_blocks(&self) -> u32 {
        // A run starts wherever a free bit follows a busy bit (or hour 0).
        (self.bits & !(self.bits << 1)).count_ones()
    }

    /// The mask as a bit sequence, hour 0 first.
    pub fn to_bits(&self) -> Vec<u8> {
        (0..self.width).map(|h| u8::from(self.is_free(h))).collect()
    }
}

impl Serialize for DayBitmask {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.width as usize))?;
        for hour in 0..self.width {
            seq.serialize_element(&u8::from(self.is_free(hour)))?;
        }
        seq.end()
    }
}

/// Per-date availability. A date missing from the map is an all-busy day.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize)]
pub struct Availability {
    pub days: BTreeMap<NaiveDate, DayBitmask>,
}

impl Availability {
    /// Date-wise OR of two availabilities encoded with the same day width.
    pub(crate) fn union(&self, other: &Availability) -> Availability {
        let mut days = self.days.clone();
        for (date, mask) in &other.days {
            match days.entry(*date) {
                Entry::Occupied(mut slot) => {
                    let merged = slot.get().union(mask);
                    slot.insert(merged);
                }
                Entry::Vacant(slot) => {
                    slot.insert(*mask);
                }
            }
        }
        Availability { days }
    }

    /// Sum of free hours across all dates.
    pub fn free_hours(&self) -> u32 {
        self.days.values().map(DayBitmask::free_hours).sum()
    }

    /// Sum of free runs across all dates.
    pub fn free_blocks(&self) -> u32 {
        self.days.values().map(DayBitmask::free_blocks).sum()
    }
}

/// A space after encoding. Immutable once built.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct EncodedSpace {
    pub id: String,
    pub cancellable: bool,
    pub availability: Availability,
    pub total_free_hours: u32,
}

/// Hour span `[from, to)` of one validated interval on `date`.
struct HourSpan {
    date: NaiveDate,
    from: u32,
    to: u32,
}

/// Encode one space's intervals into per-day bitmasks.
///
/// # Errors
/// Returns `RankError::InvalidConfig` if `width` is not in `1..=24`.
/// Returns `RankError::InvalidInterval` if an interval ends at or before its
/// start, or crosses into another day (ending exactly at the next midnight is
/// allowed).
/// Returns `RankError::Range` if an interval touches an hour at or beyond `width`.
pub fn encode_space(space: &Space, width: u8) -> Result<EncodedSpace> {
    validate_width(width as usize)?;

    // Reject every malformed interval before touching any bitmask.
    let spans = space
        .intervals
        .iter()
        .map(|interval| hour_span(&space.id, interval, width))
        .collect::<Result<Vec<_>>>()?;

    // Pre-size the date map from the known dates, then populate it.
    let mut days: BTreeMap<NaiveDate, DayBitmask> = spans
        .iter()
        .map(|span| (span.date, DayBitmask::empty(width)))
        .collect();
    for span in &spans {
        if let Some(mask) = days.get_mut(&span.date) {
            mask.set_range(span.from, span.to);
        }
    }

    let availability = Availability { days };
    let total_free_hours = availability.free_hours();
    debug!(
        space = %space.id,
        intervals = space.intervals.len(),
        dates = availability.days.len(),
        total_free_hours,
        "encoded space"
    );

    Ok(EncodedSpace {
        id: space.id.clone(),
        cancellable: space.cancellable,
        availability,
        total_free_hours,
    })
}

/// Encode every space, keyed by identifier.
///
/// # Errors
/// Fails on the first space that fails [`encode_space`], or with
/// `RankError::InvalidConfig` if two spaces share an identifier.
pub fn encode_spaces(spaces: &[Space], width: u8) -> Result<BTreeMap<String, EncodedSpace>> {
    let mut encoded = BTreeMap::new();
    for space in spaces {
        let enc = encode_space(space, width)?;
        if encoded.insert(space.id.clone(), enc).is_some() {
            return Err(RankError::InvalidConfig(format!(
                "duplicate space id '{}'",
                space.id
            )));
        }
    }
    Ok(encoded)
}

fn hour_span(space: &str, interval: &Interval, width: u8) -> Result<HourSpan> {
    let Interval { start, end } = *interval;
    let date = start.date();
    let invalid = |message: String| RankError::InvalidInterval {
        space: space.to_string(),
        date,
        message,
    };

    if end <= start {
        return Err(invalid(format!("end {} is not after start {}", end, start)));
    }

    let to = if end.date() == date {
        end.hour() + u32::from(has_sub_hour_remainder(&end))
    } else if Some(end.date()) == date.succ_opt() && !has_time_of_day(&end) {
        // Ending exactly at the next midnight means "through the last hour".
        24
    } else {
        return Err(invalid(format!("end {} is not on the same day as start {}", end, start)));
    };
    let from = start.hour();

    if to > u32::from(width) {
        return Err(RankError::Range {
            space: space.to_string(),
            date,
            hour: to - 1,
            width,
        });
    }

    Ok(HourSpan { date, from, to })
}

fn has_sub_hour_remainder(ts: &NaiveDateTime) -> bool {
    ts.minute() != 0 || ts.second() != 0 || ts.nanosecond() != 0
}

fn has_time_of_day(ts: &NaiveDateTime) -> bool {
    ts.hour() != 0 || has_sub_hour_remainder(ts)
}

fn validate_width(width: usize) -> Result<u8> {
    match u8::try_from(width) {
        Ok(w) if (1..=HOURS_PER_DAY).contains(&w) => Ok(w),
        _ => Err(RankError::InvalidConfig(format!(
            "day width must be in 1..={}, got {}",
            HOURS_PER_DAY, width
        ))),
    }
}
