//! Load spaces from JSON.
//!
//! The document is an object keyed by space identifier:
//!
//! ```json
//! {
//!   "A1": {
//!     "cancellable": true,
//!     "available_dates": [
//!       { "start": "2026-03-16T09:00:00", "end": "2026-03-16T14:00:00" }
//!     ]
//!   }
//! }
//! ```

use serde::Deserialize;
use serde_json::Map;

use crate::error::Result;
use crate::interval::{Interval, Space};

#[derive(Debug, Deserialize)]
struct SpaceRecord {
    #[serde(default)]
    cancellable: bool,
    #[serde(default)]
    available_dates: Vec<Interval>,
}

/// Parse a spaces document, keeping the document's key order.
pub fn parse_spaces(json: &str) -> Result<Vec<Space>> {
    let records: Map<String, serde_json::Value> = serde_json::from_str(json)?;
    records
        .into_iter()
        .map(|(id, value)| -> Result<Space> {
            let record: SpaceRecord = serde_json::from_value(value)?;
            Ok(Space::new(id, record.cancellable, record.available_dates))
        })
        .collect()
}
