/// Core data types for the riverwatch service.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no I/O, only types and their text forms.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Reading types
// ---------------------------------------------------------------------------

/// One time-series sample as delivered by a river source.
///
/// Field names vary by source, so a reading stays an untyped JSON object.
/// Key order is the payload order (serde_json `preserve_order`), which key
/// inference relies on.
pub type Reading = Map<String, Value>;

/// Direction in which a source lists its samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesOrder {
    /// Chronological; the last element is the latest sample.
    #[default]
    OldestFirst,
    /// The first element is the latest sample (riverlevels.uk does this).
    NewestFirst,
}

/// Explicit field names for a station. Any field left `None` is inferred
/// from the latest sample at load time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct FieldMapping {
    pub value_key: Option<String>,
    pub time_key: Option<String>,
}

/// A river-level station: static configuration, not derived data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Station {
    pub id: String,
    pub name: String,
    pub url: String,
    pub fields: FieldMapping,
    pub order: SeriesOrder,
}

/// One point of the chart series. `value` is `None` where the level did not
/// coerce to a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: Option<f64>,
}

/// Latest level as read off the most recent sample.
#[derive(Debug, Clone, PartialEq)]
pub enum LevelValue {
    Numeric(f64),
    /// Coercion failed; the raw field text is kept unmodified.
    Raw(String),
    /// The sample has no value field at all.
    Missing,
}

/// Qualitative direction derived from the last two readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    Rising,
    Falling,
    Steady,
    Unknown,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trend::Rising => write!(f, "Rising"),
            Trend::Falling => write!(f, "Falling"),
            Trend::Steady => write!(f, "Steady"),
            Trend::Unknown => write!(f, "Trend unknown"),
        }
    }
}

/// One entry of the tide list (`{title, time}` in the tide payload).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TideEntry {
    #[serde(default)]
    pub title: Option<Value>,
    #[serde(default)]
    pub time: Option<Value>,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when fetching or interpreting tide/river payloads.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadingError {
    /// Non-2xx HTTP response from a source.
    HttpError(u16),
    /// The request could not be sent or the body could not be read.
    Network(String),
    /// The response body was not the JSON we expected.
    ParseError(String),
    /// No array was found at the top level or under a known series field.
    UnrecognizedFormat,
    /// The series array was present but empty.
    NoReadings,
    /// A level field did not coerce to a number.
    NumericCoercion { key: String, raw: String },
    /// A station id that is not in the registry.
    UnknownStation(String),
}

impl ReadingError {
    /// True for the fetch/JSON failure class: the whole panel shows an
    /// error placeholder.
    pub fn is_network_or_parse(&self) -> bool {
        matches!(
            self,
            ReadingError::HttpError(_) | ReadingError::Network(_) | ReadingError::ParseError(_)
        )
    }
}

impl std::fmt::Display for ReadingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadingError::HttpError(code) => write!(f, "HTTP error: {}", code),
            ReadingError::Network(msg) => write!(f, "Network error: {}", msg),
            ReadingError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ReadingError::UnrecognizedFormat => {
                write!(f, "Unrecognized format: no readings/data/series/levels array")
            }
            ReadingError::NoReadings => write!(f, "No readings in series"),
            ReadingError::NumericCoercion { key, raw } => {
                write!(f, "Field '{}' is not numeric: {}", key, raw)
            }
            ReadingError::UnknownStation(id) => write!(f, "Unknown station: {}", id),
        }
    }
}

impl std::error::Error for ReadingError {}
