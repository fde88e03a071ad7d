/// River-level payload interpreter.
///
/// River sources return JSON of no fixed shape. `interpret` finds the
/// reading list, works out which field holds the level and which the
/// timestamp, and reduces the series to the latest level, latest time, a
/// trend against the previous sample, and a chart projection.
///
/// Key inference runs once per load against the latest sample only. Any
/// key set in the station's `FieldMapping` replaces the inferred one.

use serde::Serialize;
use serde_json::Value;

use crate::analysis::trend;
use crate::model::{ChartPoint, FieldMapping, LevelValue, Reading, ReadingError, SeriesOrder, Trend};

/// Object properties searched for the reading list, in priority order.
pub const SERIES_FIELDS: &[&str] = &["readings", "data", "series", "levels"];

/// Key fragments (matched against lowercased key names).
const VALUE_KEY_HINTS: &[&str] = &["level", "value"];
const TIME_KEY_HINTS: &[&str] = &["time", "date"];

// ---------------------------------------------------------------------------
// Payload shape
// ---------------------------------------------------------------------------

/// The known shapes of a river payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PayloadShape<'a> {
    /// The payload itself is the reading list.
    BareArray(&'a [Value]),
    /// The reading list sits under one of `SERIES_FIELDS`.
    Keyed { field: &'static str, items: &'a [Value] },
    Unrecognized,
}

impl<'a> PayloadShape<'a> {
    /// Classifies a payload. First match wins; a series field holding
    /// something other than an array does not match.
    pub fn locate(payload: &'a Value) -> Self {
        match payload {
            Value::Array(items) => PayloadShape::BareArray(items),
            Value::Object(map) => SERIES_FIELDS
                .iter()
                .find_map(|&field| match map.get(field) {
                    Some(Value::Array(items)) => Some(PayloadShape::Keyed { field, items }),
                    _ => None,
                })
                .unwrap_or(PayloadShape::Unrecognized),
            _ => PayloadShape::Unrecognized,
        }
    }

    pub fn items(&self) -> Result<&'a [Value], ReadingError> {
        match *self {
            PayloadShape::BareArray(items) => Ok(items),
            PayloadShape::Keyed { items, .. } => Ok(items),
            PayloadShape::Unrecognized => Err(ReadingError::UnrecognizedFormat),
        }
    }

    /// Name of the property the list was found under, if any.
    pub fn field(&self) -> Option<&'static str> {
        match *self {
            PayloadShape::Keyed { field, .. } => Some(field),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Key inference
// ---------------------------------------------------------------------------

/// The field names used to read every sample of one load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldKeys {
    pub value_key: Option<String>,
    pub time_key: Option<String>,
}

fn key_names(reading: &Reading) -> Vec<&str> {
    reading.keys().map(String::as_str).collect()
}

/// Keys of one sample in payload order; empty for a non-object sample.
fn reading_keys(sample: &Value) -> Vec<&str> {
    sample.as_object().map(key_names).unwrap_or_default()
}

fn find_key(keys: &[&str], hints: &[&str]) -> Option<String> {
    keys.iter()
        .find(|key| {
            let lower = key.to_lowercase();
            hints.iter().any(|hint| lower.contains(hint))
        })
        .map(|key| key.to_string())
}

/// Guesses the level and timestamp keys from one sample.
///
/// Level: first key containing "level" or "value", else the second key.
/// Time: first key containing "time" or "date", else the first key.
pub fn infer_keys(sample: &Value) -> FieldKeys {
    let keys = reading_keys(sample);

    let value_key = find_key(&keys, VALUE_KEY_HINTS).or_else(|| keys.get(1).map(|k| k.to_string()));
    let time_key = find_key(&keys, TIME_KEY_HINTS).or_else(|| keys.first().map(|k| k.to_string()));

    FieldKeys { value_key, time_key }
}

/// Applies a station's explicit mapping over the inferred keys.
pub fn resolve_keys(mapping: &FieldMapping, sample: &Value) -> FieldKeys {
    let inferred = infer_keys(sample);
    FieldKeys {
        value_key: mapping.value_key.clone().or(inferred.value_key),
        time_key: mapping.time_key.clone().or(inferred.time_key),
    }
}

// ---------------------------------------------------------------------------
// Field access and coercion
// ---------------------------------------------------------------------------

fn field<'v>(sample: &'v Value, key: Option<&str>) -> Option<&'v Value> {
    key.and_then(|k| sample.get(k))
}

/// Text form of a field as it should appear on screen: strings unquoted,
/// everything else as its JSON text.
pub fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Coerces a level field to a number.
///
/// Numbers pass through. Strings are trimmed and must parse as a finite
/// float. Anything else does not coerce.
pub fn coerce_level(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
        }
        _ => None,
    }
}

/// Numeric level of one sample under `key`.
pub fn level_at(sample: &Value, key: Option<&str>) -> Result<f64, ReadingError> {
    let raw = field(sample, key);
    raw.and_then(coerce_level)
        .ok_or_else(|| ReadingError::NumericCoercion {
            key: key.unwrap_or_default().to_string(),
            raw: raw.map(display_text).unwrap_or_default(),
        })
}

// ---------------------------------------------------------------------------
// Interpretation
// ---------------------------------------------------------------------------

/// Everything the river panel needs from one load.
#[derive(Debug, Clone, PartialEq)]
pub struct RiverSummary {
    /// Property the list was found under; `None` for a bare array.
    pub source_field: Option<&'static str>,
    pub keys: FieldKeys,
    pub latest_level: LevelValue,
    pub latest_time: Option<String>,
    pub trend: Trend,
    /// Chronological chart projection, one point per sample.
    pub series: Vec<ChartPoint>,
}

/// Interprets a parsed river payload.
///
/// # Errors
/// - `ReadingError::UnrecognizedFormat` - no reading list found.
/// - `ReadingError::NoReadings` - the list is empty.
///
/// A non-numeric level is not an error here: it shows up as
/// `LevelValue::Raw` and an unknown trend.
pub fn interpret(
    payload: &Value,
    mapping: &FieldMapping,
    order: SeriesOrder,
) -> Result<RiverSummary, ReadingError> {
    let shape = PayloadShape::locate(payload);
    let items = shape.items()?;

    let ordered: Vec<&Value> = match order {
        SeriesOrder::OldestFirst => items.iter().collect(),
        SeriesOrder::NewestFirst => items.iter().rev().collect(),
    };

    let latest = *ordered.last().ok_or(ReadingError::NoReadings)?;
    let keys = resolve_keys(mapping, latest);
    let value_key = keys.value_key.as_deref();
    let time_key = keys.time_key.as_deref();

    let latest_level = match field(latest, value_key) {
        None => LevelValue::Missing,
        Some(raw) => match level_at(latest, value_key) {
            Ok(level) => LevelValue::Numeric(level),
            Err(e) => {
                tracing::debug!("latest sample: {}", e);
                LevelValue::Raw(display_text(raw))
            }
        },
    };
    let latest_time = field(latest, time_key).map(display_text);

    let levels: Vec<Option<f64>> = ordered
        .iter()
        .map(|sample| level_at(sample, value_key).ok())
        .collect();

    let series = ordered
        .iter()
        .zip(&levels)
        .map(|(sample, level)| ChartPoint {
            label: field(sample, time_key).map(display_text).unwrap_or_default(),
            value: *level,
        })
        .collect();

    Ok(RiverSummary {
        source_field: shape.field(),
        keys,
        latest_level,
        latest_time,
        trend: trend::from_series(&levels),
        series,
    })
}

/// Parses a response body and interprets it.
///
/// # Errors
/// `ReadingError::ParseError` for a body that is not JSON, otherwise as
/// `interpret`.
pub fn interpret_str(
    json: &str,
    mapping: &FieldMapping,
    order: SeriesOrder,
) -> Result<RiverSummary, ReadingError> {
    let payload: Value = serde_json::from_str(json)
        .map_err(|e| ReadingError::ParseError(format!("JSON deserialization failed: {}", e)))?;
    interpret(&payload, mapping, order)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
