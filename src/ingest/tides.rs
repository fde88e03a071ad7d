/// Tide list client.
///
/// The tide proxy returns `{ "tides": [ { "title", "time" }, ... ] }`.
/// Entries are kept in payload order; capping to the displayed count is
/// the renderer's job.

use serde::Deserialize;
use serde_json::Value;

use crate::model::{ReadingError, TideEntry};

#[derive(Debug, Deserialize)]
struct TideResponse {
    tides: Vec<TideEntry>,
}

/// Extracts tide entries from a parsed payload.
///
/// # Errors
/// `ReadingError::ParseError` when there is no `tides` array or an entry is
/// not an object.
pub fn parse_tides(payload: Value) -> Result<Vec<TideEntry>, ReadingError> {
    let response: TideResponse = serde_json::from_value(payload)
        .map_err(|e| ReadingError::ParseError(format!("tide payload: {}", e)))?;
    Ok(response.tides)
}

/// Parses a response body into tide entries.
pub fn parse_tides_str(json: &str) -> Result<Vec<TideEntry>, ReadingError> {
    let payload: Value = serde_json::from_str(json)
        .map_err(|e| ReadingError::ParseError(format!("JSON deserialization failed: {}", e)))?;
    parse_tides(payload)
}
