/// Test fixtures: representative JSON payloads from the tide and river sources.
///
/// River sources do not agree on a shape. The variants seen in practice:
///   [ {...}, {...} ]                      - bare array, oldest first
///   { "readings" | "data" | "series": [...] }
///   { "levels": [...] }                   - riverlevels.uk, NEWEST first
///
/// Level values are frequently JSON strings even though they represent
/// numbers, so parsers must coerce them.
///
/// Tide source shape:
///   { "tides": [ { "title": "High Tide", "time": "..." }, ... ] }

/// riverlevels.uk JSON for the Dee at Ironbridge, truncated to four samples.
/// The first entry is the latest; the level rose from 0.412 to 0.431.
#[cfg(test)]
pub(crate) fn fixture_riverlevels_dee_json() -> &'static str {
    r#"{
      "station": "dee-aldford-ironbridge-dee",
      "levels": [
        { "record_date": "2026-10-14 09:00:00", "avg_level": "0.431", "min_level": "0.428", "max_level": "0.433" },
        { "record_date": "2026-10-14 08:45:00", "avg_level": "0.412", "min_level": "0.410", "max_level": "0.415" },
        { "record_date": "2026-10-14 08:30:00", "avg_level": "0.405", "min_level": "0.401", "max_level": "0.409" },
        { "record_date": "2026-10-14 08:15:00", "avg_level": "0.398", "min_level": "0.396", "max_level": "0.400" }
      ]
    }"#
}

/// Bare array with numeric levels and a timestamp key that does not say
/// "time" or "date" - inference must fall back on key order for time.
#[cfg(test)]
pub(crate) fn fixture_bare_array_json() -> &'static str {
    r#"[
      { "t": "2026-10-14T06:00:00Z", "stage_level": 1.204 },
      { "t": "2026-10-14T06:15:00Z", "stage_level": 1.198 },
      { "t": "2026-10-14T06:30:00Z", "stage_level": 1.187 }
    ]"#
}

/// `data` wrapper with a non-numeric latest level.
#[cfg(test)]
pub(crate) fn fixture_non_numeric_latest_json() -> &'static str {
    r#"{
      "data": [
        { "dateTime": "2026-10-14T06:00:00Z", "value": "0.95" },
        { "dateTime": "2026-10-14T06:15:00Z", "value": "Ice" }
      ]
    }"#
}

/// `series` wrapper whose objects carry neither a level/value key nor a
/// time/date key.
#[cfg(test)]
pub(crate) fn fixture_unlabelled_series_json() -> &'static str {
    r#"{
      "series": [
        { "at": "06:00", "m": 2.10 },
        { "at": "06:15", "m": 2.25 }
      ]
    }"#
}

/// Tide proxy response with three events.
#[cfg(test)]
pub(crate) fn fixture_tides_chester_json() -> &'static str {
    r#"{
      "location": "chester",
      "tides": [
        { "title": "High Tide", "time": "Tue 14 Oct 12:41" },
        { "title": "Low Tide", "time": "Tue 14 Oct 19:02" },
        { "title": "High Tide", "time": "Wed 15 Oct 01:05" }
      ]
    }"#
}

/// Tide proxy response with no events.
#[cfg(test)]
pub(crate) fn fixture_tides_empty_json() -> &'static str {
    r#"{ "location": "chester", "tides": [] }"#
}
