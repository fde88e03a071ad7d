/// Rendering of load outcomes into the text the dashboard shows.
///
/// Every failure ends up here as placeholder text; nothing is propagated
/// past the panel.

use rust_decimal::prelude::*;
use serde::Serialize;
use std::fmt::Write;

use crate::dashboard::DashboardSnapshot;
use crate::ingest::river::{display_text, RiverSummary};
use crate::model::{ChartPoint, LevelValue, ReadingError, TideEntry};

pub const PLACEHOLDER: &str = "--";
pub const LEVEL_ERROR: &str = "ERR";
pub const NO_READINGS: &str = "No readings";
pub const UNKNOWN_FORMAT: &str = "Unknown JSON format (expected an array or a readings/data/series/levels field)";
pub const LOADING: &str = "Loading…";
pub const NO_TIDE_DATA: &str = "No tide data";
pub const TIDE_ERROR: &str = "Error";

// ---------------------------------------------------------------------------
// River panel
// ---------------------------------------------------------------------------

/// Text fields and chart series of the river panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiverPanel {
    pub level: String,
    pub time: String,
    pub trend: String,
    pub chart: Vec<ChartPoint>,
}

impl RiverPanel {
    pub fn loading() -> Self {
        Self::placeholder(PLACEHOLDER, LOADING)
    }

    fn placeholder(level: &str, trend: &str) -> Self {
        Self {
            level: level.to_string(),
            time: PLACEHOLDER.to_string(),
            trend: trend.to_string(),
            chart: Vec::new(),
        }
    }

    pub fn from_outcome(outcome: &Result<RiverSummary, ReadingError>) -> Self {
        match outcome {
            Ok(summary) => Self {
                level: format_level(&summary.latest_level),
                time: summary.latest_time.clone().unwrap_or_else(|| PLACEHOLDER.to_string()),
                trend: summary.trend.to_string(),
                chart: summary.series.clone(),
            },
            Err(ReadingError::NoReadings) => Self::placeholder("-- m", NO_READINGS),
            Err(ReadingError::UnrecognizedFormat) => Self::placeholder(PLACEHOLDER, UNKNOWN_FORMAT),
            Err(_) => Self::placeholder(LEVEL_ERROR, PLACEHOLDER),
        }
    }
}

/// Two decimal places, exact ties rounded away from zero.
///
/// Rounds the exact binary value, so `1.125` gives `1.13` while `1.005`
/// (stored just below the tie) gives `1.00`.
pub fn fixed_2dp(value: f64) -> String {
    match Decimal::from_f64_retain(value) {
        Some(d) => format!("{:.2}", d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)),
        None => format!("{:.2}", value),
    }
}

/// `1.50 m` for numbers; raw text is shown unmodified.
pub fn format_level(level: &LevelValue) -> String {
    match level {
        LevelValue::Numeric(v) => format!("{} m", fixed_2dp(*v)),
        LevelValue::Raw(raw) => raw.clone(),
        LevelValue::Missing => PLACEHOLDER.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tide list
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TideList {
    pub items: Vec<String>,
}

impl TideList {
    pub fn loading() -> Self {
        Self { items: vec![LOADING.to_string()] }
    }

    /// Renders at most `max_entries` tides in payload order.
    pub fn from_outcome(outcome: &Result<Vec<TideEntry>, ReadingError>, max_entries: usize) -> Self {
        let items = match outcome {
            Ok(tides) if tides.is_empty() => vec![NO_TIDE_DATA.to_string()],
            Ok(tides) => tides.iter().take(max_entries).map(tide_item).collect(),
            Err(_) => vec![TIDE_ERROR.to_string()],
        };
        Self { items }
    }
}

fn field_text(value: &Option<serde_json::Value>) -> String {
    value.as_ref().map(display_text).unwrap_or_default()
}

/// Title and time joined by an em dash.
pub fn tide_item(entry: &TideEntry) -> String {
    format!("{} — {}", field_text(&entry.title), field_text(&entry.time))
}

// ---------------------------------------------------------------------------
// Terminal output
// ---------------------------------------------------------------------------

/// Plain-text dashboard for the terminal, showing the last `chart_points`
/// points of the series.
pub fn render_text(snapshot: &DashboardSnapshot, chart_points: usize) -> String {
    let mut out = String::new();
    let river = &snapshot.river;

    let _ = writeln!(out, "🌊 {} ({})", snapshot.station_name, snapshot.station_id);
    let _ = writeln!(out, "   Level: {}", river.level);
    let _ = writeln!(out, "   Time:  {}", river.time);
    let _ = writeln!(out, "   Trend: {}", river.trend);

    if !river.chart.is_empty() {
        let skip = river.chart.len().saturating_sub(chart_points);
        let _ = writeln!(out, "\n   Recent levels ({} of {}):", river.chart.len() - skip, river.chart.len());
        for point in river.chart.iter().skip(skip) {
            let value = point
                .value
                .map(fixed_2dp)
                .unwrap_or_else(|| PLACEHOLDER.to_string());
            let _ = writeln!(out, "   {:<24} {}", point.label, value);
        }
    }

    let _ = writeln!(out, "\n🌙 Tides");
    for item in &snapshot.tides.items {
        let _ = writeln!(out, "   • {}", item);
    }

    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
