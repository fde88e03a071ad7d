/// Structured logging for the riverwatch service
///
/// Thin layer over `tracing`: every event carries the data source and,
/// where there is one, the station id. Load failures are classified so
/// that routine conditions (an empty series) stay quiet while transport
/// problems are reported as errors.

use std::fmt;

use tracing_subscriber::EnvFilter;

use crate::model::ReadingError;

// ---------------------------------------------------------------------------
// Data Source Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Tides,
    River,
    Endpoint,
    System,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Tides => write!(f, "TIDES"),
            DataSource::River => write!(f, "RIVER"),
            DataSource::Endpoint => write!(f, "ENDPOINT"),
            DataSource::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureType {
    /// Source answered with nothing to show.
    Expected,
    /// Transport or payload failure.
    Unexpected,
    /// Source answered, but not in a shape we understand.
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

pub fn classify_failure(err: &ReadingError) -> FailureType {
    match err {
        ReadingError::NoReadings => FailureType::Expected,
        ReadingError::HttpError(_) | ReadingError::Network(_) | ReadingError::ParseError(_) => {
            FailureType::Unexpected
        }
        ReadingError::UnknownStation(_) => FailureType::Unexpected,
        ReadingError::UnrecognizedFormat | ReadingError::NumericCoercion { .. } => FailureType::Unknown,
    }
}

// ---------------------------------------------------------------------------
// Initialisation
// ---------------------------------------------------------------------------

/// Installs the global fmt subscriber. `RUST_LOG` wins over
/// `default_filter`. Calling this twice is harmless.
pub fn init_logger(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

pub fn info(source: DataSource, station: Option<&str>, message: &str) {
    tracing::info!(source = %source, station = station.unwrap_or("-"), "{}", message);
}

pub fn warn(source: DataSource, station: Option<&str>, message: &str) {
    tracing::warn!(source = %source, station = station.unwrap_or("-"), "{}", message);
}

pub fn error(source: DataSource, station: Option<&str>, message: &str) {
    tracing::error!(source = %source, station = station.unwrap_or("-"), "{}", message);
}

pub fn debug(source: DataSource, station: Option<&str>, message: &str) {
    tracing::debug!(source = %source, station = station.unwrap_or("-"), "{}", message);
}

/// Logs a failed load at a level matching its classification.
pub fn log_load_failure(source: DataSource, station: Option<&str>, operation: &str, err: &ReadingError) {
    let failure_type = classify_failure(err);
    let message = format!("{} failed [{}]: {}", operation, failure_type, err);

    match failure_type {
        FailureType::Expected => debug(source, station, &message),
        FailureType::Unexpected => error(source, station, &message),
        FailureType::Unknown => warn(source, station, &message),
    }
}
