/// Trend classification.
///
/// Only the last two samples matter. A sample whose level did not coerce
/// to a number is passed in as `None` and makes the trend unknown.

use crate::model::Trend;

/// Compares the previous and latest levels.
pub fn classify(previous: Option<f64>, latest: Option<f64>) -> Trend {
    match (previous, latest) {
        (Some(prev), Some(last)) if last > prev => Trend::Rising,
        (Some(prev), Some(last)) if last < prev => Trend::Falling,
        (Some(_), Some(_)) => Trend::Steady,
        _ => Trend::Unknown,
    }
}

/// Trend over a whole series of coerced levels, oldest first.
///
/// Fewer than two samples yields `Trend::Unknown`.
pub fn from_series(levels: &[Option<f64>]) -> Trend {
    match levels {
        [.., prev, last] => classify(*prev, *last),
        _ => Trend::Unknown,
    }
}
