/// Series analysis for the riverwatch service.
///
/// Submodules:
/// - `trend` - direction of travel from the two most recent samples.

pub mod trend;
