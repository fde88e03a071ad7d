/// Source clients: fetching and interpreting tide and river payloads.
///
/// - `http`   - `JsonSource` trait and the blocking reqwest implementation
/// - `river`  - river-level payload interpreter
/// - `tides`  - tide list parsing
/// - `fixtures` (test only) - representative payloads

pub mod http;
pub mod river;
pub mod tides;

#[cfg(test)]
pub(crate) mod fixtures;
