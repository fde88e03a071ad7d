/// riverwatch_service: tide and river-level dashboard service.
///
/// # Module structure
///
/// ```text
/// riverwatch_service
/// ├── model       - shared data types (Reading, Station, Trend, ReadingError, …)
/// ├── config      - riverwatch.toml loader (tide source, service settings, stations)
/// ├── stations    - built-in station registry + lookup
/// ├── logging     - tracing setup and classified failure logging
/// ├── ingest
/// │   ├── http    - JsonSource trait + blocking reqwest client
/// │   ├── river   - river payload interpreter (shape, keys, latest, trend, series)
/// │   ├── tides   - tide list parsing
/// │   └── fixtures (test only) - representative payloads
/// ├── analysis
/// │   └── trend   - direction from the last two samples
/// ├── display     - panels, placeholders and terminal rendering
/// ├── dashboard   - page state, concurrent loads, epoch-guarded selection
/// └── endpoint    - JSON HTTP API over the dashboard
/// ```

/// Public modules
pub mod analysis;
pub mod config;
pub mod dashboard;
pub mod display;
pub mod endpoint;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod stations;
