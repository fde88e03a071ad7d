/// Dashboard state and load orchestration.
///
/// The dashboard holds the two panels (river, tides) and the selected
/// station. Loads run on a small thread pool:
/// 1. `load_all` starts the tide load and the river load side by side
/// 2. each load fetches, interprets and renders without touching state
/// 3. the finished panel is written back under the state lock
///
/// River loads carry a `LoadTicket`. Selecting a station bumps the epoch,
/// so a response for an earlier selection is dropped instead of
/// overwriting the panel.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use threadpool::ThreadPool;

use crate::config::{ConfigError, RiverwatchConfig};
use crate::display::{RiverPanel, TideList};
use crate::ingest::http::JsonSource;
use crate::ingest::river::{interpret, RiverSummary};
use crate::ingest::tides::parse_tides;
use crate::logging::{self, DataSource};
use crate::model::{ReadingError, Station};
use crate::stations::find_station;

/// Worker count: one per independent load.
const LOAD_WORKERS: usize = 2;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct DashboardState {
    station: Station,
    river: RiverPanel,
    tides: TideList,
    river_epoch: u64,
    river_updated: Option<DateTime<Utc>>,
    tides_updated: Option<DateTime<Utc>>,
}

/// Serialisable copy of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub station_id: String,
    pub station_name: String,
    pub river: RiverPanel,
    pub tides: TideList,
    pub river_epoch: u64,
    pub river_updated: Option<DateTime<Utc>>,
    pub tides_updated: Option<DateTime<Utc>>,
}

/// Identifies one river load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadTicket {
    pub epoch: u64,
    pub station_id: String,
}

fn lock(state: &Mutex<DashboardState>) -> MutexGuard<'_, DashboardState> {
    // a panicked load must not take the dashboard down with it
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Starts a river load for the current selection.
fn begin_river_load(state: &Mutex<DashboardState>) -> (LoadTicket, Station) {
    let mut state = lock(state);
    state.river_epoch += 1;
    state.river = RiverPanel::loading();
    let ticket = LoadTicket {
        epoch: state.river_epoch,
        station_id: state.station.id.clone(),
    };
    (ticket, state.station.clone())
}

/// Writes a finished river panel unless a later load has started.
/// Returns whether the panel was applied.
fn apply_river(state: &Mutex<DashboardState>, ticket: &LoadTicket, panel: RiverPanel) -> bool {
    let mut state = lock(state);
    if ticket.epoch != state.river_epoch {
        tracing::debug!(
            station = %ticket.station_id,
            epoch = ticket.epoch,
            current = state.river_epoch,
            "discarding stale river response"
        );
        return false;
    }
    state.river = panel;
    state.river_updated = Some(Utc::now());
    true
}

/// Fetches and interprets one station's series.
pub fn load_station(source: &dyn JsonSource, station: &Station) -> Result<RiverSummary, ReadingError> {
    source
        .fetch_json(&station.url)
        .and_then(|payload| interpret(&payload, &station.fields, station.order))
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

pub struct Dashboard {
    config: RiverwatchConfig,
    source: Arc<dyn JsonSource>,
    state: Arc<Mutex<DashboardState>>,
    pool: Mutex<ThreadPool>,
}

impl Dashboard {
    /// # Errors
    /// `ConfigError::Invalid` if `config` does not validate (for example an
    /// empty station registry).
    pub fn new(config: RiverwatchConfig, source: Arc<dyn JsonSource>) -> Result<Self, ConfigError> {
        config.validate()?;
        let station = config
            .initial_station()
            .ok_or_else(|| ConfigError::Invalid("no station to select".into()))?
            .clone();

        let state = DashboardState {
            station,
            river: RiverPanel::loading(),
            tides: TideList::loading(),
            river_epoch: 0,
            river_updated: None,
            tides_updated: None,
        };

        Ok(Self {
            config,
            source,
            state: Arc::new(Mutex::new(state)),
            pool: Mutex::new(ThreadPool::with_name("riverwatch-load".into(), LOAD_WORKERS)),
        })
    }

    pub fn stations(&self) -> &[Station] {
        &self.config.stations
    }

    pub fn config(&self) -> &RiverwatchConfig {
        &self.config
    }

    fn execute<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.pool
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .execute(job);
    }

    /// Starts both loads; they run independently of each other.
    pub fn load_all(&self) -> LoadTicket {
        self.load_tides();
        self.load_river()
    }

    /// Starts a tide list load.
    pub fn load_tides(&self) {
        lock(&self.state).tides = TideList::loading();

        let source = Arc::clone(&self.source);
        let state = Arc::clone(&self.state);
        let url = self.config.tides.url.clone();
        let max_entries = self.config.tides.max_entries;

        self.execute(move || {
            let outcome = source.fetch_json(&url).and_then(parse_tides);
            match &outcome {
                Ok(tides) => logging::info(DataSource::Tides, None, &format!("{} tide events", tides.len())),
                Err(e) => logging::log_load_failure(DataSource::Tides, None, "tide load", e),
            }
            let list = TideList::from_outcome(&outcome, max_entries);

            let mut state = lock(&state);
            state.tides = list;
            state.tides_updated = Some(Utc::now());
        });
    }

    /// Starts a river load for the selected station.
    pub fn load_river(&self) -> LoadTicket {
        let (ticket, station) = begin_river_load(&self.state);

        let source = Arc::clone(&self.source);
        let state = Arc::clone(&self.state);
        let job_ticket = ticket.clone();

        self.execute(move || {
            let outcome = load_station(source.as_ref(), &station);
            match &outcome {
                Ok(summary) => logging::info(
                    DataSource::River,
                    Some(&station.id),
                    &format!("{} samples, trend {}", summary.series.len(), summary.trend),
                ),
                Err(e) => logging::log_load_failure(DataSource::River, Some(&station.id), "river load", e),
            }
            apply_river(&state, &job_ticket, RiverPanel::from_outcome(&outcome));
        });

        ticket
    }

    /// Switches the river panel to another station and starts its load.
    ///
    /// # Errors
    /// `ReadingError::UnknownStation` if `id` is not registered; the
    /// selection is left unchanged.
    pub fn select_station(&self, id: &str) -> Result<LoadTicket, ReadingError> {
        let station = find_station(&self.config.stations, id)
            .ok_or_else(|| ReadingError::UnknownStation(id.to_string()))?
            .clone();

        lock(&self.state).station = station;
        Ok(self.load_river())
    }

    /// One-shot load of any registered station; dashboard state is not
    /// touched.
    pub fn query_station(&self, id: &str) -> Result<RiverPanel, ReadingError> {
        let station = find_station(&self.config.stations, id)
            .ok_or_else(|| ReadingError::UnknownStation(id.to_string()))?;
        Ok(RiverPanel::from_outcome(&load_station(self.source.as_ref(), station)))
    }

    /// Blocks until every started load has finished.
    pub fn wait(&self) {
        let pool = self
            .pool
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        pool.join();
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        let state = lock(&self.state);
        DashboardSnapshot {
            station_id: state.station.id.clone(),
            station_name: state.station.name.clone(),
            river: state.river.clone(),
            tides: state.tides.clone(),
            river_epoch: state.river_epoch,
            river_updated: state.river_updated,
            tides_updated: state.tides_updated,
        }
    }

    /// Reloads both panels every `interval`, forever. The first load is the
    /// caller's; a zero interval means no refresh and returns at once.
    pub fn run(&self, interval: Duration) {
        if interval.is_zero() {
            return;
        }

        loop {
            std::thread::sleep(interval);
            let ticket = self.load_all();
            logging::debug(
                DataSource::System,
                Some(&ticket.station_id),
                &format!("refresh started (epoch {})", ticket.epoch),
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
