/// Service configuration loader - parses riverwatch.toml
///
/// Separates the tide source, refresh settings and station registry from
/// code, so stations can be added or remapped without recompiling.
///
/// Resolution order for the file:
///   1. `--config PATH` on the command line
///   2. `RIVERWATCH_CONFIG` (also read from `.env`)
///   3. `riverwatch.toml` in the working directory, if present
///   4. the built-in registry in `stations`
///
/// `RIVERWATCH_TIDE_URL` overrides the tide source after loading.

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::model::{FieldMapping, SeriesOrder, Station};
use crate::stations;

pub const DEFAULT_CONFIG_FILE: &str = "riverwatch.toml";
pub const CONFIG_ENV: &str = "RIVERWATCH_CONFIG";
pub const TIDE_URL_ENV: &str = "RIVERWATCH_TIDE_URL";

/// Upper bound for `tides.max_entries`.
pub const MAX_TIDE_ENTRIES: usize = 50;

// ---------------------------------------------------------------------------
// File structures
// ---------------------------------------------------------------------------

/// One `[[station]]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct StationConfig {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub order: SeriesOrder,
    // Explicit field names (optional - inferred from the latest sample otherwise)
    pub value_key: Option<String>,
    pub time_key: Option<String>,
}

/// `[tides]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct TideConfig {
    #[serde(default = "default_tide_url")]
    pub url: String,
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

/// `[service]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// 0 loads once and never refreshes.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_minutes: u64,
    pub default_station: Option<String>,
}

fn default_tide_url() -> String {
    stations::DEFAULT_TIDE_URL.to_string()
}

fn default_max_entries() -> usize {
    15
}

fn default_request_timeout() -> u64 {
    20
}

fn default_refresh_interval() -> u64 {
    15
}

impl Default for TideConfig {
    fn default() -> Self {
        Self {
            url: default_tide_url(),
            max_entries: default_max_entries(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout(),
            refresh_interval_minutes: default_refresh_interval(),
            default_station: None,
        }
    }
}

/// Root structure for TOML parsing
#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    tides: TideConfig,
    #[serde(default)]
    service: ServiceConfig,
    #[serde(default)]
    station: Vec<StationConfig>,
}

impl From<StationConfig> for Station {
    fn from(config: StationConfig) -> Self {
        Station {
            id: config.id,
            name: config.name,
            url: config.url,
            fields: FieldMapping {
                value_key: config.value_key,
                time_key: config.time_key,
            },
            order: config.order,
        }
    }
}

// ---------------------------------------------------------------------------
// Loaded configuration
// ---------------------------------------------------------------------------

/// Validated configuration used by the rest of the service.
#[derive(Debug, Clone)]
pub struct RiverwatchConfig {
    pub tides: TideConfig,
    pub service: ServiceConfig,
    pub stations: Vec<Station>,
}

impl RiverwatchConfig {
    /// Defaults plus the built-in station registry.
    pub fn builtin() -> Self {
        Self {
            tides: TideConfig::default(),
            service: ServiceConfig::default(),
            stations: stations::builtin_registry(),
        }
    }

    /// The station selected at startup: `service.default_station`, else the
    /// first registered station. `None` only for an empty registry.
    pub fn initial_station(&self) -> Option<&Station> {
        self.service
            .default_station
            .as_deref()
            .and_then(|id| stations::find_station(&self.stations, id))
            .or_else(|| self.stations.first())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stations.is_empty() {
            return Err(ConfigError::Invalid("at least one [[station]] is required".into()));
        }

        let mut seen = HashSet::new();
        for station in &self.stations {
            if station.id.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("station '{}' has an empty id", station.name)));
            }
            if station.url.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("station '{}' has an empty url", station.id)));
            }
            if !seen.insert(station.id.as_str()) {
                return Err(ConfigError::Invalid(format!("duplicate station id '{}'", station.id)));
            }
        }

        if self.tides.max_entries == 0 || self.tides.max_entries > MAX_TIDE_ENTRIES {
            return Err(ConfigError::Invalid(format!(
                "tides.max_entries must be between 1 and {}, got {}",
                MAX_TIDE_ENTRIES, self.tides.max_entries
            )));
        }

        if let Some(id) = &self.service.default_station {
            if stations::find_station(&self.stations, id).is_none() {
                return Err(ConfigError::Invalid(format!(
                    "service.default_station '{}' is not a configured station",
                    id
                )));
            }
        }

        Ok(())
    }

    /// Applies environment overrides. `lookup` is `std::env::var` in
    /// production.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(TIDE_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.tides.url = url;
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(String),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io { path, source } => write!(f, "Failed to read {}: {}", path.display(), source),
            ConfigError::Parse(msg) => write!(f, "Failed to parse config: {}", msg),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Parses and validates configuration text.
pub fn parse_config(contents: &str) -> Result<RiverwatchConfig, ConfigError> {
    let file: ConfigFile = toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;

    let config = RiverwatchConfig {
        tides: file.tides,
        service: file.service,
        stations: file.station.into_iter().map(Station::from).collect(),
    };
    config.validate()?;
    Ok(config)
}

/// Loads configuration from a specific file.
pub fn load_config_from(path: &Path) -> Result<RiverwatchConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&contents)
}

/// Resolves and loads configuration (see module docs for the order), then
/// applies environment overrides.
pub fn load_config(explicit: Option<&Path>) -> Result<RiverwatchConfig, ConfigError> {
    let from_env = std::env::var(CONFIG_ENV).ok().map(PathBuf::from);

    let mut config = match explicit.map(Path::to_path_buf).or(from_env) {
        Some(path) => load_config_from(&path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => load_config_from(Path::new(DEFAULT_CONFIG_FILE))?,
        None => {
            tracing::info!("no {} found, using built-in station registry", DEFAULT_CONFIG_FILE);
            RiverwatchConfig::builtin()
        }
    };

    config.apply_env_overrides(|key| std::env::var(key).ok());
    Ok(config)
}
