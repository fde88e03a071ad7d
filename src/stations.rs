/// Built-in station registry.
///
/// Used when no `riverwatch.toml` is present. A configuration file, when
/// found, replaces this list entirely (see `config`).

use crate::model::{FieldMapping, SeriesOrder, Station};

/// Default tide source (Chester, via the tide proxy).
pub const DEFAULT_TIDE_URL: &str = "https://tide-proxy.onrender.com/tides/chester";

/// Compile-time station entry.
pub struct BuiltinStation {
    pub id: &'static str,
    pub name: &'static str,
    pub url: &'static str,
    pub order: SeriesOrder,
}

pub static BUILTIN_STATIONS: &[BuiltinStation] = &[BuiltinStation {
    id: "dee-ironbridge",
    name: "River Dee at Ironbridge (Aldford)",
    url: "https://riverlevels.uk/dee-aldford-ironbridge-dee/data/json/10",
    // riverlevels.uk lists the latest sample first
    order: SeriesOrder::NewestFirst,
}];

impl From<&BuiltinStation> for Station {
    fn from(builtin: &BuiltinStation) -> Self {
        Station {
            id: builtin.id.to_string(),
            name: builtin.name.to_string(),
            url: builtin.url.to_string(),
            fields: FieldMapping::default(),
            order: builtin.order,
        }
    }
}

/// The built-in registry as owned `Station`s.
pub fn builtin_registry() -> Vec<Station> {
    BUILTIN_STATIONS.iter().map(Station::from).collect()
}

/// Looks up a station by id. Returns `None` if not found.
pub fn find_station<'a>(stations: &'a [Station], id: &str) -> Option<&'a Station> {
    stations.iter().find(|s| s.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_ids_are_unique_and_slug_shaped() {
        let mut seen = std::collections::HashSet::new();
        for station in BUILTIN_STATIONS {
            assert!(seen.insert(station.id), "duplicate station id '{}'", station.id);
            assert!(
                station.id.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
                "station id '{}' should be a lowercase slug",
                station.id
            );
        }
    }

    #[test]
    fn test_builtin_urls_are_https() {
        for station in BUILTIN_STATIONS {
            assert!(station.url.starts_with("https://"), "{} url must be https", station.name);
        }
        assert!(DEFAULT_TIDE_URL.starts_with("https://"));
    }

    #[test]
    fn test_find_station() {
        let registry = builtin_registry();
        let dee = find_station(&registry, "dee-ironbridge").expect("Dee should be registered");
        assert_eq!(dee.order, SeriesOrder::NewestFirst);
        assert!(find_station(&registry, "thames-kingston").is_none());
    }
}
