//! Library catalogs (theaters, aircraft, coalitions) and generator settings.
//!
//! Everything here is read-only input to the generator. Records are loaded
//! from YAML lists or TOML files and indexed by their string identifier.

use std::fs::File;
use std::path::{Path, PathBuf};

use forge_core::BoundedRange;
use forge_core::coords::Coordinates;
use serde::Deserialize;
use thiserror::Error;

mod library;

pub use library::{Catalog, Library, Record};

/// A map the simulator ships, with the airbases and zones the generator may use.
#[derive(Debug, Deserialize, Clone)]
pub struct TheaterConfig {
    pub id: String,
    pub name: String,
    /// Theatre name written into the archive, e.g. `Caucasus`.
    pub dcs_name: String,
    pub center: Coordinates,
    #[serde(default = "default_temperature")]
    pub base_temperature_c: f64,
    #[serde(default)]
    pub airbases: Vec<AirbaseConfig>,
    #[serde(default)]
    pub zones: Vec<ZoneConfig>,
    #[serde(default)]
    pub carrier_stations: Vec<CarrierStationConfig>,
}

fn default_temperature() -> f64 {
    15.0
}

#[derive(Debug, Deserialize, Clone)]
pub struct AirbaseConfig {
    /// Simulator airdrome id.
    pub id: u32,
    pub name: String,
    pub position: Coordinates,
    #[serde(default)]
    pub elevation_m: f64,
    pub runway_heading_deg: f64,
    pub runway_length_ft: f64,
}

/// Named ground location usable for objectives and ground forces.
#[derive(Debug, Deserialize, Clone)]
pub struct ZoneConfig {
    pub name: String,
    pub position: Coordinates,
    #[serde(default = "default_zone_radius")]
    pub radius_m: f64,
}

fn default_zone_radius() -> f64 {
    1_500.0
}

#[derive(Debug, Deserialize, Clone)]
pub struct CarrierStationConfig {
    pub name: String,
    pub position: Coordinates,
    /// Heading the carrier steams on, degrees true.
    #[serde(default)]
    pub heading_deg: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AircraftConfig {
    /// Simulator unit type, e.g. `FA-18C_hornet`.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub carrier_capable: bool,
    #[serde(default)]
    pub min_runway_ft: f64,
    pub cruise_speed_kts: f64,
    pub cruise_altitude_ft: f64,
    /// Western callsign names; empty means numeric callsigns.
    #[serde(default)]
    pub callsigns: Vec<String>,
    #[serde(default = "default_radio")]
    pub radio_mhz: f64,
    /// Simulator task name the flight is created with.
    #[serde(default = "default_task")]
    pub task: String,
    #[serde(default)]
    pub livery: Option<String>,
}

fn default_radio() -> f64 {
    251.0
}

fn default_task() -> String {
    "Ground Attack".to_string()
}

/// Ground unit roles a coalition roster provides.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UnitFamily {
    Logistics,
    Armor,
    AirDefense,
    Sam,
}

impl UnitFamily {
    pub fn label(&self) -> &'static str {
        match self {
            UnitFamily::Logistics => "logistics",
            UnitFamily::Armor => "armor",
            UnitFamily::AirDefense => "air_defense",
            UnitFamily::Sam => "sam",
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CoalitionConfig {
    pub id: String,
    pub name: String,
    pub country: String,
    pub country_id: u32,
    #[serde(default)]
    pub units: std::collections::BTreeMap<UnitFamily, Vec<String>>,
    /// Ship type used for carrier-based flights.
    #[serde(default)]
    pub carrier: Option<String>,
}

impl CoalitionConfig {
    /// Unit types available for a family; empty when the roster lacks it.
    pub fn units(&self, family: UnitFamily) -> &[String] {
        self.units.get(&family).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Tunables for placement and flight planning.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GeneratorSettings {
    /// Attempts per placement before giving up.
    pub placement_attempts: u32,
    pub min_objective_separation_nm: f64,
    /// No enemy group may be placed closer than this to the player home base.
    pub min_enemy_distance_nm: f64,
    pub air_defense_offset_nm: BoundedRange,
    /// Distance a friendly CAS group sits from its objective, toward home.
    pub friendly_offset_nm: BoundedRange,
    pub unit_spacing_m: f64,
    /// Fraction of the home-to-first-objective leg where ingress is placed.
    pub ingress_fraction: f64,
    pub egress_distance_nm: f64,
    pub objective_zone_radius_m: f64,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            placement_attempts: 64,
            min_objective_separation_nm: 8.0,
            min_enemy_distance_nm: 15.0,
            air_defense_offset_nm: BoundedRange::new(2, 6),
            friendly_offset_nm: BoundedRange::new(3, 5),
            unit_spacing_m: 40.0,
            ingress_fraction: 0.75,
            egress_distance_nm: 10.0,
            objective_zone_radius_m: 1_500.0,
        }
    }
}

/// Errors that can occur while loading library files.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("failed to parse TOML in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("duplicate {kind} id `{id}`")]
    DuplicateId { kind: &'static str, id: String },
    #[error("{kind} `{id}` not found in library")]
    Missing { kind: &'static str, id: String },
}

/// Load theater definitions from a YAML list, a TOML record, or a directory of TOML records.
pub fn load_theaters<P: AsRef<Path>>(path: P) -> Result<Vec<TheaterConfig>, LibraryError> {
    load_records(path)
}

/// Load aircraft definitions.
pub fn load_aircraft<P: AsRef<Path>>(path: P) -> Result<Vec<AircraftConfig>, LibraryError> {
    load_records(path)
}

/// Load coalition definitions.
pub fn load_coalitions<P: AsRef<Path>>(path: P) -> Result<Vec<CoalitionConfig>, LibraryError> {
    load_records(path)
}

/// Load generator settings from a TOML file; a missing file yields the defaults.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<GeneratorSettings, LibraryError> {
    let path = path.as_ref();
    if !path.exists() {
        log::debug!("no generator settings at {}, using defaults", path.display());
        return Ok(GeneratorSettings::default());
    }
    let contents = read_to_string(path)?;
    toml::from_str(&contents).map_err(|source| LibraryError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

fn load_records<T, P>(path: P) -> Result<Vec<T>, LibraryError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.is_dir() {
        read_dir_records(path)
    } else if path.extension().map(|ext| ext == "toml").unwrap_or(false) {
        let contents = read_to_string(path)?;
        let record: T = parse_toml(path, &contents)?;
        Ok(vec![record])
    } else {
        let reader = File::open(path).map_err(|source| LibraryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_reader(reader).map_err(|source| LibraryError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn read_dir_records<T>(dir: &Path) -> Result<Vec<T>, LibraryError>
where
    T: for<'de> Deserialize<'de>,
{
    let io_err = |source| LibraryError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut records = Vec::new();
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(io_err)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().map(|ext| ext == "toml").unwrap_or(false))
        .collect();
    entries.sort();
    for path in entries {
        let contents = read_to_string(&path)?;
        records.push(parse_toml(&path, &contents)?);
    }
    Ok(records)
}

fn read_to_string(path: &Path) -> Result<String, LibraryError> {
    std::fs::read_to_string(path).map_err(|source| LibraryError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_toml<T>(path: &Path, contents: &str) -> Result<T, LibraryError>
where
    T: for<'de> Deserialize<'de>,
{
    toml::from_str(contents).map_err(|source| LibraryError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn theater_directory_loads_sorted_toml_records() {
        let dir = tempfile::tempdir().expect("tempdir");
        for (file, id) in [("b.toml", "beta"), ("a.toml", "alpha")] {
            let mut f = File::create(dir.path().join(file)).unwrap();
            writeln!(
                f,
                "id = \"{id}\"\nname = \"{id}\"\ndcs_name = \"{id}\"\ncenter = {{ x = 1.0, y = 2.0 }}"
            )
            .unwrap();
        }
        File::create(dir.path().join("notes.txt")).unwrap();

        let theaters = load_theaters(dir.path()).expect("theaters");
        let ids: Vec<_> = theaters.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["alpha", "beta"]);
        assert_eq!(theaters[0].base_temperature_c, 15.0);
        assert!(theaters[0].airbases.is_empty());
    }

    #[test]
    fn coalition_yaml_exposes_unit_families() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("coalitions.yaml");
        std::fs::write(
            &path,
            "- id: usa\n  name: United States\n  country: USA\n  country_id: 2\n  units:\n    armor: [M-1 Abrams]\n    air_defense: [Vulcan]\n  carrier: CVN_71\n",
        )
        .unwrap();

        let coalitions = load_coalitions(&path).expect("coalitions");
        assert_eq!(coalitions.len(), 1);
        assert_eq!(coalitions[0].units(UnitFamily::Armor), ["M-1 Abrams"]);
        assert!(coalitions[0].units(UnitFamily::Sam).is_empty());
        assert_eq!(coalitions[0].carrier.as_deref(), Some("CVN_71"));
    }

    #[test]
    fn missing_settings_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let settings = load_settings(dir.path().join("generator.toml")).expect("settings");
        assert_eq!(settings, GeneratorSettings::default());
    }

    #[test]
    fn partial_settings_keep_remaining_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("generator.toml");
        std::fs::write(&path, "placement_attempts = 5\nair_defense_offset_nm = \"3,1\"\n").unwrap();
        let settings = load_settings(&path).expect("settings");
        assert_eq!(settings.placement_attempts, 5);
        assert_eq!(settings.air_defense_offset_nm, BoundedRange::new(1, 3));
        assert_eq!(settings.min_enemy_distance_nm, 15.0);
    }

    #[test]
    fn malformed_yaml_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("aircraft.yaml");
        std::fs::write(&path, "- id: [unclosed").unwrap();
        let err = load_aircraft(&path).unwrap_err();
        assert!(matches!(err, LibraryError::Yaml { .. }));
        assert!(err.to_string().contains("aircraft.yaml"));
    }
}
