use std::collections::HashMap;
use std::path::Path;

use crate::{
    AircraftConfig, CoalitionConfig, GeneratorSettings, LibraryError, TheaterConfig,
    load_aircraft, load_coalitions, load_settings, load_theaters,
};

/// A catalog entry addressable by a string id.
pub trait Record {
    const KIND: &'static str;

    fn id(&self) -> &str;
}

impl Record for TheaterConfig {
    const KIND: &'static str = "theater";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for AircraftConfig {
    const KIND: &'static str = "aircraft";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for CoalitionConfig {
    const KIND: &'static str = "coalition";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Records in load order with a case-insensitive id index.
#[derive(Debug, Clone)]
pub struct Catalog<T> {
    records: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T: Record> Catalog<T> {
    pub fn new(records: Vec<T>) -> Result<Self, LibraryError> {
        let mut index = HashMap::new();
        for (idx, record) in records.iter().enumerate() {
            if index.insert(record.id().to_ascii_lowercase(), idx).is_some() {
                return Err(LibraryError::DuplicateId {
                    kind: T::KIND,
                    id: record.id().to_string(),
                });
            }
        }
        Ok(Self { records, index })
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.index
            .get(&id.to_ascii_lowercase())
            .and_then(|idx| self.records.get(*idx))
    }

    /// Like [`Catalog::get`] but a missing id is a [`LibraryError::Missing`].
    pub fn require(&self, id: &str) -> Result<&T, LibraryError> {
        self.get(id).ok_or_else(|| LibraryError::Missing {
            kind: T::KIND,
            id: id.to_string(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Every static catalog the generator reads, plus its tunables.
#[derive(Debug, Clone)]
pub struct Library {
    pub theaters: Catalog<TheaterConfig>,
    pub aircraft: Catalog<AircraftConfig>,
    pub coalitions: Catalog<CoalitionConfig>,
    pub settings: GeneratorSettings,
}

impl Library {
    /// Load the standard layout: `theaters/`, `aircraft.yaml`, `coalitions.yaml`, `generator.toml`.
    pub fn load<P: AsRef<Path>>(root: P) -> Result<Self, LibraryError> {
        let root = root.as_ref();
        let library = Self::from_parts(
            load_theaters(root.join("theaters"))?,
            load_aircraft(root.join("aircraft.yaml"))?,
            load_coalitions(root.join("coalitions.yaml"))?,
            load_settings(root.join("generator.toml"))?,
        )?;
        log::info!(
            "library loaded from {}: {} theater(s), {} aircraft, {} coalition(s)",
            root.display(),
            library.theaters.len(),
            library.aircraft.len(),
            library.coalitions.len()
        );
        Ok(library)
    }

    pub fn from_parts(
        theaters: Vec<TheaterConfig>,
        aircraft: Vec<AircraftConfig>,
        coalitions: Vec<CoalitionConfig>,
        settings: GeneratorSettings,
    ) -> Result<Self, LibraryError> {
        Ok(Self {
            theaters: Catalog::new(theaters)?,
            aircraft: Catalog::new(aircraft)?,
            coalitions: Catalog::new(coalitions)?,
            settings,
        })
    }
}
