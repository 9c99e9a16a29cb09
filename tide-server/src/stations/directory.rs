//! Station name/reference lookup.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::io::Read;
use std::path::Path;

use tracing::{info, warn};

use crate::domain::Station;

use super::error::StationError;

/// Read-only index over the stations table.
///
/// Both names and references resolve to the first matching row when the
/// table repeats one.
#[derive(Debug, Clone, Default)]
pub struct StationDirectory {
    stations: Vec<Station>,
    by_name: HashMap<String, usize>,
    by_reference: HashMap<String, usize>,
}

impl StationDirectory {
    /// Build a directory from stations already in memory.
    pub fn from_stations(stations: Vec<Station>) -> Self {
        let mut by_name = HashMap::new();
        let mut by_reference = HashMap::new();

        for (idx, station) in stations.iter().enumerate() {
            by_name.entry(station.station_name.clone()).or_insert(idx);
            match by_reference.entry(station.station_reference.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(idx);
                }
                Entry::Occupied(_) => warn!(
                    reference = %station.station_reference,
                    "duplicate station reference; keeping the first row"
                ),
            }
        }

        Self {
            stations,
            by_name,
            by_reference,
        }
    }

    /// Load `stations.csv` from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StationError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let directory = Self::from_reader(file)?;

        info!(path = %path.display(), stations = directory.len(), "loaded stations");
        Ok(directory)
    }

    /// Parse stations from any CSV source with a header row.
    pub fn from_reader(reader: impl Read) -> Result<Self, StationError> {
        let mut csv = csv::Reader::from_reader(reader);
        let stations = csv
            .deserialize()
            .collect::<Result<Vec<Station>, csv::Error>>()?;
        Ok(Self::from_stations(stations))
    }

    pub fn by_name(&self, name: &str) -> Option<&Station> {
        self.by_name.get(name).map(|&idx| &self.stations[idx])
    }

    pub fn by_reference(&self, reference: &str) -> Option<&Station> {
        self.by_reference.get(reference).map(|&idx| &self.stations[idx])
    }

    /// Geocoding URL of the station called `name`.
    pub fn find_by_name(&self, name: &str) -> Option<&str> {
        self.by_name(name).map(|s| s.station_url.as_str())
    }

    /// Geocoding URL of the station with `reference`.
    pub fn find_by_reference(&self, reference: &str) -> Option<&str> {
        self.by_reference(reference).map(|s| s.station_url.as_str())
    }

    pub fn name_to_reference(&self, name: &str) -> Option<&str> {
        self.by_name(name).map(|s| s.station_reference.as_str())
    }

    pub fn reference_to_name(&self, reference: &str) -> Option<&str> {
        self.by_reference(reference).map(|s| s.station_name.as_str())
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn contains_reference(&self, reference: &str) -> bool {
        self.by_reference.contains_key(reference)
    }

    /// All stations in file order.
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}
