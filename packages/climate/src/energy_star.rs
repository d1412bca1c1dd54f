//! ZIP-keyed ENERGY STAR climate zone lookup.
//!
//! A flat crosswalk from ZIP code to the ENERGY STAR window climate
//! zone marker. The marker is matched against window product names by
//! the recommendation filter downstream.

use std::collections::BTreeMap;
use std::io::Read;

use serde::Deserialize;

use crate::ClimateError;

/// One row of the ENERGY STAR zone CSV.
#[derive(Debug, Deserialize)]
struct ZoneRecord {
    #[serde(rename = "Zip Code")]
    zip_code: String,
    #[serde(rename = "ENERGY STAR Zone")]
    zone: String,
}

/// ZIP code -> ENERGY STAR zone crosswalk.
#[derive(Debug, Clone, Default)]
pub struct EnergyStarZones {
    zones: BTreeMap<String, String>,
}

impl EnergyStarZones {
    /// Loads the crosswalk from CSV.
    ///
    /// # Errors
    ///
    /// Returns [`ClimateError::Csv`] if the CSV cannot be parsed.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self, ClimateError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut zones = BTreeMap::new();
        for record in csv_reader.deserialize::<ZoneRecord>() {
            let record = record?;
            zones.insert(record.zip_code, record.zone);
        }
        log::info!("Loaded {} ZIP -> ENERGY STAR zone mappings", zones.len());
        Ok(Self { zones })
    }

    /// The ENERGY STAR zone for a ZIP code, if known.
    #[must_use]
    pub fn lookup(&self, zip_code: &str) -> Option<&str> {
        self.zones.get(zip_code).map(String::as_str)
    }
}
