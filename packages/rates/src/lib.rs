#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Utility rate lookup by ZIP code.
//!
//! Two read-only tables: a ZIP -> state crosswalk, and a per-state rate
//! table with an `Electricity` column (cents/kWh) plus one column per
//! heating fuel. Electricity is converted to dollars per MMBtu so both
//! rates share an energy basis.

use std::collections::BTreeMap;
use std::io::Read;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// MMBtu delivered per kWh of electricity.
const MBTU_PER_KWH: f64 = 0.003_413;

/// Errors from rate lookups.
#[derive(Debug, Error)]
pub enum RatesError {
    /// A rate or crosswalk CSV could not be parsed.
    #[error("Rate table parse error: {0}")]
    Csv(#[from] csv::Error),

    /// The ZIP code is not in the crosswalk.
    #[error("No state found for ZIP code '{zip_code}'")]
    UnknownZip {
        /// The unmatched ZIP code.
        zip_code: String,
    },

    /// The state has no row in the rate table.
    #[error("No utility rates for state '{state}'")]
    UnknownState {
        /// The unmatched state abbreviation.
        state: String,
    },

    /// The requested heating fuel has no column in the rate table.
    #[error("Unknown heating fuel '{fuel}'")]
    UnknownFuel {
        /// The unmatched fuel name.
        fuel: String,
    },
}

/// Electricity and heating fuel rates for a location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelRates {
    /// Electricity rate, dollars per MMBtu.
    pub electricity_rate: f64,
    /// Heating fuel rate, as listed in the rate table.
    pub heating_fuel_rate: f64,
}

/// One row of the ZIP -> state crosswalk CSV.
#[derive(Debug, Deserialize)]
struct ZipStateRecord {
    #[serde(rename = "Zip Code")]
    zip_code: String,
    #[serde(rename = "State Abbrev.")]
    state: String,
}

struct StateRates {
    /// Electricity rate, cents/kWh, as listed.
    electricity_cents: f64,
    /// Fuel column name -> rate.
    fuels: BTreeMap<String, f64>,
}

/// Read-only utility rate lookup over both tables.
pub struct UtilityRates {
    zip_to_state: BTreeMap<String, String>,
    by_state: BTreeMap<String, StateRates>,
}

impl UtilityRates {
    /// Loads the crosswalk and rate CSVs.
    ///
    /// The rate table must have `State` and `Electricity` columns; every
    /// other column is treated as a heating fuel.
    ///
    /// # Errors
    ///
    /// Returns [`RatesError::Csv`] if either CSV cannot be parsed.
    pub fn from_csv<R1: Read, R2: Read>(
        zip_state_reader: R1,
        rates_reader: R2,
    ) -> Result<Self, RatesError> {
        let mut zip_to_state = BTreeMap::new();
        let mut csv_reader = csv::Reader::from_reader(zip_state_reader);
        for record in csv_reader.deserialize::<ZipStateRecord>() {
            let record = record?;
            zip_to_state.insert(record.zip_code, record.state.to_uppercase());
        }
        log::info!("Loaded {} ZIP -> state mappings", zip_to_state.len());

        let mut by_state = BTreeMap::new();
        let mut csv_reader = csv::Reader::from_reader(rates_reader);
        let headers = csv_reader.headers()?.clone();
        for record in csv_reader.records() {
            let record = record?;
            let mut state = None;
            let mut electricity_cents = None;
            let mut fuels = BTreeMap::new();

            for (header, value) in headers.iter().zip(record.iter()) {
                match header.trim() {
                    "State" => state = Some(value.trim().to_uppercase()),
                    "Electricity" => electricity_cents = value.trim().parse::<f64>().ok(),
                    fuel => {
                        if let Ok(rate) = value.trim().parse::<f64>() {
                            fuels.insert(fuel.to_string(), rate);
                        }
                    }
                }
            }

            let (Some(state), Some(electricity_cents)) = (state, electricity_cents) else {
                log::warn!("Skipping rate row with missing state or electricity rate");
                continue;
            };
            by_state.insert(
                state,
                StateRates {
                    electricity_cents,
                    fuels,
                },
            );
        }
        log::info!("Loaded utility rates for {} states", by_state.len());

        Ok(Self {
            zip_to_state,
            by_state,
        })
    }

    /// The state abbreviation for a ZIP code.
    ///
    /// # Errors
    ///
    /// Returns [`RatesError::UnknownZip`] if the ZIP is not in the
    /// crosswalk.
    pub fn state_for_zip(&self, zip_code: &str) -> Result<&str, RatesError> {
        self.zip_to_state
            .get(zip_code)
            .map(String::as_str)
            .ok_or_else(|| RatesError::UnknownZip {
                zip_code: zip_code.to_string(),
            })
    }

    /// Electricity and heating fuel rates for a ZIP code.
    ///
    /// Fuel names are matched against rate table columns in title case
    /// (`"natural gas"` matches a `Natural Gas` column).
    ///
    /// # Errors
    ///
    /// Returns [`RatesError::UnknownZip`], [`RatesError::UnknownState`],
    /// or [`RatesError::UnknownFuel`] when the respective key misses.
    pub fn rates(&self, zip_code: &str, fuel: &str) -> Result<FuelRates, RatesError> {
        let state = self.state_for_zip(zip_code)?;
        let state_rates = self
            .by_state
            .get(state)
            .ok_or_else(|| RatesError::UnknownState {
                state: state.to_string(),
            })?;

        let fuel_title = title_case(fuel);
        let heating_fuel_rate = state_rates.fuels.get(&fuel_title).copied().ok_or_else(|| {
            RatesError::UnknownFuel {
                fuel: fuel.to_string(),
            }
        })?;

        Ok(FuelRates {
            electricity_rate: state_rates.electricity_cents * 0.01 / MBTU_PER_KWH,
            heating_fuel_rate,
        })
    }
}

/// Title-cases a fuel name to match rate table column headers.
fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}
