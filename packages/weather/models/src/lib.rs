#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Weather station reference types.
//!
//! A station is a fixed geographic point with long-term climate normals
//! attached. The catalog is read-only reference data loaded once per
//! process; stations are never mutated after load.

use serde::{Deserialize, Serialize};

/// Long-term climate statistics for a station.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClimateNormals {
    /// Heating degree-hours.
    pub hdh: f64,
    /// Cooling degree-hours.
    pub cdh: f64,
    /// Heating degree-days.
    pub hdd: f64,
    /// Cooling degree-days.
    pub cdd: f64,
    /// Average winter temperature (degrees F).
    pub winter_avg_temp: f64,
    /// Average summer temperature (degrees F).
    pub summer_avg_temp: f64,
    /// Global horizontal irradiance.
    pub ghi: f64,
}

/// A weather station with its location and climate normals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherStation {
    /// Station name / identifier.
    pub name: String,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Climate normals observed at this station.
    pub normals: ClimateNormals,
}
