#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Weather station catalog and nearest-station search.
//!
//! The catalog is loaded once from CSV and queried per request. Distance
//! is geodesic (ellipsoidal earth) rather than a flat-earth
//! approximation: the station catalog spans a continental scale, where
//! flat approximations drift by kilometers at high latitudes.

use std::io::Read;

use geo::{Distance, Geodesic, Point};
use serde::Deserialize;
use thiserror::Error;
use window_scout_weather_models::{ClimateNormals, WeatherStation};

/// Errors from weather catalog operations.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The station CSV could not be read or parsed.
    #[error("Station catalog parse error: {0}")]
    Csv(#[from] csv::Error),

    /// Nearest-station search was attempted on an empty catalog.
    #[error("Weather station catalog is empty")]
    EmptyCatalog,
}

/// A nearest-station search result.
#[derive(Debug, Clone, PartialEq)]
pub struct NearestStation<'a> {
    /// The closest station in the catalog.
    pub station: &'a WeatherStation,
    /// Geodesic distance from the query point, kilometers.
    pub distance_km: f64,
}

/// One row of the station CSV.
#[derive(Debug, Deserialize)]
struct StationRecord {
    #[serde(rename = "Station_Name")]
    name: String,
    #[serde(rename = "Latitude")]
    latitude: f64,
    #[serde(rename = "Longitude")]
    longitude: f64,
    #[serde(rename = "HDH")]
    hdh: f64,
    #[serde(rename = "CDH")]
    cdh: f64,
    #[serde(rename = "HDD")]
    hdd: f64,
    #[serde(rename = "CDD")]
    cdd: f64,
    #[serde(rename = "winter_avg_temp")]
    winter_avg_temp: f64,
    #[serde(rename = "summer_avg_temp")]
    summer_avg_temp: f64,
    #[serde(rename = "GHI")]
    ghi: f64,
}

impl From<StationRecord> for WeatherStation {
    fn from(record: StationRecord) -> Self {
        Self {
            name: record.name,
            latitude: record.latitude,
            longitude: record.longitude,
            normals: ClimateNormals {
                hdh: record.hdh,
                cdh: record.cdh,
                hdd: record.hdd,
                cdd: record.cdd,
                winter_avg_temp: record.winter_avg_temp,
                summer_avg_temp: record.summer_avg_temp,
                ghi: record.ghi,
            },
        }
    }
}

/// Read-only weather station catalog.
///
/// Constructed once at startup and shared by all consumers.
#[derive(Debug, Clone)]
pub struct StationCatalog {
    stations: Vec<WeatherStation>,
}

impl StationCatalog {
    /// Builds a catalog from already-parsed stations (used by tests and
    /// callers with non-CSV sources).
    #[must_use]
    pub const fn new(stations: Vec<WeatherStation>) -> Self {
        Self { stations }
    }

    /// Loads the catalog from a station CSV.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherError::Csv`] if the CSV cannot be parsed.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self, WeatherError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut stations = Vec::new();
        for record in csv_reader.deserialize::<StationRecord>() {
            stations.push(WeatherStation::from(record?));
        }
        log::info!("Loaded {} weather stations", stations.len());
        Ok(Self { stations })
    }

    /// All stations in catalog order.
    #[must_use]
    pub fn stations(&self) -> &[WeatherStation] {
        &self.stations
    }

    /// Finds the station nearest to a point.
    ///
    /// Ties within floating-point precision resolve to the first station
    /// in catalog order (strict less-than comparison), which keeps the
    /// search deterministic across runs.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherError::EmptyCatalog`] if the catalog has no
    /// stations. Never fails otherwise: the search is unconditional,
    /// with no radius cutoff.
    pub fn nearest(&self, point: Point<f64>) -> Result<NearestStation<'_>, WeatherError> {
        let mut best: Option<NearestStation<'_>> = None;

        for station in &self.stations {
            let station_point = Point::new(station.longitude, station.latitude);
            let distance_km = Geodesic.distance(point, station_point) / 1000.0;

            match &best {
                Some(current) if distance_km >= current.distance_km => {}
                _ => {
                    best = Some(NearestStation {
                        station,
                        distance_km,
                    });
                }
            }
        }

        best.ok_or(WeatherError::EmptyCatalog)
    }
}

/// Splits the year into heating and cooling periods (months) from the
/// station's degree-day ratio. The two periods always sum to 12.
///
/// Precondition: `hdd + cdd > 0`. Every real station catalog satisfies
/// this; a station with zero degree-days in both modes is outside the
/// model and the split is undefined for it.
#[must_use]
pub fn heating_cooling_periods(hdd: f64, cdd: f64) -> (f64, f64) {
    let total = hdd + cdd;
    (hdd / total * 12.0, cdd / total * 12.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(name: &str, lat: f64, lon: f64) -> WeatherStation {
        WeatherStation {
            name: name.to_string(),
            latitude: lat,
            longitude: lon,
            normals: ClimateNormals {
                hdh: 50_000.0,
                cdh: 8_000.0,
                hdd: 5_500.0,
                cdd: 900.0,
                winter_avg_temp: 28.0,
                summer_avg_temp: 72.0,
                ghi: 3.9,
            },
        }
    }

    #[test]
    fn nearest_picks_the_closer_station() {
        let catalog = StationCatalog::new(vec![
            station("STATE COLLEGE", 40.79, -77.86),
            station("PITTSBURGH", 40.44, -80.00),
        ]);
        let result = catalog.nearest(Point::new(-77.9, 40.8)).unwrap();
        assert_eq!(result.station.name, "STATE COLLEGE");
    }

    #[test]
    fn coincident_point_has_zero_distance() {
        let catalog = StationCatalog::new(vec![station("EXACT", 40.79, -77.86)]);
        let result = catalog.nearest(Point::new(-77.86, 40.79)).unwrap();
        assert!(result.distance_km.abs() < 1e-9);
    }

    #[test]
    fn equidistant_tie_returns_first_in_catalog_order() {
        // Symmetric east/west placement around the query point.
        let catalog = StationCatalog::new(vec![
            station("WEST", 40.0, -78.0),
            station("EAST", 40.0, -76.0),
        ]);
        let result = catalog.nearest(Point::new(-77.0, 40.0)).unwrap();
        assert_eq!(result.station.name, "WEST");
    }

    #[test]
    fn empty_catalog_is_an_error() {
        let catalog = StationCatalog::new(Vec::new());
        assert!(matches!(
            catalog.nearest(Point::new(0.0, 0.0)),
            Err(WeatherError::EmptyCatalog)
        ));
    }

    #[test]
    fn nearest_is_deterministic() {
        let catalog = StationCatalog::new(vec![
            station("A", 40.79, -77.86),
            station("B", 41.25, -77.05),
            station("C", 40.50, -78.40),
        ]);
        let point = Point::new(-77.5, 40.9);
        let first = catalog.nearest(point).unwrap().station.name.clone();
        for _ in 0..10 {
            assert_eq!(catalog.nearest(point).unwrap().station.name, first);
        }
    }

    #[test]
    fn loads_stations_from_csv() {
        let data = "\
Station_Name,Latitude,Longitude,HDH,CDH,HDD,CDD,winter_avg_temp,summer_avg_temp,GHI
STATE COLLEGE,40.79,-77.86,52000,7400,5800,800,27.5,70.2,3.8
PHOENIX,33.43,-112.02,11000,55000,1100,4500,56.1,93.4,5.7
";
        let catalog = StationCatalog::from_csv(data.as_bytes()).unwrap();
        assert_eq!(catalog.stations().len(), 2);
        assert_eq!(catalog.stations()[1].name, "PHOENIX");
        assert!((catalog.stations()[1].normals.cdh - 55_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn periods_sum_to_twelve_months() {
        let (heating, cooling) = heating_cooling_periods(5_800.0, 800.0);
        assert!((heating + cooling - 12.0).abs() < 1e-12);
        assert!(heating > cooling);
    }
}
