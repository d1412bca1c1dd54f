//! Site resolution: everything derivable from the postal code alone.
//!
//! The resolved [`SiteContext`] is immutable once built; every later
//! pipeline stage reads it, none mutate it. The geocoding call is the
//! only network step; [`resolve_site_at`] covers the pure remainder so
//! tests and offline callers can skip the network entirely.

use geo::Point;
use serde::Serialize;
use window_scout_climate::ZoneMatch;
use window_scout_geocoder::{Coordinates, GeocoderConfig, nominatim};
use window_scout_weather::heating_cooling_periods;
use window_scout_weather_models::WeatherStation;

use crate::{PipelineError, ReferenceData};

/// Everything resolved from a postal code: coordinates, the nearest
/// station's climate normals, the climate zone codes, and the derived
/// heating/cooling period split.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteContext {
    /// The postal code this context was resolved for.
    pub postal_code: String,
    /// Resolved coordinates.
    pub coordinates: Coordinates,
    /// Nearest weather station (with climate normals).
    pub station: WeatherStation,
    /// Geodesic distance to the nearest station, kilometers.
    pub station_distance_km: f64,
    /// Resolved climate zone codes.
    pub zone: ZoneMatch,
    /// Heating period length, months.
    pub heating_period_months: f64,
    /// Cooling period length, months.
    pub cooling_period_months: f64,
    /// ENERGY STAR zone marker for the ZIP, if the crosswalk knows it.
    pub energy_star_zone: Option<String>,
}

/// Resolves the site context for known coordinates (no network).
///
/// # Errors
///
/// Returns [`PipelineError::Weather`] on an empty station catalog and
/// [`PipelineError::Climate`] if no zone polygon contains the point.
pub fn resolve_site_at(
    reference: &ReferenceData,
    postal_code: &str,
    coordinates: Coordinates,
) -> Result<SiteContext, PipelineError> {
    let point = Point::new(coordinates.longitude, coordinates.latitude);

    let nearest = reference.stations.nearest(point)?;
    let zone = reference.zones.resolve(point)?;

    let (heating_period_months, cooling_period_months) =
        heating_cooling_periods(nearest.station.normals.hdd, nearest.station.normals.cdd);

    let energy_star_zone = reference
        .energy_star
        .lookup(postal_code)
        .map(str::to_string);
    if energy_star_zone.is_none() {
        log::warn!("No ENERGY STAR zone for ZIP {postal_code}");
    }

    log::info!(
        "Resolved {postal_code}: station '{}' at {:.1} km, zone {}",
        nearest.station.name,
        nearest.distance_km,
        zone.iecc_code
    );

    Ok(SiteContext {
        postal_code: postal_code.to_string(),
        coordinates,
        station: nearest.station.clone(),
        station_distance_km: nearest.distance_km,
        zone,
        heating_period_months,
        cooling_period_months,
        energy_star_zone,
    })
}

/// Resolves the site context for a postal code, geocoding first.
///
/// # Errors
///
/// Returns [`PipelineError::Geocode`] if the postal code cannot be
/// resolved to coordinates, plus everything [`resolve_site_at`] can
/// return.
pub async fn resolve_site(
    client: &reqwest::Client,
    config: &GeocoderConfig,
    reference: &ReferenceData,
    postal_code: &str,
) -> Result<SiteContext, PipelineError> {
    let coordinates = nominatim::resolve_postal_code(client, config, postal_code).await?;
    resolve_site_at(reference, postal_code, coordinates)
}
