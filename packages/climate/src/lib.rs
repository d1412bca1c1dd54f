#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Climate zone resolution.
//!
//! Loads the climate-zone polygon catalog from `GeoJSON` at startup,
//! builds an R-tree index, and answers point-in-polygon queries with the
//! zone's coarse (Building America) and fine (IECC zone number +
//! moisture regime) codes. Zones are assumed non-overlapping and
//! exhaustive over the serviceable area; a point outside every polygon
//! is a hard failure, never approximated to a nearby zone, because a
//! guessed zone would corrupt every downstream energy estimate.

pub mod energy_star;

use geo::{Contains, MultiPolygon, Point};
use geojson::GeoJson;
use rstar::{AABB, RTree, RTreeObject};
use serde::Serialize;
use thiserror::Error;

pub use energy_star::EnergyStarZones;

/// Errors from climate zone resolution.
#[derive(Debug, Error)]
pub enum ClimateError {
    /// The zone `GeoJSON` could not be parsed.
    #[error("Climate zone GeoJSON parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// No zone polygon contains the point.
    #[error("No climate zone found for ({latitude}, {longitude})")]
    ZoneNotFound {
        /// Query latitude.
        latitude: f64,
        /// Query longitude.
        longitude: f64,
    },

    /// The ENERGY STAR zone CSV could not be parsed.
    #[error("ENERGY STAR zone table parse error: {0}")]
    Csv(#[from] csv::Error),
}

/// The resolved climate classification for a point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneMatch {
    /// Coarse Building America zone label (e.g. "Cold", "Marine").
    pub ba_zone: String,
    /// Fine IECC code: zone number + moisture regime (e.g. "4C").
    pub iecc_code: String,
}

/// A zone polygon stored in the R-tree with its codes.
#[derive(Debug)]
struct ZoneEntry {
    ba_zone: String,
    iecc_code: String,
    envelope: AABB<[f64; 2]>,
    polygon: MultiPolygon<f64>,
}

impl RTreeObject for ZoneEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Pre-built spatial index over the climate zone polygons.
///
/// Constructed once and shared across all consumers.
#[derive(Debug)]
pub struct ZoneIndex {
    zones: RTree<ZoneEntry>,
}

impl ZoneIndex {
    /// Parses a `GeoJSON` `FeatureCollection` of zone polygons and
    /// builds the R-tree index.
    ///
    /// Expected feature properties: `BA_Climate_Zone` (string),
    /// `IECC_Climate_Zone` (number or string), `IECC_Moisture_Regime`
    /// (string, possibly empty for dry zones). Features with missing
    /// properties or unparseable geometry are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`ClimateError::Parse`] if the document is not a valid
    /// `FeatureCollection`.
    pub fn from_geojson(geojson_str: &str) -> Result<Self, ClimateError> {
        let geojson: GeoJson = geojson_str.parse().map_err(|e| ClimateError::Parse {
            message: format!("{e}"),
        })?;

        let GeoJson::FeatureCollection(collection) = geojson else {
            return Err(ClimateError::Parse {
                message: "expected a FeatureCollection".to_string(),
            });
        };

        let mut entries = Vec::new();
        for feature in collection.features {
            let Some(ba_zone) = feature
                .property("BA_Climate_Zone")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
            else {
                log::warn!("Skipping zone feature without BA_Climate_Zone");
                continue;
            };

            let Some(iecc_code) = iecc_code_from_properties(&feature) else {
                log::warn!("Skipping zone '{ba_zone}' without IECC properties");
                continue;
            };

            let Some(polygon) = feature
                .geometry
                .as_ref()
                .and_then(geometry_to_multipolygon)
            else {
                log::warn!("Failed to parse geometry for zone '{ba_zone}'");
                continue;
            };

            entries.push(ZoneEntry {
                ba_zone,
                iecc_code,
                envelope: compute_envelope(&polygon),
                polygon,
            });
        }

        log::info!("Loaded {} climate zone polygons", entries.len());
        Ok(Self {
            zones: RTree::bulk_load(entries),
        })
    }

    /// Resolves the climate zone containing a point.
    ///
    /// Zones tile the serviceable area without overlap, so the first
    /// containing polygon wins. A point exactly on a shared edge between
    /// two zones is not a supported input: which side it resolves to
    /// (or whether it resolves at all) is implementation-defined.
    ///
    /// # Errors
    ///
    /// Returns [`ClimateError::ZoneNotFound`] if no polygon contains the
    /// point. This is terminal for the request; there is no fallback.
    pub fn resolve(&self, point: Point<f64>) -> Result<ZoneMatch, ClimateError> {
        let query_env = AABB::from_point([point.x(), point.y()]);

        for entry in self.zones.locate_in_envelope_intersecting(&query_env) {
            if entry.polygon.contains(&point) {
                return Ok(ZoneMatch {
                    ba_zone: entry.ba_zone.clone(),
                    iecc_code: entry.iecc_code.clone(),
                });
            }
        }

        Err(ClimateError::ZoneNotFound {
            latitude: point.y(),
            longitude: point.x(),
        })
    }

    /// Number of indexed zone polygons.
    #[must_use]
    pub fn len(&self) -> usize {
        self.zones.size()
    }

    /// Whether the index holds no polygons.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zones.size() == 0
    }
}

/// Concatenates the IECC zone number and moisture regime into the fine
/// code (e.g. `4` + `C` -> `"4C"`). The zone number appears as either a
/// JSON number or string depending on the export.
fn iecc_code_from_properties(feature: &geojson::Feature) -> Option<String> {
    let zone_value = feature.property("IECC_Climate_Zone")?;
    let zone_number = zone_value.as_i64().map_or_else(
        || zone_value.as_str().map(str::to_string),
        |n| Some(n.to_string()),
    )?;

    let regime = feature
        .property("IECC_Moisture_Regime")
        .and_then(serde_json::Value::as_str)
        .unwrap_or("");

    Some(format!("{zone_number}{regime}"))
}

/// Converts a `GeoJSON` geometry into a [`MultiPolygon`], accepting both
/// `Polygon` and `MultiPolygon` geometry types.
fn geometry_to_multipolygon(geometry: &geojson::Geometry) -> Option<MultiPolygon<f64>> {
    let geo_geom: geo::Geometry<f64> = geometry.clone().try_into().ok()?;
    match geo_geom {
        geo::Geometry::MultiPolygon(mp) => Some(mp),
        geo::Geometry::Polygon(p) => Some(MultiPolygon(vec![p])),
        _ => None,
    }
}

/// Bounding box envelope for a [`MultiPolygon`].
fn compute_envelope(mp: &MultiPolygon<f64>) -> AABB<[f64; 2]> {
    use geo::BoundingRect;

    mp.bounding_rect().map_or_else(
        || AABB::from_point([0.0, 0.0]),
        |rect| AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]),
    )
}
