#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! End-to-end window evaluation pipeline.
//!
//! Turns (postal code, building description, window candidates, utility
//! bills) into a ranked, baseline-relative window result table:
//!
//! 1. postal code -> coordinates (the single network step);
//! 2. coordinates -> nearest weather station and climate zone, in
//!    parallel conceptually, both pure lookups;
//! 3. building attributes + zone -> infiltration option and envelope
//!    geometry;
//! 4. per-candidate feature vector -> opaque prediction function;
//! 5. raw predictions -> attribution engine -> ranked results.
//!
//! Reference catalogs are loaded once into a [`ReferenceData`] value
//! and passed explicitly into every call; the pipeline itself holds no
//! ambient state and is a pure function of its inputs past step 1.

pub mod evaluate;
pub mod features;
pub mod site;

use thiserror::Error;
use window_scout_attribution::AttributionError;
use window_scout_climate::{ClimateError, EnergyStarZones, ZoneIndex};
use window_scout_geocoder::GeocodeError;
use window_scout_infiltration::{InfiltrationError, InfiltrationTable};
use window_scout_weather::{StationCatalog, WeatherError};
use window_scout_windows::WindowCatalog;

pub use evaluate::{BuildingDescriptor, EvaluationOutcome, EvaluationRequest, evaluate, evaluate_site};
pub use features::{FeatureVector, LoadPredictor, PredictError, PredictTarget, TablePredictor};
pub use site::{SiteContext, resolve_site, resolve_site_at};

/// Errors from any stage of the evaluation pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Postal code could not be resolved to coordinates.
    #[error(transparent)]
    Geocode(#[from] GeocodeError),

    /// Weather station lookup failed.
    #[error(transparent)]
    Weather(#[from] WeatherError),

    /// Climate zone resolution failed.
    #[error(transparent)]
    Climate(#[from] ClimateError),

    /// Infiltration option lookup failed.
    #[error(transparent)]
    Infiltration(#[from] InfiltrationError),

    /// The prediction function failed.
    #[error(transparent)]
    Predict(#[from] PredictError),

    /// Attribution failed (e.g. missing baseline).
    #[error(transparent)]
    Attribution(#[from] AttributionError),
}

/// The read-only reference catalogs, loaded once per process.
///
/// Every resolver call receives this explicitly; nothing in the
/// pipeline reads ambient state.
pub struct ReferenceData {
    /// Weather station catalog.
    pub stations: StationCatalog,
    /// Climate zone polygon index.
    pub zones: ZoneIndex,
    /// Infiltration reference table.
    pub infiltration: InfiltrationTable,
    /// ZIP -> ENERGY STAR zone crosswalk.
    pub energy_star: EnergyStarZones,
    /// Window product catalog (defaults plus session customs).
    pub windows: WindowCatalog,
}
