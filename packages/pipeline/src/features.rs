//! Feature vectors and the prediction seam.
//!
//! The trained load models are consumed behind [`LoadPredictor`]: an
//! opaque function from (target, feature vector) to a raw predicted
//! value. Any categorical encoding a concrete model needs is that
//! model's internal concern; the pipeline only guarantees the feature
//! set assembled here.

use std::collections::BTreeMap;
use std::io::Read;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use window_scout_building::Vintage;

/// The four model targets.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PredictTarget {
    /// Whole-home cooling load.
    CoolingLoad,
    /// Whole-home heating load.
    HeatingLoad,
    /// Window contribution to the cooling load.
    CoolingWindow,
    /// Window contribution to the heating load.
    HeatingWindow,
}

/// The exact feature set fed to the prediction function, one vector per
/// window candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureVector {
    /// Coarse Building America climate zone label.
    pub climate_zone: String,
    /// Postal code.
    pub postal_code: String,
    /// Construction vintage.
    pub vintage: Vintage,
    /// Front orientation, compass degrees.
    pub orientation_degrees: f64,
    /// Window product name.
    pub window_type: String,
    /// Window-to-wall ratio, percent.
    pub wwr_percent: f64,
    /// Predicted total window area.
    pub window_area: f64,
    /// Window U-factor.
    pub u_factor: f64,
    /// Window solar heat gain coefficient.
    pub shgc: f64,
    /// Cooling setpoint, degrees F.
    pub cooling_setpoint: f64,
    /// Heating setpoint, degrees F.
    pub heating_setpoint: f64,
    /// Heating degree-hours at the nearest station.
    pub hdh: f64,
    /// Cooling degree-hours at the nearest station.
    pub cdh: f64,
    /// Average winter temperature at the nearest station.
    pub winter_avg_temp: f64,
    /// Average summer temperature at the nearest station.
    pub summer_avg_temp: f64,
    /// Global horizontal irradiance at the nearest station.
    pub ghi: f64,
    /// Conditioned floor area.
    pub conditioned_area: f64,
    /// Envelope surface-to-volume ratio.
    pub surface_to_volume: f64,
}

/// Error from a prediction function.
#[derive(Debug, thiserror::Error)]
#[error("Prediction failed for {target} / '{window_type}': {message}")]
pub struct PredictError {
    /// The requested target.
    pub target: PredictTarget,
    /// The window candidate being evaluated.
    pub window_type: String,
    /// Description of the failure.
    pub message: String,
}

/// An opaque prediction function over assembled feature vectors.
pub trait LoadPredictor {
    /// Predicts a raw value for one target.
    ///
    /// # Errors
    ///
    /// Returns [`PredictError`] if the model cannot produce a value for
    /// this (target, feature vector) pair.
    fn predict(&self, target: PredictTarget, features: &FeatureVector)
    -> Result<f64, PredictError>;
}

/// A table-backed predictor keyed by (window name, target).
///
/// Used by the CLI (precomputed predictions supplied as data) and by
/// tests as a deterministic stub.
#[derive(Debug, Clone, Default)]
pub struct TablePredictor {
    values: BTreeMap<(String, PredictTarget), f64>,
}

/// One row of a predictions CSV.
#[derive(Debug, Deserialize)]
struct PredictionRecord {
    window_type: String,
    cooling_load: f64,
    heating_load: f64,
    cooling_window: f64,
    heating_window: f64,
}

impl TablePredictor {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value for one (window, target) pair.
    pub fn insert(&mut self, window_type: &str, target: PredictTarget, value: f64) {
        self.values.insert((window_type.to_string(), target), value);
    }

    /// Loads predictions from a CSV with columns `window_type`,
    /// `cooling_load`, `heating_load`, `cooling_window`,
    /// `heating_window`.
    ///
    /// # Errors
    ///
    /// Returns the underlying CSV error if parsing fails.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self, csv::Error> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut predictor = Self::new();
        for record in csv_reader.deserialize::<PredictionRecord>() {
            let record = record?;
            predictor.insert(&record.window_type, PredictTarget::CoolingLoad, record.cooling_load);
            predictor.insert(&record.window_type, PredictTarget::HeatingLoad, record.heating_load);
            predictor.insert(
                &record.window_type,
                PredictTarget::CoolingWindow,
                record.cooling_window,
            );
            predictor.insert(
                &record.window_type,
                PredictTarget::HeatingWindow,
                record.heating_window,
            );
        }
        Ok(predictor)
    }
}

impl LoadPredictor for TablePredictor {
    fn predict(
        &self,
        target: PredictTarget,
        features: &FeatureVector,
    ) -> Result<f64, PredictError> {
        self.values
            .get(&(features.window_type.clone(), target))
            .copied()
            .ok_or_else(|| PredictError {
                target,
                window_type: features.window_type.clone(),
                message: "no prediction in table".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(window_type: &str) -> FeatureVector {
        FeatureVector {
            climate_zone: "Cold".to_string(),
            postal_code: "16803".to_string(),
            vintage: Vintage::Eighties,
            orientation_degrees: 180.0,
            window_type: window_type.to_string(),
            wwr_percent: 15.0,
            window_area: 280.0,
            u_factor: 0.35,
            shgc: 0.44,
            cooling_setpoint: 75.0,
            heating_setpoint: 68.0,
            hdh: 52_000.0,
            cdh: 7_400.0,
            winter_avg_temp: 27.5,
            summer_avg_temp: 70.2,
            ghi: 3.8,
            conditioned_area: 1_800.0,
            surface_to_volume: 0.2,
        }
    }

    #[test]
    fn table_predictor_round_trips_values() {
        let mut predictor = TablePredictor::new();
        predictor.insert("A", PredictTarget::CoolingLoad, 120.5);
        let value = predictor
            .predict(PredictTarget::CoolingLoad, &features("A"))
            .unwrap();
        assert!((value - 120.5).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_prediction_is_an_error() {
        let predictor = TablePredictor::new();
        let err = predictor
            .predict(PredictTarget::HeatingLoad, &features("A"))
            .unwrap_err();
        assert_eq!(err.target, PredictTarget::HeatingLoad);
    }

    #[test]
    fn loads_predictions_from_csv() {
        let data = "\
window_type,cooling_load,heating_load,cooling_window,heating_window
Single-pane window,120.0,300.0,48.0,120.0
Triple-pane window,100.0,250.0,12.0,25.0
";
        let predictor = TablePredictor::from_csv(data.as_bytes()).unwrap();
        let value = predictor
            .predict(PredictTarget::HeatingWindow, &features("Triple-pane window"))
            .unwrap();
        assert!((value - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn target_labels_are_snake_case() {
        assert_eq!(PredictTarget::CoolingLoad.to_string(), "cooling_load");
        assert_eq!(PredictTarget::HeatingWindow.to_string(), "heating_window");
    }
}
