//! Window candidate evaluation over a resolved site.
//!
//! Pure past the site-resolution step: the same request, reference data,
//! and predictor always produce the same outcome. Candidate evaluation
//! is independent per window; only the baseline-delta step inside the
//! attribution engine needs the complete set.

use serde::{Deserialize, Serialize};
use window_scout_attribution::{
    BillingInputs, CandidateLoads, RawLoads, WindowResult, attribute, energy_star_matches,
    rank_by_lifetime_cost,
};
use window_scout_building::{BuildingType, Foundation, GeometryPlan, Orientation, Vintage};
use window_scout_geocoder::GeocoderConfig;
use window_scout_infiltration::InfiltrationOption;

use crate::features::{FeatureVector, LoadPredictor, PredictTarget};
use crate::site::{SiteContext, resolve_site};
use crate::{PipelineError, ReferenceData};

/// User-entered building description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BuildingDescriptor {
    /// Building type.
    pub building_type: BuildingType,
    /// Foundation class.
    pub foundation: Foundation,
    /// Above-grade story count (>= 1; validated by the form layer).
    pub stories: u32,
    /// Conditioned floor area, square feet (> 0; validated by the form
    /// layer).
    pub conditioned_area: f64,
    /// Construction vintage.
    pub vintage: Vintage,
    /// Front orientation.
    pub orientation: Orientation,
    /// Heating setpoint, degrees F.
    pub heating_setpoint: f64,
    /// Cooling setpoint, degrees F.
    pub cooling_setpoint: f64,
    /// Whether the home has heating equipment.
    #[serde(default = "default_true")]
    pub has_heating: bool,
    /// Whether the home has cooling equipment.
    #[serde(default = "default_true")]
    pub has_cooling: bool,
}

const fn default_true() -> bool {
    true
}

/// One full evaluation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EvaluationRequest {
    /// Postal code identifying the site.
    pub postal_code: String,
    /// Building description.
    pub building: BuildingDescriptor,
    /// Window-to-wall ratio, percent (e.g. 9, 15, 30).
    pub wwr_percent: f64,
    /// Name of the baseline window; must exist in the catalog.
    pub baseline_window: String,
    /// Monthly utility bill during the cooling season, dollars.
    pub summer_bill: f64,
    /// Monthly utility bill during the heating season, dollars.
    pub winter_bill: f64,
}

/// The fully-evaluated outcome: resolved site, derived geometry, the
/// infiltration option, and the ranked result table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationOutcome {
    /// Resolved site context.
    pub site: SiteContext,
    /// Envelope surface-to-volume ratio.
    pub surface_to_volume: f64,
    /// Predicted total window area.
    pub window_area: f64,
    /// Selected airtightness option.
    pub infiltration: InfiltrationOption,
    /// Attributed results, ranked ascending by lifetime total cost.
    pub results: Vec<WindowResult>,
    /// Names of candidates matching the site's ENERGY STAR zone marker,
    /// in ranked order. Empty when the marker is unknown.
    pub recommended: Vec<String>,
}

/// Evaluates every catalog window against an already-resolved site.
///
/// # Errors
///
/// Returns [`PipelineError::Infiltration`] if no infiltration row
/// matches the site/building key, [`PipelineError::Predict`] if the
/// predictor fails, and [`PipelineError::Attribution`] if the baseline
/// window is absent from the catalog.
pub fn evaluate_site(
    reference: &ReferenceData,
    site: &SiteContext,
    request: &EvaluationRequest,
    predictor: &dyn LoadPredictor,
) -> Result<EvaluationOutcome, PipelineError> {
    let building = &request.building;

    let plan = GeometryPlan::for_building(
        building.building_type,
        building.foundation,
        building.stories,
    );
    let surface_to_volume = plan.surface_to_volume_ratio(building.conditioned_area);
    let window_area = plan.window_area(building.conditioned_area, request.wwr_percent * 0.01);

    let infiltration = reference.infiltration.lookup(
        &site.zone.iecc_code,
        building.conditioned_area,
        building.vintage,
    )?;

    let mut candidates = Vec::with_capacity(reference.windows.candidates().len());
    for window in reference.windows.candidates() {
        let features = FeatureVector {
            climate_zone: site.zone.ba_zone.clone(),
            postal_code: site.postal_code.clone(),
            vintage: building.vintage,
            orientation_degrees: building.orientation.degrees(),
            window_type: window.name.clone(),
            wwr_percent: request.wwr_percent,
            window_area,
            u_factor: window.u_factor,
            shgc: window.shgc,
            cooling_setpoint: building.cooling_setpoint,
            heating_setpoint: building.heating_setpoint,
            hdh: site.station.normals.hdh,
            cdh: site.station.normals.cdh,
            winter_avg_temp: site.station.normals.winter_avg_temp,
            summer_avg_temp: site.station.normals.summer_avg_temp,
            ghi: site.station.normals.ghi,
            conditioned_area: building.conditioned_area,
            surface_to_volume,
        };

        // Absent equipment means no demand in that mode; skip the
        // model rather than predicting a load that cannot exist.
        let (cooling_load, cooling_window) = if building.has_cooling {
            (
                predictor.predict(PredictTarget::CoolingLoad, &features)?,
                predictor.predict(PredictTarget::CoolingWindow, &features)?,
            )
        } else {
            (0.0, 0.0)
        };
        let (heating_load, heating_window) = if building.has_heating {
            (
                predictor.predict(PredictTarget::HeatingLoad, &features)?,
                predictor.predict(PredictTarget::HeatingWindow, &features)?,
            )
        } else {
            (0.0, 0.0)
        };

        candidates.push(CandidateLoads {
            name: window.name.clone(),
            loads: RawLoads {
                cooling_load,
                heating_load,
                cooling_window,
                heating_window,
            },
        });
    }

    let billing = BillingInputs {
        summer_bill: request.summer_bill,
        winter_bill: request.winter_bill,
        heating_period_months: site.heating_period_months,
        cooling_period_months: site.cooling_period_months,
    };

    let mut results = attribute(&candidates, &billing, &request.baseline_window)?;
    rank_by_lifetime_cost(&mut results);

    let recommended = site.energy_star_zone.as_ref().map_or_else(Vec::new, |zone| {
        energy_star_matches(&results, zone)
            .into_iter()
            .map(|r| r.name.clone())
            .collect()
    });

    Ok(EvaluationOutcome {
        site: site.clone(),
        surface_to_volume,
        window_area,
        infiltration,
        results,
        recommended,
    })
}

/// Runs the whole pipeline for a request, geocoding first.
///
/// # Errors
///
/// Everything [`resolve_site`](crate::site::resolve_site) and
/// [`evaluate_site`] can return.
pub async fn evaluate(
    client: &reqwest::Client,
    config: &GeocoderConfig,
    reference: &ReferenceData,
    request: &EvaluationRequest,
    predictor: &dyn LoadPredictor,
) -> Result<EvaluationOutcome, PipelineError> {
    let site = resolve_site(client, config, reference, &request.postal_code).await?;
    evaluate_site(reference, &site, request, predictor)
}

#[cfg(test)]
mod tests {
    use window_scout_climate::{EnergyStarZones, ZoneIndex};
    use window_scout_geocoder::Coordinates;
    use window_scout_infiltration::InfiltrationTable;
    use window_scout_weather::StationCatalog;
    use window_scout_weather_models::{ClimateNormals, WeatherStation};
    use window_scout_windows::{WindowCandidate, WindowCatalog};

    use super::*;
    use crate::features::TablePredictor;
    use crate::site::resolve_site_at;

    // Synthetic site: a station exactly at the test point, inside a
    // single 4C zone polygon.
    const TEST_LAT: f64 = 46.0;
    const TEST_LON: f64 = -122.0;

    fn reference_data() -> ReferenceData {
        let stations = StationCatalog::new(vec![WeatherStation {
            name: "X".to_string(),
            latitude: TEST_LAT,
            longitude: TEST_LON,
            normals: ClimateNormals {
                hdh: 48_000.0,
                cdh: 6_000.0,
                hdd: 4_800.0,
                cdd: 1_200.0,
                winter_avg_temp: 35.0,
                summer_avg_temp: 68.0,
                ghi: 3.5,
            },
        }]);

        let zones = ZoneIndex::from_geojson(
            &serde_json::json!({
                "type": "FeatureCollection",
                "features": [{
                    "type": "Feature",
                    "properties": {
                        "BA_Climate_Zone": "Marine",
                        "IECC_Climate_Zone": 4,
                        "IECC_Moisture_Regime": "C"
                    },
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[
                            [-123.0, 45.0], [-121.0, 45.0],
                            [-121.0, 47.0], [-123.0, 47.0],
                            [-123.0, 45.0]
                        ]]
                    }
                }]
            })
            .to_string(),
        )
        .unwrap();

        let infiltration = InfiltrationTable::from_csv(
            "\
IECC Climate Zone,Floor Area,Vintage,Option 1,Option 2,Option 3
4C,0-1499,1980s,4.5,7.0,6.0
4C,1500-1999,1980s,4.0,8.0,12.5
4C,2000+,1980s,3.5,6.0,9.0
"
            .as_bytes(),
        )
        .unwrap();

        let energy_star =
            EnergyStarZones::from_csv("Zip Code,ENERGY STAR Zone\n98601,Northern\n".as_bytes())
                .unwrap();

        let windows = WindowCatalog::new(vec![
            WindowCandidate {
                name: "Single-pane window".to_string(),
                u_factor: 1.04,
                shgc: 0.76,
            },
            WindowCandidate {
                name: "Double-pane low-E window".to_string(),
                u_factor: 0.35,
                shgc: 0.44,
            },
            WindowCandidate {
                name: "Triple-pane Northern window".to_string(),
                u_factor: 0.17,
                shgc: 0.25,
            },
        ]);

        ReferenceData {
            stations,
            zones,
            infiltration,
            energy_star,
            windows,
        }
    }

    fn stub_predictor() -> TablePredictor {
        let mut predictor = TablePredictor::new();
        // Distinct U-factors map to strictly decreasing window
        // contributions, so the expected ranking is hand-computable.
        for (name, cooling_window, heating_window) in [
            ("Single-pane window", 48.0, 150.0),
            ("Double-pane low-E window", 24.0, 75.0),
            ("Triple-pane Northern window", 10.0, 30.0),
        ] {
            predictor.insert(name, PredictTarget::CoolingLoad, 120.0);
            predictor.insert(name, PredictTarget::HeatingLoad, 300.0);
            predictor.insert(name, PredictTarget::CoolingWindow, cooling_window);
            predictor.insert(name, PredictTarget::HeatingWindow, heating_window);
        }
        predictor
    }

    fn request() -> EvaluationRequest {
        EvaluationRequest {
            postal_code: "98601".to_string(),
            building: BuildingDescriptor {
                building_type: BuildingType::SingleFamilyDetached,
                foundation: Foundation::HeatedBasement,
                stories: 1,
                conditioned_area: 1_800.0,
                vintage: Vintage::Eighties,
                orientation: Orientation::South,
                heating_setpoint: 68.0,
                cooling_setpoint: 75.0,
                has_heating: true,
                has_cooling: true,
            },
            wwr_percent: 15.0,
            baseline_window: "Single-pane window".to_string(),
            summer_bill: 120.0,
            winter_bill: 180.0,
        }
    }

    fn coordinates() -> Coordinates {
        Coordinates {
            latitude: TEST_LAT,
            longitude: TEST_LON,
        }
    }

    #[test]
    fn site_resolution_matches_synthetic_catalogs() {
        let reference = reference_data();
        let site = resolve_site_at(&reference, "98601", coordinates()).unwrap();
        assert_eq!(site.station.name, "X");
        assert!(site.station_distance_km.abs() < 1e-9);
        assert_eq!(site.zone.iecc_code, "4C");
        assert_eq!(site.energy_star_zone.as_deref(), Some("Northern"));
        assert!((site.heating_period_months + site.cooling_period_months - 12.0).abs() < 1e-9);
    }

    #[test]
    fn end_to_end_evaluation_ranks_by_lifetime_cost() {
        let reference = reference_data();
        let site = resolve_site_at(&reference, "98601", coordinates()).unwrap();
        let outcome = evaluate_site(&reference, &site, &request(), &stub_predictor()).unwrap();

        // 1800 sq ft falls in the 1500-1999 bin; Option 3 has the max
        // ACH50 there.
        assert_eq!(outcome.infiltration.index, 3);
        assert!((outcome.infiltration.ach50 - 12.5).abs() < f64::EPSILON);

        // Deterministic geometry for 1 story + heated basement.
        assert!((outcome.surface_to_volume - 0.201_633_118_599_987).abs() < 1e-9);

        // Lower window contributions mean lower lifetime cost.
        let names: Vec<&str> = outcome.results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Triple-pane Northern window",
                "Double-pane low-E window",
                "Single-pane window",
            ]
        );

        // The baseline's own savings are exactly zero.
        let baseline = outcome
            .results
            .iter()
            .find(|r| r.name == "Single-pane window")
            .unwrap();
        assert!(baseline.monthly_savings.abs() < f64::EPSILON);
        // Everything else saves money relative to single-pane.
        for result in &outcome.results {
            if result.name != "Single-pane window" {
                assert!(result.monthly_savings > 0.0);
            }
        }

        // The ENERGY STAR marker picks the one matching product.
        assert_eq!(outcome.recommended, vec!["Triple-pane Northern window"]);
    }

    #[test]
    fn missing_baseline_surfaces_as_attribution_error() {
        let reference = reference_data();
        let site = resolve_site_at(&reference, "98601", coordinates()).unwrap();
        let mut bad_request = request();
        bad_request.baseline_window = "Quadruple-pane window".to_string();
        let err = evaluate_site(&reference, &site, &bad_request, &stub_predictor()).unwrap_err();
        assert!(matches!(err, PipelineError::Attribution(_)));
    }

    #[test]
    fn out_of_zone_point_fails_site_resolution() {
        let reference = reference_data();
        let err = resolve_site_at(
            &reference,
            "98601",
            Coordinates {
                latitude: 30.0,
                longitude: -100.0,
            },
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::Climate(_)));
    }

    #[test]
    fn absent_cooling_equipment_zeroes_cooling_results() {
        let reference = reference_data();
        let site = resolve_site_at(&reference, "98601", coordinates()).unwrap();
        let mut no_cooling = request();
        no_cooling.building.has_cooling = false;
        let outcome =
            evaluate_site(&reference, &site, &no_cooling, &stub_predictor()).unwrap();
        for result in &outcome.results {
            assert!(result.cooling_load.abs() < f64::EPSILON);
            assert!(result.monthly_cooling_cost.abs() < f64::EPSILON);
            // Average falls back to the heating percentage.
            assert!((result.average_percent - result.heating_percent).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn vintage_without_infiltration_row_is_terminal() {
        let reference = reference_data();
        let site = resolve_site_at(&reference, "98601", coordinates()).unwrap();
        let mut bad_request = request();
        bad_request.building.vintage = Vintage::TwentyTens;
        let err = evaluate_site(&reference, &site, &bad_request, &stub_predictor()).unwrap_err();
        assert!(matches!(err, PipelineError::Infiltration(_)));
    }
}
