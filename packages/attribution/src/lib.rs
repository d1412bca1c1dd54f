#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Energy/cost attribution engine.
//!
//! Takes raw predicted loads per window candidate and produces
//! normalized contribution percentages, monthly and lifetime costs, and
//! baseline-relative savings. The engine is a pure transform: every
//! derived field is a function of the inputs, nothing is mutated after
//! computation, and recomputation with identical inputs is idempotent.
//!
//! Per-candidate computation is independent (steps 1-5); only the
//! baseline-delta step needs the full result set, so it runs in a
//! second pass once all rows exist.

use serde::Serialize;
use thiserror::Error;

/// Assumed window/equipment lifespan, years.
pub const EQUIPMENT_LIFESPAN_YEARS: f64 = 15.0;

/// Loads below this absolute value are zeroed: no meaningful thermal
/// demand in that mode. Prevents division blow-up downstream.
pub const LOAD_CLAMP_THRESHOLD: f64 = 5.0;

/// Percentages and costs are only computed when the mode load exceeds
/// this, guarding near-zero denominators. Distinct from the hard clamp.
const MIN_DIVISIBLE_LOAD: f64 = 1.0;

/// Errors from the attribution engine.
#[derive(Debug, Error)]
pub enum AttributionError {
    /// The baseline candidate is absent from the evaluated set. Every
    /// cost delta depends on it, so this is terminal.
    #[error("Baseline window '{name}' is not in the evaluated set")]
    BaselineNotFound {
        /// The requested baseline name.
        name: String,
    },
}

/// Raw predicted loads for one window candidate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawLoads {
    /// Predicted whole-home cooling load.
    pub cooling_load: f64,
    /// Predicted whole-home heating load.
    pub heating_load: f64,
    /// Predicted window contribution to the cooling load.
    pub cooling_window: f64,
    /// Predicted window contribution to the heating load.
    pub heating_window: f64,
}

/// A named candidate with its raw loads, ready for attribution.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateLoads {
    /// Window candidate name.
    pub name: String,
    /// Raw predicted loads.
    pub loads: RawLoads,
}

/// Seasonal billing and period inputs shared by all candidates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BillingInputs {
    /// Monthly utility bill during the cooling season, dollars.
    pub summer_bill: f64,
    /// Monthly utility bill during the heating season, dollars.
    pub winter_bill: f64,
    /// Heating period length, months. Sums to 12 with cooling.
    pub heating_period_months: f64,
    /// Cooling period length, months.
    pub cooling_period_months: f64,
}

/// Fully-attributed result row for one window candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowResult {
    /// Window candidate name.
    pub name: String,
    /// Cooling load after clamping.
    pub cooling_load: f64,
    /// Heating load after clamping.
    pub heating_load: f64,
    /// Raw window contribution to cooling.
    pub cooling_window: f64,
    /// Raw window contribution to heating.
    pub heating_window: f64,
    /// Window share of the cooling load, percent.
    pub cooling_percent: f64,
    /// Window share of the heating load, percent.
    pub heating_percent: f64,
    /// Informational/sorting percentage across modes.
    pub average_percent: f64,
    /// Monthly window-attributed cooling cost, dollars.
    pub monthly_cooling_cost: f64,
    /// Monthly window-attributed heating cost, dollars.
    pub monthly_heating_cost: f64,
    /// Monthly total across both modes.
    pub monthly_total_cost: f64,
    /// Lifetime window-attributed cooling cost, dollars.
    pub lifetime_cooling_cost: f64,
    /// Lifetime window-attributed heating cost, dollars.
    pub lifetime_heating_cost: f64,
    /// Lifetime total across both modes.
    pub lifetime_total_cost: f64,
    /// Baseline monthly total minus this candidate's monthly total.
    /// Exactly 0 for the baseline itself.
    pub monthly_savings: f64,
    /// Baseline-relative lifetime cooling savings.
    pub lifetime_cooling_savings: f64,
    /// Baseline-relative lifetime heating savings.
    pub lifetime_heating_savings: f64,
    /// Baseline-relative lifetime savings across both modes.
    pub lifetime_savings: f64,
}

/// Zeroes loads below [`LOAD_CLAMP_THRESHOLD`]. Idempotent.
#[must_use]
pub fn clamp_load(load: f64) -> f64 {
    if load < LOAD_CLAMP_THRESHOLD { 0.0 } else { load }
}

/// Contribution percentage, guarded against near-zero denominators.
fn contribution_percent(window: f64, load: f64) -> f64 {
    if load > MIN_DIVISIBLE_LOAD {
        window / load * 100.0
    } else {
        0.0
    }
}

/// Monthly window-attributed cost for one mode.
fn monthly_cost(percent: f64, load: f64, seasonal_bill: f64) -> f64 {
    if load > MIN_DIVISIBLE_LOAD {
        percent / 100.0 * seasonal_bill
    } else {
        0.0
    }
}

/// Runs the attribution pipeline over all candidates.
///
/// Steps: clamp loads, derive contribution percentages and the average
/// percentage, compute monthly and lifetime costs per mode, then fill
/// in baseline-relative savings in a second pass over the complete set.
///
/// Rows come back in input order; use [`rank_by_lifetime_cost`] to
/// sort.
///
/// # Errors
///
/// Returns [`AttributionError::BaselineNotFound`] if `baseline_name`
/// does not name any candidate.
pub fn attribute(
    candidates: &[CandidateLoads],
    billing: &BillingInputs,
    baseline_name: &str,
) -> Result<Vec<WindowResult>, AttributionError> {
    let mut results: Vec<WindowResult> = candidates
        .iter()
        .map(|candidate| attribute_one(candidate, billing))
        .collect();

    let baseline = results
        .iter()
        .find(|r| r.name == baseline_name)
        .ok_or_else(|| AttributionError::BaselineNotFound {
            name: baseline_name.to_string(),
        })?
        .clone();

    for result in &mut results {
        result.monthly_savings = baseline.monthly_total_cost - result.monthly_total_cost;
        result.lifetime_cooling_savings = (baseline.monthly_cooling_cost
            - result.monthly_cooling_cost)
            * billing.cooling_period_months
            * EQUIPMENT_LIFESPAN_YEARS;
        result.lifetime_heating_savings = (baseline.monthly_heating_cost
            - result.monthly_heating_cost)
            * billing.heating_period_months
            * EQUIPMENT_LIFESPAN_YEARS;
        result.lifetime_savings = result.lifetime_cooling_savings + result.lifetime_heating_savings;
    }

    Ok(results)
}

/// Steps 1-5 for a single candidate. Baseline-relative fields are
/// zeroed; the caller fills them once every row exists.
fn attribute_one(candidate: &CandidateLoads, billing: &BillingInputs) -> WindowResult {
    let cooling_load = clamp_load(candidate.loads.cooling_load);
    let heating_load = clamp_load(candidate.loads.heating_load);

    let cooling_percent = contribution_percent(candidate.loads.cooling_window, cooling_load);
    let heating_percent = contribution_percent(candidate.loads.heating_window, heating_load);

    let average_percent = if cooling_load == 0.0 {
        heating_percent
    } else if heating_load == 0.0 {
        cooling_percent
    } else {
        (cooling_percent + heating_percent) / 2.0
    };

    let monthly_cooling_cost = monthly_cost(cooling_percent, cooling_load, billing.summer_bill);
    let monthly_heating_cost = monthly_cost(heating_percent, heating_load, billing.winter_bill);

    let lifetime_cooling_cost =
        monthly_cooling_cost * EQUIPMENT_LIFESPAN_YEARS * billing.cooling_period_months;
    let lifetime_heating_cost =
        monthly_heating_cost * EQUIPMENT_LIFESPAN_YEARS * billing.heating_period_months;

    WindowResult {
        name: candidate.name.clone(),
        cooling_load,
        heating_load,
        cooling_window: candidate.loads.cooling_window,
        heating_window: candidate.loads.heating_window,
        cooling_percent,
        heating_percent,
        average_percent,
        monthly_cooling_cost,
        monthly_heating_cost,
        monthly_total_cost: monthly_cooling_cost + monthly_heating_cost,
        lifetime_cooling_cost,
        lifetime_heating_cost,
        lifetime_total_cost: lifetime_cooling_cost + lifetime_heating_cost,
        monthly_savings: 0.0,
        lifetime_cooling_savings: 0.0,
        lifetime_heating_savings: 0.0,
        lifetime_savings: 0.0,
    }
}

/// Sorts results ascending by lifetime total cost (lower is better).
pub fn rank_by_lifetime_cost(results: &mut [WindowResult]) {
    results.sort_by(|a, b| a.lifetime_total_cost.total_cmp(&b.lifetime_total_cost));
}

/// Candidates whose name carries the ENERGY STAR zone marker, for the
/// specialized recommendation view.
#[must_use]
pub fn energy_star_matches<'a>(
    results: &'a [WindowResult],
    zone_marker: &str,
) -> Vec<&'a WindowResult> {
    results
        .iter()
        .filter(|r| r.name.contains(zone_marker))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn billing() -> BillingInputs {
        BillingInputs {
            summer_bill: 120.0,
            winter_bill: 180.0,
            heating_period_months: 8.0,
            cooling_period_months: 4.0,
        }
    }

    fn candidate(name: &str, loads: RawLoads) -> CandidateLoads {
        CandidateLoads {
            name: name.to_string(),
            loads,
        }
    }

    #[test]
    fn clamp_is_idempotent() {
        for load in [0.0, 3.0, 4.999, 5.0, 7.5, 5_000.0] {
            let once = clamp_load(load);
            assert!((clamp_load(once) - once).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn clamp_zeroes_small_loads() {
        assert!(clamp_load(4.99).abs() < f64::EPSILON);
        assert!((clamp_load(5.0) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn percentages_follow_contribution_ratio() {
        let results = attribute(
            &[candidate(
                "A",
                RawLoads {
                    cooling_load: 100.0,
                    heating_load: 200.0,
                    cooling_window: 25.0,
                    heating_window: 50.0,
                },
            )],
            &billing(),
            "A",
        )
        .unwrap();
        assert!((results[0].cooling_percent - 25.0).abs() < 1e-9);
        assert!((results[0].heating_percent - 25.0).abs() < 1e-9);
        assert!((results[0].average_percent - 25.0).abs() < 1e-9);
    }

    #[test]
    fn clamped_mode_uses_other_mode_percentage() {
        // Cooling load below the clamp threshold: no cooling demand.
        let results = attribute(
            &[candidate(
                "A",
                RawLoads {
                    cooling_load: 2.0,
                    heating_load: 200.0,
                    cooling_window: 1.0,
                    heating_window: 40.0,
                },
            )],
            &billing(),
            "A",
        )
        .unwrap();
        let row = &results[0];
        assert!(row.cooling_load.abs() < f64::EPSILON);
        assert!(row.cooling_percent.abs() < f64::EPSILON);
        assert!(row.monthly_cooling_cost.abs() < f64::EPSILON);
        assert!((row.average_percent - row.heating_percent).abs() < f64::EPSILON);
    }

    #[test]
    fn monthly_and_lifetime_costs_compound_correctly() {
        let results = attribute(
            &[candidate(
                "A",
                RawLoads {
                    cooling_load: 100.0,
                    heating_load: 200.0,
                    cooling_window: 25.0,
                    heating_window: 50.0,
                },
            )],
            &billing(),
            "A",
        )
        .unwrap();
        let row = &results[0];
        // 25% of each seasonal bill.
        assert!((row.monthly_cooling_cost - 30.0).abs() < 1e-9);
        assert!((row.monthly_heating_cost - 45.0).abs() < 1e-9);
        assert!((row.monthly_total_cost - 75.0).abs() < 1e-9);
        // monthly * 15 years * period months.
        assert!((row.lifetime_cooling_cost - 30.0 * 15.0 * 4.0).abs() < 1e-9);
        assert!((row.lifetime_heating_cost - 45.0 * 15.0 * 8.0).abs() < 1e-9);
        assert!((row.lifetime_total_cost - (1800.0 + 5400.0)).abs() < 1e-9);
    }

    #[test]
    fn baseline_deltas_are_relative_to_baseline_row() {
        let results = attribute(
            &[
                candidate(
                    "Baseline",
                    RawLoads {
                        cooling_load: 100.0,
                        heating_load: 100.0,
                        cooling_window: 40.0,
                        heating_window: 40.0,
                    },
                ),
                candidate(
                    "Better",
                    RawLoads {
                        cooling_load: 100.0,
                        heating_load: 100.0,
                        cooling_window: 10.0,
                        heating_window: 10.0,
                    },
                ),
            ],
            &billing(),
            "Baseline",
        )
        .unwrap();

        let baseline = &results[0];
        let better = &results[1];
        assert!(baseline.monthly_savings.abs() < f64::EPSILON);
        assert!(baseline.lifetime_savings.abs() < f64::EPSILON);
        assert!(
            (better.monthly_savings
                - (baseline.monthly_total_cost - better.monthly_total_cost))
                .abs()
                < 1e-9
        );
        assert!(better.monthly_savings > 0.0);
        assert!(
            (better.lifetime_savings
                - (better.lifetime_cooling_savings + better.lifetime_heating_savings))
                .abs()
                < 1e-9
        );
    }

    #[test]
    fn missing_baseline_is_terminal() {
        let err = attribute(
            &[candidate("A", RawLoads::default())],
            &billing(),
            "Nonexistent",
        )
        .unwrap_err();
        assert!(matches!(err, AttributionError::BaselineNotFound { .. }));
    }

    #[test]
    fn ranking_sorts_ascending_by_lifetime_total() {
        let mut results = attribute(
            &[
                candidate(
                    "Costly",
                    RawLoads {
                        cooling_load: 100.0,
                        heating_load: 100.0,
                        cooling_window: 60.0,
                        heating_window: 60.0,
                    },
                ),
                candidate(
                    "Cheap",
                    RawLoads {
                        cooling_load: 100.0,
                        heating_load: 100.0,
                        cooling_window: 5.0,
                        heating_window: 5.0,
                    },
                ),
                candidate(
                    "Middle",
                    RawLoads {
                        cooling_load: 100.0,
                        heating_load: 100.0,
                        cooling_window: 30.0,
                        heating_window: 30.0,
                    },
                ),
            ],
            &billing(),
            "Costly",
        )
        .unwrap();

        rank_by_lifetime_cost(&mut results);
        let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Cheap", "Middle", "Costly"]);
    }

    #[test]
    fn recomputation_is_idempotent() {
        let inputs = vec![candidate(
            "A",
            RawLoads {
                cooling_load: 80.0,
                heating_load: 160.0,
                cooling_window: 20.0,
                heating_window: 32.0,
            },
        )];
        let first = attribute(&inputs, &billing(), "A").unwrap();
        let second = attribute(&inputs, &billing(), "A").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn energy_star_filter_matches_zone_marker() {
        let results = attribute(
            &[
                candidate("Northern triple-pane", RawLoads::default()),
                candidate("Southern single-pane", RawLoads::default()),
            ],
            &billing(),
            "Northern triple-pane",
        )
        .unwrap();
        let matches = energy_star_matches(&results, "Northern");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "Northern triple-pane");
    }
}
