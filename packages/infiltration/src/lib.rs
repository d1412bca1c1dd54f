#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Infiltration (airtightness) option lookup.
//!
//! The reference table is keyed by fine IECC climate code, a floor-area
//! bin, and construction vintage. Each row carries several named
//! `Option N` columns holding ACH50 values; a lookup selects the option
//! with the maximum ACH50 among the matching row's columns and returns
//! its numeric index.

use std::io::Read;
use std::str::FromStr;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use window_scout_building::Vintage;

/// Errors from infiltration table operations.
#[derive(Debug, Error)]
pub enum InfiltrationError {
    /// The table CSV could not be read or parsed.
    #[error("Infiltration table parse error: {0}")]
    Csv(#[from] csv::Error),

    /// A floor-area bin label could not be parsed.
    #[error("Invalid floor-area bin '{label}'")]
    BadBin {
        /// The unparseable bin label.
        label: String,
    },

    /// The CSV header carries no `Option N` columns.
    #[error("Infiltration table has no option columns")]
    NoOptionColumns,

    /// No row matches the (zone, floor area, vintage) key.
    #[error("No infiltration row for zone '{iecc_code}', area {floor_area}, vintage '{vintage}'")]
    NoMatchingRow {
        /// Fine IECC code used in the lookup.
        iecc_code: String,
        /// Conditioned floor area used in the lookup.
        floor_area: f64,
        /// Vintage category used in the lookup.
        vintage: Vintage,
    },
}

/// A contiguous floor-area bin.
///
/// `"N+"` matches any area at or above `N`; `"LO-HI"` is inclusive at
/// both ends. The table's bins cover `[0, inf)` in catalog order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AreaBin {
    /// Closed interval `[low, high]`.
    Range {
        /// Lower bound, inclusive.
        low: f64,
        /// Upper bound, inclusive.
        high: f64,
    },
    /// Open-ended top bin `[low, inf)`.
    AtLeast {
        /// Lower bound, inclusive.
        low: f64,
    },
}

impl AreaBin {
    /// Whether an area falls in this bin.
    #[must_use]
    pub fn contains(&self, area: f64) -> bool {
        match self {
            Self::Range { low, high } => area >= *low && area <= *high,
            Self::AtLeast { low } => area >= *low,
        }
    }
}

impl FromStr for AreaBin {
    type Err = InfiltrationError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let label = label.trim();
        let bad = || InfiltrationError::BadBin {
            label: label.to_string(),
        };

        if let Some(low) = label.strip_suffix('+') {
            let low = low.trim().parse::<f64>().map_err(|_| bad())?;
            return Ok(Self::AtLeast { low });
        }

        let (low, high) = label.split_once('-').ok_or_else(bad)?;
        let low = low.trim().parse::<f64>().map_err(|_| bad())?;
        let high = high.trim().parse::<f64>().map_err(|_| bad())?;
        Ok(Self::Range { low, high })
    }
}

/// The selected airtightness option.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfiltrationOption {
    /// Numeric option index, extracted from the `Option N` column name.
    pub index: u32,
    /// The option's ACH50 value.
    pub ach50: f64,
}

struct Row {
    iecc_code: String,
    bin: AreaBin,
    vintage: Vintage,
    /// (option index, ACH50), in header column order.
    options: Vec<(u32, f64)>,
}

/// Read-only infiltration reference table.
///
/// Loaded once at startup; rows are checked in catalog order and the
/// first matching row wins.
pub struct InfiltrationTable {
    rows: Vec<Row>,
}

impl InfiltrationTable {
    /// Loads the table from CSV.
    ///
    /// Fixed key columns `IECC Climate Zone`, `Floor Area`, `Vintage`
    /// are required; every header matching `Option <N>` becomes an
    /// option column. Rows with unparseable keys are skipped with a
    /// warning.
    ///
    /// # Errors
    ///
    /// Returns [`InfiltrationError::Csv`] on CSV errors and
    /// [`InfiltrationError::NoOptionColumns`] if the header declares no
    /// option columns.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self, InfiltrationError> {
        let option_pattern = Regex::new(r"^Option\s*(\d+)$").expect("static pattern");

        let mut csv_reader = csv::Reader::from_reader(reader);
        let headers = csv_reader.headers()?.clone();

        let mut zone_col = None;
        let mut area_col = None;
        let mut vintage_col = None;
        let mut option_cols: Vec<(usize, u32)> = Vec::new();

        for (idx, header) in headers.iter().enumerate() {
            match header.trim() {
                "IECC Climate Zone" => zone_col = Some(idx),
                "Floor Area" => area_col = Some(idx),
                "Vintage" => vintage_col = Some(idx),
                other => {
                    if let Some(index) = option_pattern
                        .captures(other)
                        .and_then(|captures| captures[1].parse::<u32>().ok())
                    {
                        option_cols.push((idx, index));
                    } else {
                        log::warn!("Ignoring unrecognized infiltration column '{other}'");
                    }
                }
            }
        }

        if option_cols.is_empty() {
            return Err(InfiltrationError::NoOptionColumns);
        }
        let (Some(zone_col), Some(area_col), Some(vintage_col)) =
            (zone_col, area_col, vintage_col)
        else {
            return Err(InfiltrationError::NoOptionColumns);
        };

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;

            let iecc_code = record.get(zone_col).unwrap_or("").trim().to_string();
            let bin_label = record.get(area_col).unwrap_or("").trim();
            let vintage_label = record.get(vintage_col).unwrap_or("").trim();

            let Ok(bin) = AreaBin::from_str(bin_label) else {
                log::warn!("Skipping infiltration row with bad bin '{bin_label}'");
                continue;
            };
            let Ok(vintage) = Vintage::from_str(vintage_label) else {
                log::warn!("Skipping infiltration row with bad vintage '{vintage_label}'");
                continue;
            };

            let mut options = Vec::with_capacity(option_cols.len());
            for &(col, index) in &option_cols {
                let Some(value) = record.get(col).and_then(|v| v.trim().parse::<f64>().ok())
                else {
                    continue;
                };
                options.push((index, value));
            }

            rows.push(Row {
                iecc_code,
                bin,
                vintage,
                options,
            });
        }

        log::info!("Loaded {} infiltration rows", rows.len());
        Ok(Self { rows })
    }

    /// Selects the airtightness option for a (zone, area, vintage) key.
    ///
    /// The first row whose zone and vintage match and whose bin contains
    /// the area wins; within that row, the option with the maximum ACH50
    /// is chosen. Ties between equal-valued options resolve to the first
    /// column in the table's stored order (implementation-defined).
    ///
    /// # Errors
    ///
    /// Returns [`InfiltrationError::NoMatchingRow`] if no row matches.
    /// The table must be exhaustive over plausible areas.
    pub fn lookup(
        &self,
        iecc_code: &str,
        floor_area: f64,
        vintage: Vintage,
    ) -> Result<InfiltrationOption, InfiltrationError> {
        let row = self
            .rows
            .iter()
            .find(|row| {
                row.iecc_code == iecc_code
                    && row.vintage == vintage
                    && row.bin.contains(floor_area)
            })
            .ok_or_else(|| InfiltrationError::NoMatchingRow {
                iecc_code: iecc_code.to_string(),
                floor_area,
                vintage,
            })?;

        // Arg-max by value with strict greater-than, so the first
        // column wins ties.
        let mut best: Option<(u32, f64)> = None;
        for &(index, value) in &row.options {
            match best {
                Some((_, best_value)) if value <= best_value => {}
                _ => best = Some((index, value)),
            }
        }

        best.map(|(index, ach50)| InfiltrationOption { index, ach50 })
            .ok_or_else(|| InfiltrationError::NoMatchingRow {
                iecc_code: iecc_code.to_string(),
                floor_area,
                vintage,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "\
IECC Climate Zone,Floor Area,Vintage,Option 1,Option 2,Option 3
4C,0-1499,1980s,4.5,7.0,10.5
4C,1500-1999,1980s,4.0,11.25,8.0
4C,2000+,1980s,3.5,6.0,9.0
5B,1500-1999,1980s,5.0,5.0,4.0
";

    #[test]
    fn area_bins_cover_all_nonnegative_areas() {
        let bins: Vec<AreaBin> = ["0-1499", "1500-1999", "2000+"]
            .iter()
            .map(|label| label.parse().unwrap())
            .collect();

        for area in [0.0, 1.0, 1499.0, 1500.0, 1999.0, 2000.0, 25_000.0] {
            let matches = bins.iter().filter(|bin| bin.contains(area)).count();
            assert_eq!(matches, 1, "area {area} should match exactly one bin");
        }
    }

    #[test]
    fn open_ended_bin_parses_and_matches() {
        let bin: AreaBin = "4000+".parse().unwrap();
        assert!(bin.contains(4000.0));
        assert!(bin.contains(1e9));
        assert!(!bin.contains(3999.9));
    }

    #[test]
    fn bad_bin_labels_are_rejected() {
        assert!("big".parse::<AreaBin>().is_err());
        assert!("1500-".parse::<AreaBin>().is_err());
        assert!("+".parse::<AreaBin>().is_err());
    }

    #[test]
    fn lookup_selects_max_ach50_option() {
        let table = InfiltrationTable::from_csv(TABLE.as_bytes()).unwrap();
        let option = table.lookup("4C", 1800.0, Vintage::Eighties).unwrap();
        assert_eq!(option.index, 2);
        assert!((option.ach50 - 11.25).abs() < f64::EPSILON);
    }

    #[test]
    fn tie_prefers_first_column() {
        let table = InfiltrationTable::from_csv(TABLE.as_bytes()).unwrap();
        let option = table.lookup("5B", 1800.0, Vintage::Eighties).unwrap();
        assert_eq!(option.index, 1);
    }

    #[test]
    fn unmatched_key_is_an_error() {
        let table = InfiltrationTable::from_csv(TABLE.as_bytes()).unwrap();
        assert!(matches!(
            table.lookup("7A", 1800.0, Vintage::Eighties),
            Err(InfiltrationError::NoMatchingRow { .. })
        ));
        assert!(matches!(
            table.lookup("4C", 1800.0, Vintage::Nineties),
            Err(InfiltrationError::NoMatchingRow { .. })
        ));
    }

    #[test]
    fn header_without_options_is_rejected() {
        let data = "IECC Climate Zone,Floor Area,Vintage\n4C,0-1499,1980s\n";
        assert!(matches!(
            InfiltrationTable::from_csv(data.as_bytes()),
            Err(InfiltrationError::NoOptionColumns)
        ));
    }
}
