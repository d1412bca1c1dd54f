#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Window product catalog.
//!
//! The default catalog ships as a CSV of window products with their
//! optical/thermal properties. Users may append custom products within
//! a session; customs are appended as-is, never deduplicated against
//! the defaults, and uniqueness is by name within the combined catalog.

use std::io::Read;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from window catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The window CSV could not be parsed.
    #[error("Window catalog parse error: {0}")]
    Csv(#[from] csv::Error),
}

/// A window product candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowCandidate {
    /// Product name (e.g. "Double-pane low-E window").
    pub name: String,
    /// Thermal transmittance; lower insulates better.
    pub u_factor: f64,
    /// Solar heat gain coefficient.
    pub shgc: f64,
}

/// Pane-count rank used to order the catalog for display.
fn pane_sort_key(name: &str) -> u8 {
    if name.starts_with("Single-pane") {
        1
    } else if name.starts_with("Double-pane") {
        2
    } else if name.starts_with("Triple-pane") {
        3
    } else {
        4
    }
}

/// One row of the window product CSV.
#[derive(Debug, Deserialize)]
struct WindowRecord {
    #[serde(rename = "window_type")]
    name: String,
    #[serde(rename = "U-factor")]
    u_factor: f64,
    #[serde(rename = "SHGC")]
    shgc: f64,
}

/// Combined window catalog: defaults plus session customs.
#[derive(Debug, Clone, Default)]
pub struct WindowCatalog {
    entries: Vec<WindowCandidate>,
}

impl WindowCatalog {
    /// Builds a catalog from existing candidates.
    #[must_use]
    pub const fn new(entries: Vec<WindowCandidate>) -> Self {
        Self { entries }
    }

    /// Loads the default catalog from CSV.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Csv`] if the CSV cannot be parsed.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut entries = Vec::new();
        for record in csv_reader.deserialize::<WindowRecord>() {
            let record = record?;
            entries.push(WindowCandidate {
                name: record.name,
                u_factor: record.u_factor,
                shgc: record.shgc,
            });
        }
        log::info!("Loaded {} window products", entries.len());
        Ok(Self { entries })
    }

    /// Appends a custom window. No deduplication against existing
    /// entries; the caller owns name uniqueness.
    pub fn add_custom(&mut self, candidate: WindowCandidate) {
        self.entries.push(candidate);
    }

    /// All candidates in insertion order.
    #[must_use]
    pub fn candidates(&self) -> &[WindowCandidate] {
        &self.entries
    }

    /// Whether a candidate with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|c| c.name == name)
    }

    /// The first candidate with this name, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&WindowCandidate> {
        self.entries.iter().find(|c| c.name == name)
    }

    /// A display-ordered copy: single-pane first, then double, triple,
    /// then everything else, alphabetical within each group.
    #[must_use]
    pub fn sorted(&self) -> Vec<WindowCandidate> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| {
            pane_sort_key(&a.name)
                .cmp(&pane_sort_key(&b.name))
                .then_with(|| a.name.cmp(&b.name))
        });
        sorted
    }
}
