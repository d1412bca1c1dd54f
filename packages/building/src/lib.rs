#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Building attribute types and the envelope geometry model.
//!
//! The geometry model approximates a home's envelope from a handful of
//! attributes (conditioned floor area, building type, story count,
//! foundation class). Each building type maps to a rectangular-footprint
//! approximation with a fixed aspect ratio; from that the model derives
//! the surface-to-volume ratio (a compactness proxy used as a predictor
//! feature) and the predicted total window area for a given
//! window-to-wall ratio.

pub mod geometry;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use geometry::GeometryPlan;

/// Residential building type.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum BuildingType {
    /// Detached single-family home.
    #[serde(rename = "Single-Family Detached")]
    #[strum(serialize = "Single-Family Detached")]
    SingleFamilyDetached,
    /// Attached single-family home (townhouse/rowhouse).
    #[serde(rename = "Single-Family Attached")]
    #[strum(serialize = "Single-Family Attached")]
    SingleFamilyAttached,
    /// A unit in a multi-family building.
    #[serde(rename = "Apartment Unit")]
    #[strum(serialize = "Apartment Unit")]
    ApartmentUnit,
    /// Manufactured/mobile home.
    #[serde(rename = "Mobile Home")]
    #[strum(serialize = "Mobile Home")]
    MobileHome,
}

/// Foundation class. Only heated basements change the envelope geometry;
/// every other foundation type behaves identically.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Foundation {
    /// Conditioned basement counted as an additional envelope level.
    #[serde(rename = "Heated Basement")]
    #[strum(serialize = "Heated Basement")]
    HeatedBasement,
    /// Slab, crawlspace, unheated basement, etc.
    #[serde(rename = "Others")]
    #[strum(serialize = "Others")]
    Other,
}

/// Construction vintage, bucketed by decade.
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
pub enum Vintage {
    /// Built before 1940.
    #[serde(rename = "<1940")]
    #[strum(serialize = "<1940")]
    Pre1940,
    /// Built 1940-1949.
    #[serde(rename = "1940s")]
    #[strum(serialize = "1940s")]
    Forties,
    /// Built 1950-1959.
    #[serde(rename = "1950s")]
    #[strum(serialize = "1950s")]
    Fifties,
    /// Built 1960-1969.
    #[serde(rename = "1960s")]
    #[strum(serialize = "1960s")]
    Sixties,
    /// Built 1970-1979.
    #[serde(rename = "1970s")]
    #[strum(serialize = "1970s")]
    Seventies,
    /// Built 1980-1989.
    #[serde(rename = "1980s")]
    #[strum(serialize = "1980s")]
    Eighties,
    /// Built 1990-1999.
    #[serde(rename = "1990s")]
    #[strum(serialize = "1990s")]
    Nineties,
    /// Built 2000-2009.
    #[serde(rename = "2000s")]
    #[strum(serialize = "2000s")]
    TwoThousands,
    /// Built 2010 or later.
    #[serde(rename = "2010s")]
    #[strum(serialize = "2010s")]
    TwentyTens,
}

/// Compass orientation of the front of the dwelling, 8-point scale.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Orientation {
    /// 0 degrees.
    North,
    /// 45 degrees.
    Northeast,
    /// 90 degrees.
    East,
    /// 135 degrees.
    Southeast,
    /// 180 degrees.
    South,
    /// 225 degrees.
    Southwest,
    /// 270 degrees.
    West,
    /// 315 degrees.
    Northwest,
}

impl Orientation {
    /// Compass degrees on the 45-degree-step scale, North = 0, clockwise.
    #[must_use]
    pub const fn degrees(self) -> f64 {
        match self {
            Self::North => 0.0,
            Self::Northeast => 45.0,
            Self::East => 90.0,
            Self::Southeast => 135.0,
            Self::South => 180.0,
            Self::Southwest => 225.0,
            Self::West => 270.0,
            Self::Northwest => 315.0,
        }
    }
}
