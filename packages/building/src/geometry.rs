//! Closed-form envelope geometry.
//!
//! The five (building type x foundation) branches of the model collapse
//! into a single formula once each branch is resolved to a
//! [`GeometryPlan`]: a footprint aspect ratio, the number of envelope
//! levels, and the number of above-grade stories that carry windows.
//!
//! Preconditions (stories >= 1, conditioned area > 0) are the caller's
//! responsibility; the model performs no validation of its own.

use crate::{BuildingType, Foundation};

/// Assumed floor-to-floor height, feet.
pub const STORY_HEIGHT_FT: f64 = 8.0;

/// Footprint aspect ratio for detached homes and mobile homes.
const ASPECT_WIDE: f64 = 1.8;

/// Footprint aspect ratio for attached homes and apartment units.
const ASPECT_NARROW: f64 = 0.5556;

/// A resolved geometry branch: everything needed to apply the shared
/// envelope formula to a conditioned floor area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryPlan {
    /// Long-side to short-side ratio of the rectangular footprint.
    pub aspect_ratio: f64,
    /// Envelope levels the conditioned area is spread across
    /// (stories, plus one for a heated basement).
    pub levels: f64,
    /// Above-grade stories with exterior walls carrying windows.
    pub wall_stories: f64,
    /// Whether the footprint is the whole conditioned area
    /// (single-level dwelling types) rather than area / levels.
    footprint_is_total: bool,
}

impl GeometryPlan {
    /// Resolves the geometry branch for a building.
    #[must_use]
    pub fn for_building(
        building_type: BuildingType,
        foundation: Foundation,
        stories: u32,
    ) -> Self {
        let stories = f64::from(stories);
        match building_type {
            BuildingType::SingleFamilyDetached | BuildingType::SingleFamilyAttached => {
                let aspect_ratio = if building_type == BuildingType::SingleFamilyDetached {
                    ASPECT_WIDE
                } else {
                    ASPECT_NARROW
                };
                let levels = if foundation == Foundation::HeatedBasement {
                    stories + 1.0
                } else {
                    stories
                };
                Self {
                    aspect_ratio,
                    levels,
                    wall_stories: stories,
                    footprint_is_total: false,
                }
            }
            // Foundation class is irrelevant for these types; they are
            // modeled as a single level over the whole conditioned area.
            BuildingType::ApartmentUnit => Self {
                aspect_ratio: ASPECT_NARROW,
                levels: 1.0,
                wall_stories: 1.0,
                footprint_is_total: true,
            },
            BuildingType::MobileHome => Self {
                aspect_ratio: ASPECT_WIDE,
                levels: 1.0,
                wall_stories: 1.0,
                footprint_is_total: true,
            },
        }
    }

    /// Per-level footprint area for a conditioned floor area.
    #[must_use]
    pub fn footprint(&self, conditioned_area: f64) -> f64 {
        if self.footprint_is_total {
            conditioned_area
        } else {
            conditioned_area / self.levels
        }
    }

    /// Footprint perimeter from the rectangular approximation:
    /// `short = sqrt(footprint / aspect)`, `long = short * aspect`.
    #[must_use]
    pub fn perimeter(&self, conditioned_area: f64) -> f64 {
        let short_side = (self.footprint(conditioned_area) / self.aspect_ratio).sqrt();
        (short_side + short_side * self.aspect_ratio) * 2.0
    }

    /// Envelope surface area divided by conditioned volume.
    ///
    /// Surface is the exterior wall area over all levels plus one
    /// footprint (roof); volume is footprint times level count times
    /// story height.
    #[must_use]
    pub fn surface_to_volume_ratio(&self, conditioned_area: f64) -> f64 {
        let footprint = self.footprint(conditioned_area);
        let wall_area = self.perimeter(conditioned_area) * STORY_HEIGHT_FT * self.levels;
        let volume = footprint * STORY_HEIGHT_FT * self.levels;
        (wall_area + footprint) / volume
    }

    /// Predicted total window area for a window-to-wall ratio.
    ///
    /// `wwr` is a fraction (0.09 for 9%), applied to the above-grade
    /// wall area only; basement levels carry no windows.
    #[must_use]
    pub fn window_area(&self, conditioned_area: f64, wwr: f64) -> f64 {
        self.perimeter(conditioned_area) * STORY_HEIGHT_FT * self.wall_stories * wwr
    }
}
