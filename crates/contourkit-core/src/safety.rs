//! Two-tier clearance heights
//!
//! Travel between separate cut passes happens at the fixture-safe height,
//! measured above the deepest cut of the whole curve. Plunges into a cut
//! stop at the material-safe height above that cut's start depth.

use serde::{Deserialize, Serialize};

/// Default clearance above the deepest cut (inches)
pub const DEFAULT_FIXTURE_SAFE_HEIGHT: f64 = 0.5;

/// Default clearance above a cut's start depth (inches)
pub const DEFAULT_MATERIAL_SAFE_HEIGHT: f64 = 0.25;

/// Clearance heights used when rewriting retracts and plunges
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyHeights {
    /// Clearance above the deepest cut, for travel between cut passes
    pub fixture_safe_height: f64,
    /// Clearance above an individual cut's start depth, for local plunges
    pub material_safe_height: f64,
}

impl Default for SafetyHeights {
    fn default() -> Self {
        Self {
            fixture_safe_height: DEFAULT_FIXTURE_SAFE_HEIGHT,
            material_safe_height: DEFAULT_MATERIAL_SAFE_HEIGHT,
        }
    }
}

impl SafetyHeights {
    /// Create a new set of clearance heights
    pub fn new(fixture_safe_height: f64, material_safe_height: f64) -> Self {
        Self {
            fixture_safe_height,
            material_safe_height,
        }
    }

    /// Travel height given the deepest cut
    pub fn fixture_height(&self, z_max: f64) -> f64 {
        z_max + self.fixture_safe_height
    }

    /// Plunge target given the depth of the cut that follows
    pub fn material_height(&self, cut_depth: f64) -> f64 {
        cut_depth + self.material_safe_height
    }

    /// Check that both heights are finite and non-negative
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("fixture_safe_height", self.fixture_safe_height),
            ("material_safe_height", self.material_safe_height),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} must be a non-negative number, got {}", name, value));
            }
        }
        Ok(())
    }
}
