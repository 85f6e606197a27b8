//! Geometry constants for lattice construction, passed explicitly to every builder call.

use serde::{Deserialize, Serialize};

use crate::error::LatticeError;

/// Dimensions used to turn a presence map into struts, plates and placements.
///
/// Every field has a default, so a partial JSON config only needs the
/// values it overrides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatticeConfig {
    /// Strut (cylinder) diameter.
    pub beam_diameter: f64,
    /// Length of one grid step.
    pub lattice_spacing: f64,
    /// Thickness of each end plate.
    pub plate_thickness: f64,
    /// Gap between the lowest node plane and the bottom plate reference plane.
    pub plate_clearance: f64,
    /// Distance from the bottom plate reference plane to the top one.
    /// Fixed, not derived from the lattice height.
    pub plate_separation: f64,
    /// Offset between consecutive instances along X.
    pub instance_spacing: f64,
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            beam_diameter: 0.2,
            lattice_spacing: 1.0,
            plate_thickness: 0.2,
            plate_clearance: 0.05,
            plate_separation: 1.25,
            instance_spacing: 10.0,
        }
    }
}

impl LatticeConfig {
    pub fn with_beam_diameter(mut self, diameter: f64) -> Self {
        self.beam_diameter = diameter;
        self
    }

    pub fn with_lattice_spacing(mut self, spacing: f64) -> Self {
        self.lattice_spacing = spacing;
        self
    }

    pub fn with_plate_thickness(mut self, thickness: f64) -> Self {
        self.plate_thickness = thickness;
        self
    }

    pub fn with_instance_spacing(mut self, spacing: f64) -> Self {
        self.instance_spacing = spacing;
        self
    }

    /// Reject values that would produce degenerate or non-finite geometry.
    pub fn validate(&self) -> Result<(), LatticeError> {
        let positive = [
            ("beam_diameter", self.beam_diameter),
            ("lattice_spacing", self.lattice_spacing),
            ("plate_thickness", self.plate_thickness),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(LatticeError::InvalidConfig {
                    reason: format!("{name} must be positive and finite, got {value}"),
                });
            }
        }

        let finite = [
            ("plate_clearance", self.plate_clearance),
            ("plate_separation", self.plate_separation),
            ("instance_spacing", self.instance_spacing),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(LatticeError::InvalidConfig {
                    reason: format!("{name} must be finite, got {value}"),
                });
            }
        }

        if self.instance_spacing < 0.0 {
            return Err(LatticeError::InvalidConfig {
                reason: format!(
                    "instance_spacing must not be negative, got {}",
                    self.instance_spacing
                ),
            });
        }
        Ok(())
    }
}
