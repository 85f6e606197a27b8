//! End plates capping a lattice above and below.

use lattice_types::LatticeConfig;
use serde::{Deserialize, Serialize};

use crate::bounds::BoundingBox;

/// Which way a slab grows from its reference plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExtrudeDirection {
    /// Toward +Z.
    Up,
    /// Toward -Z.
    Down,
}

impl ExtrudeDirection {
    pub fn sign(self) -> f64 {
        match self {
            ExtrudeDirection::Up => 1.0,
            ExtrudeDirection::Down => -1.0,
        }
    }
}

/// XY footprint of a plate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlateRect {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl PlateRect {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn depth(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn area(&self) -> f64 {
        self.width() * self.depth()
    }
}

/// A flat slab: footprint, reference plane, and signed extrusion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plate {
    pub rect: PlateRect,
    pub z_ref: f64,
    pub thickness: f64,
    pub direction: ExtrudeDirection,
}

impl Plate {
    /// Signed extrusion distance (`-thickness` when growing down).
    pub fn signed_thickness(&self) -> f64 {
        self.direction.sign() * self.thickness
    }

    /// Z range covered by the slab as `(low, high)`.
    pub fn z_range(&self) -> (f64, f64) {
        let far = self.z_ref + self.signed_thickness();
        (self.z_ref.min(far), self.z_ref.max(far))
    }
}

/// Both end plates of one lattice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlateGeometry {
    pub top: Plate,
    pub bottom: Plate,
}

impl PlateGeometry {
    pub fn top_z(&self) -> f64 {
        self.top.z_ref
    }

    pub fn bottom_z(&self) -> f64 {
        self.bottom.z_ref
    }
}

/// Place the end plates for a lattice with the given bounding box.
///
/// `bottom_z = min_z - plate_clearance` and `top_z = bottom_z + plate_separation`.
/// The separation is a fixed distance and does not follow `max_z`, so lattices
/// taller than it will intersect the top plate.
pub fn compute_plate_geometry(bounds: &BoundingBox, config: &LatticeConfig) -> PlateGeometry {
    let rect = PlateRect {
        min_x: bounds.min.x,
        min_y: bounds.min.y,
        max_x: bounds.max.x,
        max_y: bounds.max.y,
    };
    let bottom_z = bounds.min.z - config.plate_clearance;
    let top_z = bottom_z + config.plate_separation;

    PlateGeometry {
        top: Plate {
            rect,
            z_ref: top_z,
            thickness: config.plate_thickness,
            direction: ExtrudeDirection::Up,
        },
        bottom: Plate {
            rect,
            z_ref: bottom_z,
            thickness: config.plate_thickness,
            direction: ExtrudeDirection::Down,
        },
    }
}
