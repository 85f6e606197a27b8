use std::path::PathBuf;

use lattice_core::{ExtrudeDirection, LatticeConfig, LatticeInstance, PlateRect, SpatialPoint};
use nalgebra::Vector3;
use serde::Serialize;

/// Geometry sink for decoded lattices.
///
/// Implemented by MeshBackend (triangle meshes + STL) and RecordingBackend
/// (deterministic test double). Points passed to `add_cylinder` and
/// `add_slab` are in instance-local coordinates; the backend applies the
/// offset given to `begin_instance`.
pub trait GeometryBackend {
    /// Start a new instance placed at `offset`.
    fn begin_instance(&mut self, name: &str, offset: Vector3<f64>) -> Result<(), BackendError>;

    /// Add a cylindrical strut between two points.
    fn add_cylinder(
        &mut self,
        start: SpatialPoint,
        end: SpatialPoint,
        diameter: f64,
    ) -> Result<(), BackendError>;

    /// Add an axis-aligned slab extruded from the plane `z = z_ref`.
    fn add_slab(
        &mut self,
        rect: PlateRect,
        z_ref: f64,
        thickness: f64,
        direction: ExtrudeDirection,
    ) -> Result<(), BackendError>;

    /// Finish the current instance and write its artifact.
    fn export_instance(&mut self, name: &str) -> Result<ExportArtifact, BackendError>;
}

/// What an export produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportArtifact {
    pub name: String,
    /// File written, or `None` when the artifact was kept in memory.
    pub path: Option<PathBuf>,
    pub size_bytes: usize,
}

/// Errors from geometry backends.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BackendError {
    #[error("no active instance for {operation}")]
    NoActiveInstance { operation: String },

    #[error("instance {found:?} is not the active instance {expected:?}")]
    NameMismatch { expected: String, found: String },

    #[error("invalid geometry: {reason}")]
    InvalidGeometry { reason: String },

    #[error("instance {name:?} produced an empty mesh")]
    EmptyMesh { name: String },

    #[error("I/O error at {path}: {reason}")]
    Io { path: PathBuf, reason: String },
}

/// Issue the instructions for one lattice: every strut in edge order, then
/// the bottom plate, then the top plate. Exporting is left to the caller.
pub fn emit_instance(
    backend: &mut dyn GeometryBackend,
    instance: &LatticeInstance,
    config: &LatticeConfig,
) -> Result<(), BackendError> {
    backend.begin_instance(instance.name(), instance.offset_vector())?;
    for strut in instance.struts() {
        backend.add_cylinder(strut.start, strut.end, config.beam_diameter)?;
    }
    for plate in [instance.plates().bottom, instance.plates().top] {
        backend.add_slab(plate.rect, plate.z_ref, plate.thickness, plate.direction)?;
    }
    Ok(())
}
