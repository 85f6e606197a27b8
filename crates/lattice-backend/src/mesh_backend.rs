//! Mesh backend: tessellates struts and plates and exports one STL per instance.

use std::fs;
use std::path::PathBuf;

use lattice_core::{ExtrudeDirection, PlateRect, SpatialPoint};
use nalgebra::{Point3, Vector3};
use tracing::{debug, info, warn};

use crate::mesh::{tessellate_box, tessellate_strut, TriangleMesh};
use crate::stl::StlFormat;
use crate::traits::{BackendError, ExportArtifact, GeometryBackend};

/// Number of sides used to approximate a cylindrical strut.
pub const DEFAULT_STRUT_SEGMENTS: usize = 12;

/// Fewest sides that still enclose a volume.
pub const MIN_STRUT_SEGMENTS: usize = 3;

#[derive(Debug, Clone)]
pub struct MeshBackendOptions {
    /// Sides per strut cross-section (at least 3).
    pub segments: usize,
    pub format: StlFormat,
    /// Directory for `<name>.stl` files. `None` keeps artifacts in memory.
    pub output_dir: Option<PathBuf>,
}

impl Default for MeshBackendOptions {
    fn default() -> Self {
        Self {
            segments: DEFAULT_STRUT_SEGMENTS,
            format: StlFormat::Binary,
            output_dir: None,
        }
    }
}

/// A finished instance.
#[derive(Debug, Clone)]
pub struct ExportedMesh {
    pub name: String,
    pub mesh: TriangleMesh,
    /// Encoded STL, kept only for in-memory exports.
    pub bytes: Option<Vec<u8>>,
    /// Struts dropped because both ends coincide.
    pub skipped_struts: usize,
}

#[derive(Debug)]
struct PendingInstance {
    name: String,
    offset: Vector3<f64>,
    mesh: TriangleMesh,
    skipped_struts: usize,
}

/// Geometry backend producing triangle meshes in model space.
#[derive(Debug, Default)]
pub struct MeshBackend {
    options: MeshBackendOptions,
    current: Option<PendingInstance>,
    exported: Vec<ExportedMesh>,
}

impl MeshBackend {
    pub fn new(options: MeshBackendOptions) -> Self {
        Self {
            options,
            current: None,
            exported: Vec::new(),
        }
    }

    /// In-memory backend with default options.
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn options(&self) -> &MeshBackendOptions {
        &self.options
    }

    pub fn exported(&self) -> &[ExportedMesh] {
        &self.exported
    }

    pub fn exported_mesh(&self, name: &str) -> Option<&ExportedMesh> {
        self.exported.iter().find(|e| e.name == name)
    }

    fn pending(&mut self, operation: &str) -> Result<&mut PendingInstance, BackendError> {
        self.current
            .as_mut()
            .ok_or_else(|| BackendError::NoActiveInstance {
                operation: operation.to_string(),
            })
    }

    fn write_artifact(&self, name: &str, bytes: &[u8]) -> Result<Option<PathBuf>, BackendError> {
        let Some(dir) = &self.options.output_dir else {
            return Ok(None);
        };
        let io_err = |path: &PathBuf, e: std::io::Error| BackendError::Io {
            path: path.clone(),
            reason: e.to_string(),
        };
        fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
        let path = dir.join(format!("{name}.stl"));
        fs::write(&path, bytes).map_err(|e| io_err(&path, e))?;
        Ok(Some(path))
    }
}

impl GeometryBackend for MeshBackend {
    fn begin_instance(&mut self, name: &str, offset: Vector3<f64>) -> Result<(), BackendError> {
        if let Some(prev) = &self.current {
            warn!(previous = %prev.name, next = name, "discarding unexported instance");
        }
        self.current = Some(PendingInstance {
            name: name.to_string(),
            offset,
            mesh: TriangleMesh::new(),
            skipped_struts: 0,
        });
        Ok(())
    }

    fn add_cylinder(
        &mut self,
        start: SpatialPoint,
        end: SpatialPoint,
        diameter: f64,
    ) -> Result<(), BackendError> {
        if !(diameter.is_finite() && diameter > 0.0) {
            return Err(BackendError::InvalidGeometry {
                reason: format!("cylinder diameter must be positive, got {diameter}"),
            });
        }
        let segments = self.options.segments;
        if segments < MIN_STRUT_SEGMENTS {
            return Err(BackendError::InvalidGeometry {
                reason: format!(
                    "strut cross-section needs at least {MIN_STRUT_SEGMENTS} segments, got {segments}"
                ),
            });
        }
        let pending = self.pending("add_cylinder")?;
        let offset = pending.offset;
        match tessellate_strut(start + offset, end + offset, diameter / 2.0, segments) {
            Some(strut) => pending.mesh.merge(&strut),
            None => {
                pending.skipped_struts += 1;
                warn!(instance = %pending.name, ?start, ?end, "skipping zero-length strut");
            }
        }
        Ok(())
    }

    fn add_slab(
        &mut self,
        rect: PlateRect,
        z_ref: f64,
        thickness: f64,
        direction: ExtrudeDirection,
    ) -> Result<(), BackendError> {
        if rect.width() <= 0.0 || rect.depth() <= 0.0 {
            return Err(BackendError::InvalidGeometry {
                reason: format!(
                    "slab footprint {}x{} has no area",
                    rect.width(),
                    rect.depth()
                ),
            });
        }
        if !(thickness.is_finite() && thickness > 0.0) {
            return Err(BackendError::InvalidGeometry {
                reason: format!("slab thickness must be positive, got {thickness}"),
            });
        }
        let pending = self.pending("add_slab")?;
        let far = z_ref + direction.sign() * thickness;
        let min = Point3::new(rect.min_x, rect.min_y, z_ref.min(far)) + pending.offset;
        let max = Point3::new(rect.max_x, rect.max_y, z_ref.max(far)) + pending.offset;
        pending.mesh.merge(&tessellate_box(min, max));
        Ok(())
    }

    fn export_instance(&mut self, name: &str) -> Result<ExportArtifact, BackendError> {
        let pending = self
            .current
            .take()
            .ok_or_else(|| BackendError::NoActiveInstance {
                operation: "export_instance".to_string(),
            })?;
        if pending.name != name {
            return Err(BackendError::NameMismatch {
                expected: pending.name,
                found: name.to_string(),
            });
        }

        let bytes = self.options.format.encode(&pending.mesh, name)?;
        let path = self.write_artifact(name, &bytes)?;
        let size_bytes = bytes.len();
        debug!(
            instance = name,
            triangles = pending.mesh.triangle_count(),
            size_bytes,
            "instance tessellated"
        );
        if let Some(path) = &path {
            info!(instance = name, path = %path.display(), "exported STL");
        }

        self.exported.push(ExportedMesh {
            name: pending.name,
            mesh: pending.mesh,
            bytes: path.is_none().then_some(bytes),
            skipped_struts: pending.skipped_struts,
        });

        Ok(ExportArtifact {
            name: name.to_string(),
            path,
            size_bytes,
        })
    }
}
