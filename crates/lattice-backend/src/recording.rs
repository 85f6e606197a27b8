//! Deterministic GeometryBackend test double.
//!
//! Records every instruction it receives so tests can assert on exactly
//! what a caller emitted, without building any geometry.

use lattice_core::{ExtrudeDirection, PlateRect, SpatialPoint};
use nalgebra::Vector3;

use crate::traits::{BackendError, ExportArtifact, GeometryBackend};

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCommand {
    BeginInstance {
        name: String,
        offset: Vector3<f64>,
    },
    Cylinder {
        start: SpatialPoint,
        end: SpatialPoint,
        diameter: f64,
    },
    Slab {
        rect: PlateRect,
        z_ref: f64,
        thickness: f64,
        direction: ExtrudeDirection,
    },
    Export {
        name: String,
    },
}

/// Records commands; can be told to fail the export of specific instances.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    commands: Vec<BackendCommand>,
    active: Option<String>,
    fail_exports: Vec<String>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `export_instance(name)` fail with an I/O error.
    pub fn fail_export_of(mut self, name: &str) -> Self {
        self.fail_exports.push(name.to_string());
        self
    }

    pub fn commands(&self) -> &[BackendCommand] {
        &self.commands
    }

    pub fn cylinder_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, BackendCommand::Cylinder { .. }))
            .count()
    }

    pub fn slab_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, BackendCommand::Slab { .. }))
            .count()
    }

    /// Names passed to `begin_instance`, in call order.
    pub fn instance_names(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                BackendCommand::BeginInstance { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    fn require_active(&self, operation: &str) -> Result<(), BackendError> {
        if self.active.is_none() {
            return Err(BackendError::NoActiveInstance {
                operation: operation.to_string(),
            });
        }
        Ok(())
    }
}

impl GeometryBackend for RecordingBackend {
    fn begin_instance(&mut self, name: &str, offset: Vector3<f64>) -> Result<(), BackendError> {
        self.active = Some(name.to_string());
        self.commands.push(BackendCommand::BeginInstance {
            name: name.to_string(),
            offset,
        });
        Ok(())
    }

    fn add_cylinder(
        &mut self,
        start: SpatialPoint,
        end: SpatialPoint,
        diameter: f64,
    ) -> Result<(), BackendError> {
        self.require_active("add_cylinder")?;
        self.commands.push(BackendCommand::Cylinder {
            start,
            end,
            diameter,
        });
        Ok(())
    }

    fn add_slab(
        &mut self,
        rect: PlateRect,
        z_ref: f64,
        thickness: f64,
        direction: ExtrudeDirection,
    ) -> Result<(), BackendError> {
        self.require_active("add_slab")?;
        self.commands.push(BackendCommand::Slab {
            rect,
            z_ref,
            thickness,
            direction,
        });
        Ok(())
    }

    fn export_instance(&mut self, name: &str) -> Result<ExportArtifact, BackendError> {
        let active = self
            .active
            .take()
            .ok_or_else(|| BackendError::NoActiveInstance {
                operation: "export_instance".to_string(),
            })?;
        if active != name {
            return Err(BackendError::NameMismatch {
                expected: active,
                found: name.to_string(),
            });
        }
        self.commands.push(BackendCommand::Export {
            name: name.to_string(),
        });
        if self.fail_exports.iter().any(|n| n == name) {
            return Err(BackendError::Io {
                path: format!("{name}.stl").into(),
                reason: "simulated export failure".to_string(),
            });
        }
        Ok(ExportArtifact {
            name: name.to_string(),
            path: None,
            size_bytes: 0,
        })
    }
}
