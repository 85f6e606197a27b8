use lattice_backend::{emit_instance, GeometryBackend};
use lattice_core::{instance_name, LatticeConfig, LatticeError, LatticeInstance, PresenceMap};
use rayon::prelude::*;
use tracing::{info, instrument, warn};

use crate::report::{BatchReport, InstanceOutcome, OutcomeStatus};

/// Errors that stop a batch before any instance is attempted.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BatchError {
    #[error("invalid configuration: {0}")]
    Config(LatticeError),
}

/// Build every instance in parallel.
///
/// Results come back in input order; instance `i` is placed by index `i`
/// regardless of which build finishes first.
pub fn build_instances(
    maps: &[PresenceMap],
    config: &LatticeConfig,
) -> Vec<Result<LatticeInstance, LatticeError>> {
    maps.par_iter()
        .enumerate()
        .map(|(index, map)| LatticeInstance::build(index, map, config))
        .collect()
}

/// Build, emit and export every lattice through `backend`.
///
/// An invalid config aborts the whole run. Otherwise each instance gets
/// exactly one attempt and its outcome is recorded in the report.
#[instrument(skip_all, fields(lattices = maps.len()))]
pub fn run_batch(
    maps: &[PresenceMap],
    config: &LatticeConfig,
    backend: &mut dyn GeometryBackend,
) -> Result<BatchReport, BatchError> {
    config.validate().map_err(BatchError::Config)?;

    let outcomes = build_instances(maps, config)
        .into_iter()
        .enumerate()
        .map(|(index, built)| {
            let name = instance_name(index);
            let status = match built {
                Err(error) => {
                    warn!(instance = %name, %error, "build failed");
                    OutcomeStatus::BuildFailed { error }
                }
                Ok(instance) => export_one(backend, &instance, config),
            };
            InstanceOutcome {
                index,
                name,
                status,
            }
        })
        .collect();

    let report = BatchReport { outcomes };
    info!(
        exported = report.exported_count(),
        failed = report.failed_count(),
        "batch finished"
    );
    Ok(report)
}

fn export_one(
    backend: &mut dyn GeometryBackend,
    instance: &LatticeInstance,
    config: &LatticeConfig,
) -> OutcomeStatus {
    let result = emit_instance(backend, instance, config)
        .and_then(|()| backend.export_instance(instance.name()));
    match result {
        Ok(artifact) => OutcomeStatus::Exported { artifact },
        Err(e) => {
            warn!(instance = instance.name(), error = %e, "export failed");
            OutcomeStatus::ExportFailed {
                reason: e.to_string(),
            }
        }
    }
}
