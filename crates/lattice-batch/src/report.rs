//! Per-instance outcomes of a batch and their text summary.

use std::fmt;

use lattice_backend::ExportArtifact;
use lattice_core::LatticeError;

/// What happened to one lattice.
#[derive(Debug, Clone, PartialEq)]
pub enum OutcomeStatus {
    Exported { artifact: ExportArtifact },
    /// Built, but the backend rejected the geometry or could not export it.
    ExportFailed { reason: String },
    BuildFailed { error: LatticeError },
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstanceOutcome {
    pub index: usize,
    pub name: String,
    pub status: OutcomeStatus,
}

impl InstanceOutcome {
    pub fn is_exported(&self) -> bool {
        matches!(self.status, OutcomeStatus::Exported { .. })
    }
}

/// Outcomes in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub outcomes: Vec<InstanceOutcome>,
}

impl BatchReport {
    pub fn exported_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_exported()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.exported_count()
    }

    pub fn all_exported(&self) -> bool {
        self.failed_count() == 0
    }

    pub fn artifacts(&self) -> impl Iterator<Item = &ExportArtifact> {
        self.outcomes.iter().filter_map(|o| match &o.status {
            OutcomeStatus::Exported { artifact } => Some(artifact),
            _ => None,
        })
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "Lattice export ({} lattices, {} exported, {} failed):\n",
            self.outcomes.len(),
            self.exported_count(),
            self.failed_count(),
        ));

        for outcome in &self.outcomes {
            match &outcome.status {
                OutcomeStatus::Exported { artifact } => {
                    let target = match &artifact.path {
                        Some(path) => path.display().to_string(),
                        None => "in memory".to_string(),
                    };
                    out.push_str(&format!(
                        "  [OK] {}: {} bytes -> {}\n",
                        outcome.name, artifact.size_bytes, target,
                    ));
                }
                OutcomeStatus::ExportFailed { reason } => {
                    out.push_str(&format!("  [FAIL] {}: export: {}\n", outcome.name, reason));
                }
                OutcomeStatus::BuildFailed { error } => {
                    out.push_str(&format!("  [FAIL] {}: build: {}\n", outcome.name, error));
                }
            }
        }

        out.push_str(&format!(
            "\nCreated and exported {} lattices with plates.\n",
            self.exported_count()
        ));
        out
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}
