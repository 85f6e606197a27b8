//! Batch driver: turns a list of presence maps into exported lattice
//! instances laid out side by side.
//!
//! Building is pure and runs in parallel. Backends are driven one instance
//! at a time, in input order, and a failure is confined to the instance
//! that caused it.

pub mod report;
pub mod runner;

pub use report::{BatchReport, InstanceOutcome, OutcomeStatus};
pub use runner::{build_instances, run_batch, BatchError};
