use std::path::PathBuf;

/// Errors while reading or writing presence-map files.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LoadError {
    #[error("failed to parse file: {0}")]
    ParseError(String),

    #[error("expected a top-level list of lattices, found {found}")]
    NotAList { found: String },

    #[error("lattice {index} is not a flat object of edge flags: {reason}")]
    NotAnObject { index: usize, reason: String },

    #[error("row {row} has {cells} cells but only {headers} headers")]
    RaggedRow {
        row: usize,
        cells: usize,
        headers: usize,
    },

    #[error("I/O error at {path}: {reason}")]
    Io { path: PathBuf, reason: String },
}
