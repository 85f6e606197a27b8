use std::fs;
use std::path::Path;

use lattice_types::PresenceMap;
use tracing::debug;

use crate::errors::LoadError;

/// Serialize presence maps as a pretty-printed JSON list of 0/1 flags.
pub fn save_lattices(maps: &[PresenceMap]) -> Result<String, LoadError> {
    serde_json::to_string_pretty(maps).map_err(|e| LoadError::ParseError(e.to_string()))
}

pub fn save_lattices_file(maps: &[PresenceMap], path: &Path) -> Result<(), LoadError> {
    let json = save_lattices(maps)?;
    fs::write(path, json).map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    debug!(path = %path.display(), lattices = maps.len(), "saved presence maps");
    Ok(())
}
