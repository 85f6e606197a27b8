use std::fs;
use std::path::Path;

use lattice_types::{LatticeConfig, PresenceMap};
use serde_json::Value;
use tracing::debug;

use crate::errors::LoadError;

/// Parse a JSON list of presence maps, one flat object per lattice.
///
/// Values are coerced with the presence rules, so `null` or junk flags
/// load as absent edges instead of failing. Key order and duplicate keys
/// survive, which is why the maps are read from the text directly rather
/// than through a `serde_json::Value`.
pub fn load_lattices(json: &str) -> Result<Vec<PresenceMap>, LoadError> {
    let raw: Value = serde_json::from_str(json).map_err(|e| LoadError::ParseError(e.to_string()))?;

    let items = match &raw {
        Value::Array(items) => items,
        other => {
            return Err(LoadError::NotAList {
                found: json_kind(other).to_string(),
            })
        }
    };
    if let Some((index, item)) = items.iter().enumerate().find(|(_, item)| !item.is_object()) {
        return Err(LoadError::NotAnObject {
            index,
            reason: format!("found {}", json_kind(item)),
        });
    }

    serde_json::from_str(json).map_err(|e| LoadError::ParseError(e.to_string()))
}

pub fn load_lattices_file(path: &Path) -> Result<Vec<PresenceMap>, LoadError> {
    let json = read(path)?;
    let maps = load_lattices(&json)?;
    debug!(path = %path.display(), lattices = maps.len(), "loaded presence maps");
    Ok(maps)
}

/// Read a [`LatticeConfig`] JSON file; missing fields take their defaults.
pub fn load_config_file(path: &Path) -> Result<LatticeConfig, LoadError> {
    let json = read(path)?;
    serde_json::from_str(&json).map_err(|e| LoadError::ParseError(e.to_string()))
}

pub(crate) fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
