//! `"A-B"` edge key parsing.

use lattice_types::{LatticeError, NodeIndex};

/// Drop a spreadsheet duplicate-column suffix: everything from the first `.`.
pub fn strip_suffix(key: &str) -> &str {
    match key.find('.') {
        Some(pos) => &key[..pos],
        None => key,
    }
}

/// Parse an edge key into its two (unordered) end nodes.
///
/// Accepts `"3-4"` and `"3-4.1"`. Both sides must be unsigned integers,
/// so a second hyphen or a sign is a malformed key rather than a
/// negative node.
pub fn parse_edge_key(key: &str) -> Result<(NodeIndex, NodeIndex), LatticeError> {
    let body = strip_suffix(key);
    let (a, b) = body
        .split_once('-')
        .ok_or_else(|| malformed(key, "missing '-' separator"))?;
    let a = parse_node_token(key, a)?;
    let b = parse_node_token(key, b)?;
    Ok((NodeIndex::new(a)?, NodeIndex::new(b)?))
}

/// Canonical key for a node pair, as written by the upstream converter.
pub fn format_edge_key(a: NodeIndex, b: NodeIndex) -> String {
    format!("{a}-{b}")
}

fn parse_node_token(key: &str, token: &str) -> Result<i64, LatticeError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(malformed(key, "empty node token"));
    }
    if !token.chars().all(|c| c.is_ascii_digit()) {
        return Err(malformed(key, &format!("{token:?} is not an unsigned integer")));
    }
    token
        .parse::<i64>()
        .map_err(|e| malformed(key, &e.to_string()))
}

fn malformed(key: &str, reason: &str) -> LatticeError {
    LatticeError::MalformedEdgeKey {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
