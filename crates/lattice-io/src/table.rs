//! Conversion from a column table (one header row, one row per lattice)
//! into presence maps.
//!
//! Spreadsheet exports disambiguate repeated column names with a `.N`
//! suffix; [`clean_header`] drops it so `1-2.1` and `1-2` read as the same
//! edge.

use std::path::Path;

use lattice_types::{Presence, PresenceMap};
use tracing::debug;

use crate::errors::LoadError;
use crate::load::read;

/// Header text before the first `.`.
pub fn clean_header(header: &str) -> &str {
    match header.split_once('.') {
        Some((head, _)) => head,
        None => header,
    }
}

/// Presence of a single table cell.
///
/// Cells are read the way an integer cast reads them: surrounding
/// whitespace is ignored and a fractional part is truncated. Only a result
/// of exactly 1 is present.
pub fn coerce_cell(cell: &str) -> Presence {
    let cell = cell.trim();
    if let Ok(flag) = cell.parse::<i64>() {
        return Presence::from_flag(flag);
    }
    match cell.parse::<f64>() {
        Ok(value) if value.is_finite() => {
            if value.trunc() == 1.0 {
                Presence::Present
            } else {
                Presence::Absent
            }
        }
        _ => Presence::Absent,
    }
}

/// One presence map per row, keyed by the cleaned headers.
///
/// Short rows are padded with absent entries. A row with more cells than
/// there are headers is rejected.
pub fn table_to_presence_maps<H, R, C>(headers: &[H], rows: R) -> Result<Vec<PresenceMap>, LoadError>
where
    H: AsRef<str>,
    R: IntoIterator,
    R::Item: AsRef<[C]>,
    C: AsRef<str>,
{
    let keys: Vec<&str> = headers.iter().map(|h| clean_header(h.as_ref())).collect();

    rows.into_iter()
        .enumerate()
        .map(|(row_index, row)| {
            let cells = row.as_ref();
            if cells.len() > keys.len() {
                return Err(LoadError::RaggedRow {
                    row: row_index,
                    cells: cells.len(),
                    headers: keys.len(),
                });
            }
            let map: PresenceMap = keys
                .iter()
                .enumerate()
                .map(|(col, &key)| {
                    let presence = cells
                        .get(col)
                        .map(|c| coerce_cell(c.as_ref()))
                        .unwrap_or_default();
                    (key, presence)
                })
                .collect();
            Ok(map)
        })
        .collect()
}

/// Parse delimited text: a header row of edge keys, then one row per lattice.
///
/// Blank lines are skipped. Fields are split on `delimiter` without quoting
/// rules; edge keys and flags never contain the delimiter.
pub fn parse_table(text: &str, delimiter: char) -> Result<Vec<PresenceMap>, LoadError> {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());
    let headers: Vec<&str> = lines
        .next()
        .ok_or_else(|| LoadError::ParseError("table has no header row".to_string()))?
        .split(delimiter)
        .map(str::trim)
        .collect();
    let rows: Vec<Vec<&str>> = lines.map(|l| l.split(delimiter).collect()).collect();
    table_to_presence_maps::<_, _, &str>(&headers[..], &rows)
}

pub fn load_table_file(path: &Path, delimiter: char) -> Result<Vec<PresenceMap>, LoadError> {
    let text = read(path)?;
    let maps = parse_table(&text, delimiter)?;
    debug!(path = %path.display(), lattices = maps.len(), "converted table");
    Ok(maps)
}
