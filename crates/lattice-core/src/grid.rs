use lattice_types::{GridCoord, LatticeError, NodeIndex, GRID_SIDE};
use nalgebra::Point3;

/// A position in model length units.
pub type SpatialPoint = Point3<f64>;

/// Decode a raw one-based node index into its grid position.
///
/// Row-major with Z slowest: `i = index - 1`, `z = i / 9`,
/// `y = (i % 9) / 3`, `x = i % 3`.
pub fn decode_node(index: i64) -> Result<GridCoord, LatticeError> {
    Ok(node_coord(NodeIndex::new(index)?))
}

/// Grid position of an already validated node.
pub fn node_coord(node: NodeIndex) -> GridCoord {
    let i = node.get() - 1;
    let layer = GRID_SIDE * GRID_SIDE;
    GridCoord::new(i % GRID_SIDE, (i % layer) / GRID_SIDE, i / layer)
}

/// Inverse of [`decode_node`]. `None` when the coordinate is off the grid.
pub fn encode_node(coord: GridCoord) -> Option<NodeIndex> {
    if !coord.in_grid() {
        return None;
    }
    let index = coord.z as i64 * (GRID_SIDE * GRID_SIDE) as i64
        + coord.y as i64 * GRID_SIDE as i64
        + coord.x as i64
        + 1;
    NodeIndex::new(index).ok()
}

/// Model-space position of a node for the given grid step.
pub fn node_point(node: NodeIndex, spacing: f64) -> SpatialPoint {
    let c = node_coord(node);
    Point3::new(
        c.x as f64 * spacing,
        c.y as f64 * spacing,
        c.z as f64 * spacing,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_decode_reference_nodes() {
        assert_eq!(decode_node(1).unwrap(), GridCoord::new(0, 0, 0));
        assert_eq!(decode_node(14).unwrap(), GridCoord::new(1, 1, 1));
        assert_eq!(decode_node(27).unwrap(), GridCoord::new(2, 2, 2));
        assert_eq!(decode_node(2).unwrap(), GridCoord::new(1, 0, 0));
        assert_eq!(decode_node(4).unwrap(), GridCoord::new(0, 1, 0));
        assert_eq!(decode_node(10).unwrap(), GridCoord::new(0, 0, 1));
    }

    #[test]
    fn test_decode_rejects_out_of_range() {
        assert_eq!(
            decode_node(0),
            Err(LatticeError::InvalidNodeIndex { index: 0 })
        );
        assert_eq!(
            decode_node(28),
            Err(LatticeError::InvalidNodeIndex { index: 28 })
        );
    }

    #[test]
    fn test_decode_is_bijection() {
        let coords: HashSet<GridCoord> = NodeIndex::all().map(node_coord).collect();
        assert_eq!(coords.len(), 27);
        assert!(coords.iter().all(GridCoord::in_grid));
    }

    #[test]
    fn test_encode_inverts_decode() {
        for node in NodeIndex::all() {
            assert_eq!(encode_node(node_coord(node)), Some(node));
        }
        assert_eq!(encode_node(GridCoord::new(3, 0, 0)), None);
    }

    #[test]
    fn test_node_point_scales_by_spacing() {
        let node = NodeIndex::new(27).unwrap();
        assert_eq!(node_point(node, 1.0), Point3::new(2.0, 2.0, 2.0));
        assert_eq!(node_point(node, 2.5), Point3::new(5.0, 5.0, 5.0));
    }
}
