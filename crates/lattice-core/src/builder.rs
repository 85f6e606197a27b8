//! Presence map to lattice geometry.

use std::collections::BTreeSet;

use lattice_types::{LatticeConfig, LatticeError, NodeIndex, PresenceMap};
use nalgebra::{Point3, Vector3};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::bounds::BoundingBox;
use crate::edge_key::parse_edge_key;
use crate::grid::{node_point, SpatialPoint};
use crate::plates::{compute_plate_geometry, PlateGeometry};

/// One present edge: the node pair it was keyed by and its end points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Strut {
    pub from: NodeIndex,
    pub to: NodeIndex,
    pub start: SpatialPoint,
    pub end: SpatialPoint,
}

impl Strut {
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// A strut keyed from a node to itself ("5-5").
    pub fn is_degenerate(&self) -> bool {
        self.from == self.to
    }
}

/// Node pairs of every present entry, in map order.
///
/// Absent entries are skipped before their key is parsed.
pub fn present_edges(map: &PresenceMap) -> Result<Vec<(NodeIndex, NodeIndex)>, LatticeError> {
    map.present_keys().map(parse_edge_key).collect()
}

/// Struts for every present entry, scaled by `lattice_spacing`.
pub fn build_struts(map: &PresenceMap, config: &LatticeConfig) -> Result<Vec<Strut>, LatticeError> {
    let spacing = config.lattice_spacing;
    Ok(present_edges(map)?
        .into_iter()
        .map(|(from, to)| Strut {
            from,
            to,
            start: node_point(from, spacing),
            end: node_point(to, spacing),
        })
        .collect())
}

/// Ordered end-point pairs of the present edges. Duplicates are kept.
pub fn build_edge_list(
    map: &PresenceMap,
    config: &LatticeConfig,
) -> Result<Vec<(SpatialPoint, SpatialPoint)>, LatticeError> {
    Ok(build_struts(map, config)?
        .into_iter()
        .map(|s| (s.start, s.end))
        .collect())
}

/// Distinct end nodes of the present edges.
pub fn used_nodes(map: &PresenceMap) -> Result<BTreeSet<NodeIndex>, LatticeError> {
    Ok(present_edges(map)?
        .into_iter()
        .flat_map(|(a, b)| [a, b])
        .collect())
}

/// Bounding box over the nodes the present edges touch.
///
/// Unreferenced grid nodes never widen the box. Fails with
/// [`LatticeError::EmptyLattice`] when nothing is present.
pub fn compute_bounding_box(
    map: &PresenceMap,
    config: &LatticeConfig,
) -> Result<BoundingBox, LatticeError> {
    let points: Vec<SpatialPoint> = used_nodes(map)?
        .into_iter()
        .map(|n| node_point(n, config.lattice_spacing))
        .collect();
    BoundingBox::from_points(&points).ok_or(LatticeError::EmptyLattice)
}

/// Placement of the `index`-th instance of a batch: `(index * spacing, 0, 0)`.
pub fn layout_offset(index: usize, spacing: f64) -> SpatialPoint {
    Point3::new(index as f64 * spacing, 0.0, 0.0)
}

/// Display and artifact name of the `index`-th instance (one-based).
pub fn instance_name(index: usize) -> String {
    format!("Lattice_{}", index + 1)
}

/// One fully decoded lattice, ready to hand to a geometry backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatticeInstance {
    index: usize,
    name: String,
    struts: Vec<Strut>,
    nodes: BTreeSet<NodeIndex>,
    bounds: BoundingBox,
    plates: PlateGeometry,
    offset: SpatialPoint,
}

impl LatticeInstance {
    /// Decode `map` as the `index`-th lattice of a batch.
    #[instrument(skip(map, config), fields(entries = map.len()))]
    pub fn build(
        index: usize,
        map: &PresenceMap,
        config: &LatticeConfig,
    ) -> Result<Self, LatticeError> {
        config.validate()?;

        let struts = build_struts(map, config)?;
        let nodes: BTreeSet<NodeIndex> = struts.iter().flat_map(|s| [s.from, s.to]).collect();
        let points: Vec<SpatialPoint> = nodes
            .iter()
            .map(|&n| node_point(n, config.lattice_spacing))
            .collect();
        let bounds = BoundingBox::from_points(&points).ok_or(LatticeError::EmptyLattice)?;
        let plates = compute_plate_geometry(&bounds, config);
        let offset = layout_offset(index, config.instance_spacing);

        debug!(
            struts = struts.len(),
            nodes = nodes.len(),
            min = ?bounds.min,
            max = ?bounds.max,
            "lattice decoded"
        );

        Ok(Self {
            index,
            name: instance_name(index),
            struts,
            nodes,
            bounds,
            plates,
            offset,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn struts(&self) -> &[Strut] {
        &self.struts
    }

    pub fn nodes(&self) -> &BTreeSet<NodeIndex> {
        &self.nodes
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    pub fn plates(&self) -> &PlateGeometry {
        &self.plates
    }

    /// Batch placement of this instance in model space.
    pub fn offset(&self) -> SpatialPoint {
        self.offset
    }

    pub fn offset_vector(&self) -> Vector3<f64> {
        self.offset.coords
    }

    pub fn edge_list(&self) -> Vec<(SpatialPoint, SpatialPoint)> {
        self.struts.iter().map(|s| (s.start, s.end)).collect()
    }
}
