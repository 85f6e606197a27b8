//! Lattice topology reconstruction.
//!
//! Maps a sparse edge-presence encoding over a fixed 3x3x3 node grid to
//! strut end points, a bounding box over the nodes actually used, end-plate
//! geometry, and a batch placement offset. Everything here is a pure
//! function of its inputs; geometry backends consume the result.

pub mod bounds;
pub mod builder;
pub mod edge_key;
pub mod grid;
pub mod plates;

pub use bounds::BoundingBox;
pub use builder::{
    build_edge_list, build_struts, compute_bounding_box, instance_name, layout_offset,
    present_edges, used_nodes, LatticeInstance, Strut,
};
pub use edge_key::{format_edge_key, parse_edge_key, strip_suffix};
pub use grid::{decode_node, encode_node, node_coord, node_point, SpatialPoint};
pub use plates::{compute_plate_geometry, ExtrudeDirection, Plate, PlateGeometry, PlateRect};

pub use lattice_types::{
    GridCoord, LatticeConfig, LatticeError, NodeIndex, Presence, PresenceEntry, PresenceMap,
};
