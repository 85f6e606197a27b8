use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::LatticeError;

/// Number of grid points along each axis of the node grid.
pub const GRID_SIDE: u8 = 3;

/// Total number of addressable nodes (3 x 3 x 3).
pub const NODE_COUNT: u8 = GRID_SIDE * GRID_SIDE * GRID_SIDE;

/// One-based identifier of a node in the fixed 3x3x3 grid.
///
/// Always in `1..=27`; the only way to obtain one is through [`NodeIndex::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct NodeIndex(u8);

impl NodeIndex {
    pub const MIN: Self = Self(1);
    pub const MAX: Self = Self(NODE_COUNT);

    pub fn new(index: i64) -> Result<Self, LatticeError> {
        if (1..=NODE_COUNT as i64).contains(&index) {
            Ok(Self(index as u8))
        } else {
            Err(LatticeError::InvalidNodeIndex { index })
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Every node of the grid in ascending index order.
    pub fn all() -> impl Iterator<Item = NodeIndex> {
        (1..=NODE_COUNT).map(NodeIndex)
    }
}

impl TryFrom<i64> for NodeIndex {
    type Error = LatticeError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NodeIndex> for i64 {
    fn from(node: NodeIndex) -> Self {
        node.0 as i64
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Integer position of a node in the grid, each axis in `0..3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: u8,
    pub y: u8,
    pub z: u8,
}

impl GridCoord {
    pub fn new(x: u8, y: u8, z: u8) -> Self {
        Self { x, y, z }
    }

    pub fn in_grid(&self) -> bool {
        self.x < GRID_SIDE && self.y < GRID_SIDE && self.z < GRID_SIDE
    }

    pub fn to_array(&self) -> [u8; 3] {
        [self.x, self.y, self.z]
    }
}
