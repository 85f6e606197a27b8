//! Triangle meshes for struts and plates.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// An indexed triangle mesh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriangleMesh {
    /// Vertex positions [x, y, z, x, y, z, ...]
    pub positions: Vec<f32>,
    /// Vertex normals [nx, ny, nz, ...]
    pub normals: Vec<f32>,
    /// Triangle indices [i0, i1, i2, ...]
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn add_vertex(&mut self, pos: Point3<f64>, normal: Vector3<f64>) -> u32 {
        let idx = self.vertex_count() as u32;
        self.positions
            .extend_from_slice(&[pos.x as f32, pos.y as f32, pos.z as f32]);
        self.normals
            .extend_from_slice(&[normal.x as f32, normal.y as f32, normal.z as f32]);
        idx
    }

    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.extend_from_slice(&[i0, i1, i2]);
    }

    pub fn merge(&mut self, other: &TriangleMesh) {
        let offset = self.vertex_count() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.indices.extend(other.indices.iter().map(|&idx| idx + offset));
    }

    /// Componentwise (min, max) over all vertex positions.
    pub fn bounding_box(&self) -> Option<([f32; 3], [f32; 3])> {
        let mut chunks = self.positions.chunks_exact(3);
        let first = chunks.next()?;
        let mut min = [first[0], first[1], first[2]];
        let mut max = min;
        for p in chunks {
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }
        Some((min, max))
    }

    /// Add a planar quad with corners in counter-clockwise order seen from outside.
    fn add_quad(&mut self, corners: [Point3<f64>; 4], normal: Vector3<f64>) {
        let ids = corners.map(|c| self.add_vertex(c, normal));
        self.add_triangle(ids[0], ids[1], ids[2]);
        self.add_triangle(ids[0], ids[2], ids[3]);
    }
}

/// Two unit vectors perpendicular to `axis` such that `(u, v, axis)` is right-handed.
fn perpendicular_basis(axis: &Vector3<f64>) -> (Vector3<f64>, Vector3<f64>) {
    let reference = if axis.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    let u = axis.cross(&reference).normalize();
    let v = axis.cross(&u);
    (u, v)
}

/// Capped `segments`-gon prism of the given radius from `start` to `end`.
///
/// Returns `None` for a zero-length strut. Produces `4 * segments` triangles.
pub fn tessellate_strut(
    start: Point3<f64>,
    end: Point3<f64>,
    radius: f64,
    segments: usize,
) -> Option<TriangleMesh> {
    let axis = end - start;
    let length = axis.norm();
    if length < f64::EPSILON || segments < 3 {
        return None;
    }
    let axis = axis / length;
    let (u, v) = perpendicular_basis(&axis);

    let radial: Vec<Vector3<f64>> = (0..segments)
        .map(|i| {
            let angle = std::f64::consts::TAU * (i as f64) / (segments as f64);
            u * angle.cos() + v * angle.sin()
        })
        .collect();

    let mut mesh = TriangleMesh::new();

    // Side wall, radial normals.
    let side: Vec<(u32, u32)> = radial
        .iter()
        .map(|r| {
            let s = mesh.add_vertex(start + r * radius, *r);
            let e = mesh.add_vertex(end + r * radius, *r);
            (s, e)
        })
        .collect();
    for i in 0..segments {
        let (s0, e0) = side[i];
        let (s1, e1) = side[(i + 1) % segments];
        mesh.add_triangle(s0, s1, e1);
        mesh.add_triangle(s0, e1, e0);
    }

    // End caps, axial normals.
    let start_center = mesh.add_vertex(start, -axis);
    let start_ring: Vec<u32> = radial
        .iter()
        .map(|r| mesh.add_vertex(start + r * radius, -axis))
        .collect();
    let end_center = mesh.add_vertex(end, axis);
    let end_ring: Vec<u32> = radial
        .iter()
        .map(|r| mesh.add_vertex(end + r * radius, axis))
        .collect();
    for i in 0..segments {
        let next = (i + 1) % segments;
        mesh.add_triangle(start_center, start_ring[next], start_ring[i]);
        mesh.add_triangle(end_center, end_ring[i], end_ring[next]);
    }

    Some(mesh)
}

/// Axis-aligned box spanning `min..max`. 12 triangles, outward normals.
pub fn tessellate_box(min: Point3<f64>, max: Point3<f64>) -> TriangleMesh {
    // Corners named by which bound each axis takes: `c_xyz`, 0 = min, 1 = max.
    let c000 = Point3::new(min.x, min.y, min.z);
    let c100 = Point3::new(max.x, min.y, min.z);
    let c010 = Point3::new(min.x, max.y, min.z);
    let c110 = Point3::new(max.x, max.y, min.z);
    let c001 = Point3::new(min.x, min.y, max.z);
    let c101 = Point3::new(max.x, min.y, max.z);
    let c011 = Point3::new(min.x, max.y, max.z);
    let c111 = Point3::new(max.x, max.y, max.z);

    let mut mesh = TriangleMesh::new();
    mesh.add_quad([c000, c010, c110, c100], -Vector3::z());
    mesh.add_quad([c001, c101, c111, c011], Vector3::z());
    mesh.add_quad([c000, c100, c101, c001], -Vector3::y());
    mesh.add_quad([c010, c011, c111, c110], Vector3::y());
    mesh.add_quad([c000, c001, c011, c010], -Vector3::x());
    mesh.add_quad([c100, c110, c111, c101], Vector3::x());
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Signed volume via the divergence theorem; positive for outward winding.
    fn signed_volume(mesh: &TriangleMesh) -> f64 {
        let pos = |i: u32| {
            let i = i as usize * 3;
            Vector3::new(
                mesh.positions[i] as f64,
                mesh.positions[i + 1] as f64,
                mesh.positions[i + 2] as f64,
            )
        };
        mesh.indices
            .chunks_exact(3)
            .map(|t| pos(t[0]).dot(&pos(t[1]).cross(&pos(t[2]))) / 6.0)
            .sum()
    }

    #[test]
    fn test_box_counts_and_volume() {
        let mesh = tessellate_box(Point3::new(0.0, 0.0, -0.25), Point3::new(2.0, 1.0, -0.05));
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(mesh.vertex_count(), 24);
        assert_relative_eq!(signed_volume(&mesh), 2.0 * 1.0 * 0.2, epsilon = 1e-5);
    }

    #[test]
    fn test_strut_counts_and_volume() {
        let segments = 12;
        let mesh = tessellate_strut(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 1.0),
            0.1,
            segments,
        )
        .unwrap();
        assert_eq!(mesh.triangle_count(), 4 * segments);

        // Regular n-gon prism: area = n/2 * r^2 * sin(2pi/n).
        let n = segments as f64;
        let area = n / 2.0 * 0.01 * (std::f64::consts::TAU / n).sin();
        assert_relative_eq!(signed_volume(&mesh), area * 3f64.sqrt(), epsilon = 1e-5);
    }

    #[test]
    fn test_strut_along_x_axis() {
        let mesh =
            tessellate_strut(Point3::origin(), Point3::new(2.0, 0.0, 0.0), 0.1, 8).unwrap();
        let (min, max) = mesh.bounding_box().unwrap();
        assert_relative_eq!(min[0], 0.0);
        assert_relative_eq!(max[0], 2.0);
        assert!(max[1] <= 0.1 + 1e-6 && min[1] >= -0.1 - 1e-6);
    }

    #[test]
    fn test_degenerate_strut() {
        let p = Point3::new(1.0, 1.0, 1.0);
        assert!(tessellate_strut(p, p, 0.1, 12).is_none());
        assert!(tessellate_strut(Point3::origin(), p, 0.1, 2).is_none());
    }

    #[test]
    fn test_merge_offsets_indices() {
        let mut a = tessellate_box(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        let b = tessellate_box(Point3::new(2.0, 0.0, 0.0), Point3::new(3.0, 1.0, 1.0));
        a.merge(&b);
        assert_eq!(a.triangle_count(), 24);
        assert!(a.indices[36..].iter().all(|&i| i >= 24));
        let (min, max) = a.bounding_box().unwrap();
        assert_eq!(min, [0.0, 0.0, 0.0]);
        assert_eq!(max, [3.0, 1.0, 1.0]);
    }
}
