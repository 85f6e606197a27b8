//! Binary and ASCII STL encoding of a TriangleMesh.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::mesh::TriangleMesh;
use crate::traits::BackendError;

/// STL flavor written by the mesh backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StlFormat {
    #[default]
    Binary,
    Ascii,
}

impl StlFormat {
    pub fn encode(self, mesh: &TriangleMesh, name: &str) -> Result<Vec<u8>, BackendError> {
        match self {
            StlFormat::Binary => encode_binary(mesh, name),
            StlFormat::Ascii => encode_ascii(mesh, name).map(String::into_bytes),
        }
    }
}

fn validate(mesh: &TriangleMesh, name: &str) -> Result<usize, BackendError> {
    let tri_count = mesh.triangle_count();
    if tri_count == 0 {
        return Err(BackendError::EmptyMesh {
            name: name.to_string(),
        });
    }
    let vertex_count = mesh.vertex_count();
    if let Some(&idx) = mesh.indices.iter().find(|&&i| i as usize >= vertex_count) {
        return Err(BackendError::InvalidGeometry {
            reason: format!("index {idx} out of range (vertex count = {vertex_count})"),
        });
    }
    Ok(tri_count)
}

fn vertex(mesh: &TriangleMesh, idx: u32) -> [f32; 3] {
    let i = idx as usize * 3;
    [mesh.positions[i], mesh.positions[i + 1], mesh.positions[i + 2]]
}

/// Face normal from the winding; +Z for degenerate triangles.
fn facet_normal(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> [f32; 3] {
    let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    let n = [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ];
    let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
    if len > 1e-12 {
        [n[0] / len, n[1] / len, n[2] / len]
    } else {
        [0.0, 0.0, 1.0]
    }
}

/// Binary STL:
/// - 80-byte header (arbitrary text)
/// - u32 triangle count (little-endian)
/// - per triangle: 3×f32 normal + 3×(3×f32 vertex) + u16 attribute = 50 bytes
pub fn encode_binary(mesh: &TriangleMesh, name: &str) -> Result<Vec<u8>, BackendError> {
    let tri_count = validate(mesh, name)?;
    let mut buf = Vec::with_capacity(80 + 4 + tri_count * 50);

    let header = format!("binary STL: {name}");
    let header_bytes = header.as_bytes();
    buf.extend_from_slice(&header_bytes[..header_bytes.len().min(80)]);
    buf.resize(80, 0u8);

    buf.extend_from_slice(&(tri_count as u32).to_le_bytes());

    for tri in mesh.indices.chunks_exact(3) {
        let corners = [vertex(mesh, tri[0]), vertex(mesh, tri[1]), vertex(mesh, tri[2])];
        let normal = facet_normal(corners[0], corners[1], corners[2]);
        for value in normal.iter().chain(corners.iter().flatten()) {
            buf.extend_from_slice(&value.to_le_bytes());
        }
        buf.extend_from_slice(&0u16.to_le_bytes());
    }

    Ok(buf)
}

/// ASCII STL text.
pub fn encode_ascii(mesh: &TriangleMesh, name: &str) -> Result<String, BackendError> {
    let tri_count = validate(mesh, name)?;
    let mut out = String::with_capacity(tri_count * 300);
    let _ = writeln!(out, "solid {name}");

    for tri in mesh.indices.chunks_exact(3) {
        let corners = [vertex(mesh, tri[0]), vertex(mesh, tri[1]), vertex(mesh, tri[2])];
        let [nx, ny, nz] = facet_normal(corners[0], corners[1], corners[2]);
        let _ = writeln!(out, "  facet normal {nx} {ny} {nz}");
        out.push_str("    outer loop\n");
        for [x, y, z] in corners {
            let _ = writeln!(out, "      vertex {x} {y} {z}");
        }
        out.push_str("    endloop\n");
        out.push_str("  endfacet\n");
    }

    let _ = writeln!(out, "endsolid {name}");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::tessellate_box;
    use nalgebra::Point3;

    fn unit_box() -> TriangleMesh {
        tessellate_box(Point3::origin(), Point3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_binary_layout() {
        let stl = encode_binary(&unit_box(), "Lattice_1").unwrap();
        assert_eq!(stl.len(), 80 + 4 + 12 * 50);
        let header = String::from_utf8_lossy(&stl[..80]);
        assert!(header.contains("Lattice_1"));
        let count = u32::from_le_bytes([stl[80], stl[81], stl[82], stl[83]]);
        assert_eq!(count, 12);
    }

    #[test]
    fn test_binary_first_normal_points_down() {
        let stl = encode_binary(&unit_box(), "b").unwrap();
        let nz = f32::from_le_bytes([stl[92], stl[93], stl[94], stl[95]]);
        assert_eq!(nz, -1.0);
    }

    #[test]
    fn test_ascii_structure() {
        let text = encode_ascii(&unit_box(), "Lattice_2").unwrap();
        assert!(text.starts_with("solid Lattice_2\n"));
        assert!(text.ends_with("endsolid Lattice_2\n"));
        assert_eq!(text.matches("facet normal").count(), 12);
        assert_eq!(text.matches("vertex").count(), 36);
    }

    #[test]
    fn test_empty_mesh_rejected() {
        let err = encode_binary(&TriangleMesh::new(), "empty").unwrap_err();
        assert_eq!(
            err,
            BackendError::EmptyMesh {
                name: "empty".to_string()
            }
        );
        assert!(StlFormat::Ascii.encode(&TriangleMesh::new(), "x").is_err());
    }

    #[test]
    fn test_out_of_range_index_rejected() {
        let mut mesh = unit_box();
        mesh.indices.push(999);
        mesh.indices.push(0);
        mesh.indices.push(1);
        assert!(matches!(
            encode_binary(&mesh, "bad"),
            Err(BackendError::InvalidGeometry { .. })
        ));
    }
}
