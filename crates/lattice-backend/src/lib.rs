pub mod mesh;
pub mod mesh_backend;
pub mod recording;
pub mod stl;
pub mod traits;

pub use mesh::TriangleMesh;
pub use mesh_backend::{
    ExportedMesh, MeshBackend, MeshBackendOptions, DEFAULT_STRUT_SEGMENTS,
    MIN_STRUT_SEGMENTS,
};
pub use recording::{BackendCommand, RecordingBackend};
pub use stl::StlFormat;
pub use traits::*;
