//! Driving the backends with decoded lattices.

use lattice_backend::{
    emit_instance, BackendCommand, GeometryBackend, MeshBackend, MeshBackendOptions,
    RecordingBackend, StlFormat, DEFAULT_STRUT_SEGMENTS,
};
use lattice_core::{LatticeConfig, LatticeInstance, PresenceMap};

fn sample_instance(index: usize) -> (LatticeInstance, LatticeConfig) {
    let map = PresenceMap::from_flags([
        ("1-5", 1),
        ("3-5", 1),
        ("5-14", 1),
        ("14-23", 1),
        ("14-27", 0),
        ("7-9", 1),
    ]);
    let config = LatticeConfig::default();
    (LatticeInstance::build(index, &map, &config).unwrap(), config)
}

#[test]
fn recording_backend_sees_one_cylinder_per_edge() {
    let (inst, config) = sample_instance(0);
    let mut backend = RecordingBackend::new();
    emit_instance(&mut backend, &inst, &config).unwrap();

    assert_eq!(backend.cylinder_count(), 5);
    assert_eq!(backend.slab_count(), 2);
    assert_eq!(backend.instance_names(), vec!["Lattice_1"]);

    // Cylinders come out in presence-map order.
    let starts: Vec<_> = backend
        .commands()
        .iter()
        .filter_map(|c| match c {
            BackendCommand::Cylinder { start, .. } => Some(*start),
            _ => None,
        })
        .collect();
    let expected: Vec<_> = inst.struts().iter().map(|s| s.start).collect();
    assert_eq!(starts, expected);
}

#[test]
fn mesh_backend_triangle_budget() {
    let (inst, config) = sample_instance(2);
    let mut backend = MeshBackend::in_memory();
    emit_instance(&mut backend, &inst, &config).unwrap();
    let artifact = backend.export_instance(inst.name()).unwrap();

    let exported = backend.exported_mesh("Lattice_3").unwrap();
    let expected_triangles = 5 * 4 * DEFAULT_STRUT_SEGMENTS + 2 * 12;
    assert_eq!(exported.mesh.triangle_count(), expected_triangles);
    assert_eq!(artifact.size_bytes, 84 + expected_triangles * 50);
    assert!(artifact.path.is_none());
    assert_eq!(exported.bytes.as_ref().map(Vec::len), Some(artifact.size_bytes));
}

#[test]
fn mesh_backend_places_instance_at_offset() {
    let (inst, config) = sample_instance(4);
    let mut backend = MeshBackend::in_memory();
    emit_instance(&mut backend, &inst, &config).unwrap();
    backend.export_instance(inst.name()).unwrap();

    let (min, max) = backend.exported()[0].mesh.bounding_box().unwrap();
    // Offset 40 along X; plates span the grid exactly, struts reach at most
    // one radius beyond it.
    assert!(min[0] <= 40.0 + 1e-5 && min[0] >= 39.9 - 1e-5, "min x = {}", min[0]);
    assert!(max[0] >= 42.0 - 1e-5 && max[0] <= 42.1 + 1e-5, "max x = {}", max[0]);
    // Bottom plate underside and top plate upper face.
    assert!((min[2] - -0.25).abs() < 1e-5, "min z = {}", min[2]);
    assert!(max[2] >= 1.40 - 1e-5);
}

#[test]
fn mesh_backend_writes_files() {
    let dir = std::env::temp_dir().join(format!("lattice-backend-test-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);

    let mut backend = MeshBackend::new(MeshBackendOptions {
        format: StlFormat::Ascii,
        output_dir: Some(dir.clone()),
        ..MeshBackendOptions::default()
    });
    for index in 0..2 {
        let (inst, config) = sample_instance(index);
        emit_instance(&mut backend, &inst, &config).unwrap();
        let artifact = backend.export_instance(inst.name()).unwrap();
        let path = artifact.path.unwrap();
        assert_eq!(path, dir.join(format!("Lattice_{}.stl", index + 1)));
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with(&format!("solid Lattice_{}", index + 1)));
    }
    assert!(backend.exported().iter().all(|e| e.bytes.is_none()));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn mesh_backend_refuses_open_strut_cross_section() {
    let (inst, config) = sample_instance(0);
    let mut backend = MeshBackend::new(MeshBackendOptions {
        segments: 2,
        ..MeshBackendOptions::default()
    });
    let err = emit_instance(&mut backend, &inst, &config).unwrap_err();
    assert!(matches!(err, lattice_backend::BackendError::InvalidGeometry { .. }));
    // The first strut failed before any geometry was added.
    assert_eq!(
        backend.export_instance(inst.name()),
        Err(lattice_backend::BackendError::EmptyMesh {
            name: inst.name().to_string()
        })
    );
    assert!(backend.exported().is_empty());
}
