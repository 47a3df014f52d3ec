use retopokit_core::glam::Vec3;
use retopokit_mesh::{TargetMesh, VertexId};

fn strip(n: usize) -> (TargetMesh, Vec<VertexId>) {
    let mut mesh = TargetMesh::new("strip");
    let verts: Vec<VertexId> = (0..=n)
        .flat_map(|i| {
            let x = i as f32;
            [Vec3::new(x, 0.0, 0.0), Vec3::new(x, 1.0, 0.0)]
        })
        .map(|p| mesh.add_vertex(p, Vec3::Z))
        .collect();
    for i in 0..n {
        let (a, b, c, d) = (verts[2 * i], verts[2 * i + 2], verts[2 * i + 3], verts[2 * i + 1]);
        mesh.add_face(&[a, b, c, d]).unwrap();
    }
    (mesh, verts)
}

#[test]
fn test_strip_shares_edges() {
    let (mesh, verts) = strip(3);
    assert_eq!(mesh.vertex_count(), 8);
    assert_eq!(mesh.face_count(), 3);
    // 4 rungs + 2 * 3 rails
    assert_eq!(mesh.edge_count(), 10);

    let rung = mesh.find_edge(verts[2], verts[3]).unwrap();
    assert_eq!(mesh.edge_faces(rung).len(), 2);
    assert_eq!(mesh.vertex_neighbors(verts[2]).len(), 3);
}

#[test]
fn test_snapshot_survives_heavy_edit() {
    let (mut mesh, verts) = strip(4);
    let snapshot = mesh.clone();

    mesh.remove_vertex(verts[4]).unwrap();
    mesh.set_vertex_position(verts[0], Vec3::splat(-1.0)).unwrap();
    mesh.select_all();

    assert_eq!(snapshot.face_count(), 4);
    assert!(!snapshot.any_selected());
    assert_eq!(snapshot.vertex(verts[0]).unwrap().position, Vec3::ZERO);
    assert_ne!(snapshot, mesh);
}

#[test]
fn test_handles_stay_valid_after_removal() {
    let (mut mesh, verts) = strip(2);
    mesh.remove_vertex(verts[0]).unwrap();
    assert!(mesh.vertex(verts[0]).is_none());
    assert_eq!(mesh.vertex(verts[5]).unwrap().position, Vec3::new(2.0, 1.0, 0.0));
    assert!(mesh.remove_vertex(verts[0]).is_err());
}

#[test]
fn test_json_roundtrip_preserves_topology() {
    let (mesh, _) = strip(2);
    let json = mesh.to_json().unwrap();
    let back: TargetMesh = serde_json::from_value(json).unwrap();
    assert_eq!(back, mesh);
}
