use retopokit_core::glam::Vec3;
use retopokit_core::{Plane, Ray};
use retopokit_mesh::primitives;
use retopokit_mesh::{SourceMesh, SourceSurface};

#[test]
fn test_cube_raycast_front_face() {
    let cube = SourceMesh::new("cube", primitives::cube(2.0)).unwrap();
    let ray = Ray::new(Vec3::new(0.2, 0.3, 10.0), Vec3::NEG_Z);
    let hit = cube.raycast(&ray).unwrap();
    assert!((hit.point.z - 1.0).abs() < 1e-5);
    assert!((hit.normal - Vec3::Z).length() < 1e-5);
    assert!((hit.distance - 9.0).abs() < 1e-5);

    let all = cube.raycast_all(&ray);
    assert_eq!(all.len(), 2);
    assert!((all[1].point.z + 1.0).abs() < 1e-5);
}

#[test]
fn test_cube_all_crawl_forms_square() {
    let cube = SourceMesh::new("cube", primitives::cube(2.0)).unwrap();
    let plane = Plane::new(Vec3::new(0.0, 0.0, 0.25), Vec3::Z);
    let segments = cube.plane_intersections_crawl(&plane);
    // two triangles per side face
    assert_eq!(segments.len(), 8);
    let perimeter: f32 = segments.iter().map(|s| s.length()).sum();
    assert!((perimeter - 8.0).abs() < 1e-4);
}

#[test]
fn test_cube_walk_crawl_closes() {
    let cube = SourceMesh::new("cube", primitives::cube(2.0)).unwrap();
    let ray = Ray::new(Vec3::new(0.1, -10.0, 0.25), Vec3::Y);
    let plane = Plane::new(Vec3::new(0.0, 0.0, 0.25), Vec3::Z);
    let walked = cube.plane_intersection_walk_crawl(&ray, &plane);
    assert_eq!(walked.len(), 8);
    assert!(walked[0].from.distance(walked[7].to) < 1e-5);
    for s in &walked {
        assert!((s.from.z - 0.25).abs() < 1e-5);
    }
}

#[test]
fn test_translated_source() {
    let data = primitives::uv_sphere(1.0, 12, 6).transformed(2.0, Vec3::new(10.0, 0.0, 0.0));
    let sphere = SourceMesh::new("sphere", data).unwrap();
    let hit = sphere.nearest(Vec3::new(15.0, 0.0, 0.0), 10.0).unwrap();
    assert!(hit.point.x > 11.5);
    assert!((hit.distance - 3.0).abs() < 0.2);
}
