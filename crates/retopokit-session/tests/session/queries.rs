use retopokit_core::glam::Vec3;
use retopokit_core::Ray;
use retopokit_mesh::{primitives, SourceMesh};
use retopokit_session::Session;

use crate::support::{self, harness, Log, Recorder, CENTER};

#[test]
fn test_screen_raycasts() {
    let mut h = harness();
    assert!(h.session.raycast_from_screen(None).is_none());
    assert_eq!(h.session.raycast_all_from_screen(None).count(), 0);

    h.center();
    let hit = h.session.raycast_pointer().unwrap();
    assert!(hit.point.z.abs() < 1e-4);
    assert!((hit.distance - 10.0).abs() < 1e-3);
    let xy = Some(CENTER.into());
    assert_eq!(h.session.raycast_all_from_screen(xy).count(), 1);

    let through = h.session.raycast_point(Vec3::new(1.2, 3.4, 0.0)).unwrap();
    assert!(through.point.distance(Vec3::new(1.2, 3.4, 0.0)) < 1e-3);
}

#[test]
fn test_visibility() {
    let h = harness();
    let on_grid = Vec3::new(2.3, 2.1, 0.0);
    assert!(h.session.is_visible(on_grid, Some(Vec3::Z)));
    assert!(h.session.is_visible(on_grid, None));
    // normal facing away from the eye
    assert!(!h.session.is_visible(on_grid, Some(Vec3::NEG_Z)));
    // below the grid, hidden by it
    assert!(!h.session.is_visible(Vec3::new(2.3, 2.1, -1.0), None));
    // projects outside the viewport
    assert!(!h.session.is_visible(Vec3::new(100.0, 2.1, 0.0), None));
    // behind the eye
    assert!(!h.session.is_visible(Vec3::new(2.3, 2.1, 20.0), None));
}

#[test]
fn test_nearest_point_respects_limit() {
    let h = harness();
    let above = Vec3::new(1.5, 1.5, 1.0);
    assert!(h.session.nearest_point(above, 0.5).is_none());
    let hit = h.session.nearest_point(above, 2.0).unwrap();
    assert!((hit.distance - 1.0).abs() < 1e-4);
    assert!(hit.distance <= 2.0);
}

#[test]
fn test_stacked_sources_pick_nearest() {
    let log = Log::default();
    let rec = Recorder::default();
    let offset = |z: f32| {
        SourceMesh::new(
            format!("grid {z}"),
            primitives::grid(4, 4, 1.0).transformed(1.0, Vec3::new(0.0, 0.0, z)),
        )
        .unwrap()
    };
    let session: Session = support::builder(&log, &rec)
        .source(offset(-1.0))
        .source(offset(1.0))
        .build()
        .unwrap();
    assert_eq!(session.sources().len(), 3);

    let ray = Ray::new(Vec3::new(2.3, 2.1, 5.0), Vec3::NEG_Z);
    let hit = session.raycast(&ray).unwrap();
    assert!((hit.point.z - 1.0).abs() < 1e-4);
    assert_eq!(session.raycast_all(ray).count(), 3);

    let up = Ray::new(Vec3::new(2.3, 2.1, -5.0), Vec3::Z);
    assert!((session.raycast(&up).unwrap().point.z + 1.0).abs() < 1e-4);

    let miss = Ray::new(Vec3::new(20.0, 2.1, 5.0), Vec3::NEG_Z);
    assert!(session.raycast(&miss).is_none());
    assert_eq!(session.raycast_all(miss).count(), 0);
}
