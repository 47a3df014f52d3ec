use retopokit_core::glam::Vec3;
use retopokit_core::{Plane, Ray};
use retopokit_mesh::{primitives, SourceMesh};
use retopokit_session::Session;

use crate::support::{self, harness, Log, Recorder};

fn sphere_session() -> Session {
    let log = Log::default();
    let rec = Recorder::default();
    support::builder(&log, &rec)
        .sources(Default::default())
        .source(SourceMesh::new("sphere", primitives::uv_sphere(1.0, 32, 16)).unwrap())
        .build()
        .unwrap()
}

#[test]
fn test_walk_crawl_closes_around_sphere() {
    let session = sphere_session();
    let ray = Ray::new(Vec3::new(0.05, -5.0, 0.1), Vec3::Y);
    let plane = Plane::new(Vec3::new(0.0, 0.0, 0.1), Vec3::Z);

    let walked: Vec<_> = session.single_crawl(&ray, &plane, true).collect();
    assert!(walked.len() > 3);
    assert!(walked.iter().all(|s| s.source == 0));
    for pair in walked.windows(2) {
        assert!(pair[0].to.distance(pair[1].from) < 1e-4);
    }
    let (first, last) = (walked[0], walked[walked.len() - 1]);
    assert!(last.to.distance(first.from) < 1e-4);

    let all: Vec<_> = session.all_crawl(&plane).collect();
    assert_eq!(all.len(), walked.len());
}

#[test]
fn test_crawls_can_be_requested_again() {
    let session = sphere_session();
    let plane = Plane::new(Vec3::new(0.0, 0.0, 0.1), Vec3::Z);
    let first = session.all_crawl(&plane).count();
    let second = session.all_crawl(&plane).count();
    assert!(first > 0);
    assert_eq!(first, second);
}

#[test]
fn test_misses_give_empty_crawls() {
    let h = harness();
    let plane = Plane::new(Vec3::new(1.5, 0.0, 0.0), Vec3::X);
    let miss = Ray::new(Vec3::new(50.0, 50.0, 5.0), Vec3::NEG_Z);
    assert_eq!(h.session.single_crawl(&miss, &plane, true).count(), 0);
    assert_eq!(h.session.single_crawl(&miss, &plane, false).count(), 0);

    let away = Plane::new(Vec3::new(0.0, 0.0, 3.0), Vec3::Z);
    assert_eq!(h.session.all_crawl(&away).count(), 0);
}

#[test]
fn test_crawls_stay_on_their_source() {
    let log = Log::default();
    let rec = Recorder::default();
    // a second grid touching the first along x = 4
    let beside = SourceMesh::new(
        "beside",
        primitives::grid(4, 4, 1.0).transformed(1.0, Vec3::new(4.0, 0.0, 0.0)),
    )
    .unwrap();
    let session = support::builder(&log, &rec).source(beside).build().unwrap();

    let plane = Plane::new(Vec3::new(0.0, 2.5, 0.0), Vec3::Y);
    let ray = Ray::new(Vec3::new(1.3, 2.5, 5.0), Vec3::NEG_Z);
    let walked: Vec<_> = session.single_crawl(&ray, &plane, true).collect();
    assert!(!walked.is_empty());
    assert!(walked.iter().all(|s| s.source == 0));

    let all: Vec<_> = session.all_crawl(&plane).collect();
    assert!(all.iter().any(|s| s.source == 1));
    assert_eq!(all.len(), walked.len() * 2);
}
