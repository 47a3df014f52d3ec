use retopokit_core::glam::Vec3;
use retopokit_core::SessionError;
use retopokit_mesh::TargetMesh;
use retopokit_session::{Session, ToolRegistry};
use retopokit_settings::Config;

use crate::support::{self, harness, harness_with, Log, Recorder};

#[test]
fn test_build_flushes_initial_snapshot() {
    let h = harness();
    assert_eq!(h.session.undo_len(), 0);
    assert_eq!(h.session.redo_len(), 0);
    assert_eq!(h.session.tool_name(), "stub a");
    // restoring the initial snapshot replaced the render buffers once
    assert_eq!(h.rec.renders.get(), 1);
    let starts = h.log.borrow().iter().filter(|l| *l == "stub a start").count();
    assert_eq!(starts, 2);
    assert!(h.session.target().is_dirty());
}

#[test]
fn test_startup_failures() {
    let log = Log::default();
    let rec = Recorder::default();

    let err = Session::builder()
        .tools(support::stub_registry(&log))
        .build()
        .unwrap_err();
    assert_eq!(err, SessionError::NoTarget);

    let err = Session::builder()
        .target(TargetMesh::new("retopo"))
        .tools(ToolRegistry::new())
        .build()
        .unwrap_err();
    assert_eq!(err, SessionError::NoTools);

    let err = support::builder(&log, &rec)
        .starting_tool("knife")
        .build()
        .unwrap_err();
    assert!(matches!(err, SessionError::UnknownTool { name } if name == "knife"));

    let err = support::builder(&log, &rec)
        .target(TargetMesh::new("  "))
        .build()
        .unwrap_err();
    assert!(matches!(err, SessionError::InvalidTarget { .. }));
}

#[test]
fn test_starting_tool_by_name() {
    let log = Log::default();
    let rec = Recorder::default();
    let session = support::builder(&log, &rec)
        .starting_tool("stub b")
        .build()
        .unwrap();
    assert_eq!(session.tool_name(), "stub b");
}

#[test]
fn test_empty_stacks_are_inert() {
    let mut h = harness();
    assert!(!h.session.pop_undo());
    assert!(!h.session.pop_redo());
    assert!(!h.session.cancel_top());
    assert_eq!(h.rec.renders.get(), 1);
}

#[test]
fn test_undo_redo_through_modal() {
    let mut h = harness();
    h.center();
    h.tap("insert");
    assert_eq!(h.session.target().vertex_count(), 1);
    assert_eq!(h.session.undo_label(), Some("stub insert"));

    h.tap("undo");
    assert_eq!(h.session.target().vertex_count(), 0);
    assert_eq!(h.session.redo_label(), Some("undo"));
    assert!(!h.session.can_undo());

    h.tap("redo");
    assert_eq!(h.session.target().vertex_count(), 1);
    assert_eq!(h.session.undo_label(), Some("redo"));
    assert!(!h.session.can_redo());
}

#[test]
fn test_push_invalidates_redo() {
    let mut h = harness();
    h.center();
    h.tap("insert");
    h.tap("undo");
    assert!(h.session.can_redo());
    h.tap("insert");
    assert!(!h.session.can_redo());
    assert!(!h.session.pop_redo());
}

#[test]
fn test_redo_keeps_remaining_redo_steps() {
    let mut h = harness();
    h.center();
    h.tap("insert");
    h.tap("insert");
    h.tap("undo");
    h.tap("undo");
    assert_eq!(h.session.redo_len(), 2);
    h.tap("redo");
    assert_eq!(h.session.redo_len(), 1);
    assert_eq!(h.session.target().vertex_count(), 1);
}

#[test]
fn test_repeatable_push_collapses() {
    let mut h = harness();
    h.session.undo_push("drag", true);
    h.session.target_mut().add_vertex(Vec3::X, Vec3::Z);
    h.session.undo_push("drag", true);
    h.session.target_mut().add_vertex(Vec3::Y, Vec3::Z);
    assert_eq!(h.session.undo_len(), 1);

    h.session.undo_push("drag", false);
    assert_eq!(h.session.undo_len(), 2);

    h.session.undo_push("other", true);
    assert_eq!(h.session.undo_len(), 3);
}

#[test]
fn test_depth_evicts_oldest() {
    let mut config = Config::default();
    config.history.undo_depth = 3;
    let mut h = harness_with(config);
    let mut before = Vec::new();
    for i in 0..5 {
        before.push(h.session.target().clone());
        h.session.undo_push(&format!("step {i}"), false);
        h.session
            .target_mut()
            .add_vertex(Vec3::new(i as f32, 0.0, 0.0), Vec3::Z);
        assert!(h.session.undo_len() <= 3);
    }
    assert_eq!(h.session.undo_label(), Some("step 4"));

    for i in (2..5).rev() {
        assert!(h.session.pop_undo());
        assert_eq!(h.session.target(), &before[i]);
    }
    assert!(!h.session.pop_undo());
    assert_eq!(h.session.target().vertex_count(), 2);
}

#[test]
fn test_snapshots_are_independent_copies() {
    let mut h = harness();
    let v = h.session.target_mut().add_vertex(Vec3::ZERO, Vec3::Z);
    let captured = h.session.target().clone();
    h.session.undo_push("move", false);
    h.session
        .target_mut()
        .set_vertex_position(v, Vec3::new(5.0, 0.0, 0.0))
        .unwrap();
    assert!(h.session.pop_undo());
    assert_eq!(h.session.target(), &captured);
    assert!(h.session.pop_redo());
    assert_eq!(
        h.session.target().vertex(v).unwrap().position,
        Vec3::new(5.0, 0.0, 0.0)
    );
}

#[test]
fn test_restore_reactivates_snapshot_tool() {
    let mut h = harness();
    h.center();
    h.tap("insert");
    h.tap("stub b tool");
    assert_eq!(h.session.tool_name(), "stub b");

    h.log.borrow_mut().clear();
    h.press("undo");
    assert_eq!(h.session.tool_name(), "stub a");
    assert_eq!(
        h.log.borrow().as_slice(),
        ["stub a start", "stub a options", "stub a update"]
    );
    let renders = h.rec.renders.get();

    // the redo step captured stub b as the active tool
    h.log.borrow_mut().clear();
    h.press("redo");
    assert_eq!(h.session.tool_name(), "stub b");
    assert_eq!(
        h.log.borrow().as_slice(),
        ["stub b start", "stub b options", "stub b update"]
    );
    assert_eq!(h.rec.renders.get(), renders + 1);
}

#[test]
fn test_tool_switch_always_builds_fresh_instance() {
    let mut h = harness();
    let before = h.session.tool().clone();
    h.tap("stub a tool");
    assert_eq!(h.session.tool_name(), "stub a");
    assert!(!std::rc::Rc::ptr_eq(&before, h.session.tool()));
}

#[test]
fn test_cancel_from_tool_tick_reruns_lifecycle() {
    let mut h = harness();
    h.center();
    h.log.borrow_mut().clear();

    h.press("retract");
    assert_eq!(h.session.target().vertex_count(), 0);
    assert_eq!(h.session.undo_len(), 0);
    assert!(h.rec.alerts.borrow().is_empty());
    assert_eq!(
        h.log.borrow().as_slice(),
        [
            "stub a modal",
            "stub a start",
            "stub a options",
            "stub a update"
        ]
    );
    assert_eq!(h.session.tool_name(), "stub a");
}

#[test]
fn test_undo_from_tool_tick() {
    let mut h = harness();
    h.center();
    h.tap("insert");
    assert_eq!(h.session.target().vertex_count(), 1);
    h.log.borrow_mut().clear();

    h.press("step back");
    assert_eq!(h.session.target().vertex_count(), 0);
    assert_eq!(h.session.redo_len(), 1);
    assert!(h.rec.alerts.borrow().is_empty());
    let starts = h.log.borrow().iter().filter(|l| *l == "stub a start").count();
    assert_eq!(starts, 1);

    // the next tick reaches the restored tool normally
    h.send(retopokit_session::InputEvent::release("step back"));
    assert_eq!(h.log.borrow().last().map(String::as_str), Some("stub a modal"));
}
