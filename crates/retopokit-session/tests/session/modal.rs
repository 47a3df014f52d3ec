use retopokit_core::AlertLevel;
use retopokit_session::host::Cursor;
use retopokit_session::{InputEvent, ModalResponse, Mode};
use retopokit_settings::Config;

use crate::support::{harness, harness_with};

#[test]
fn test_navigation_wins_over_tool_switch() {
    let mut h = harness();
    h.center();
    h.rec.nav.set(true);
    assert_eq!(h.press("stub b tool"), ModalResponse::Pass);
    assert_eq!(h.session.tool_name(), "stub a");
    assert!(h.session.is_navigating());
    assert_eq!(h.rec.cursors.borrow().last(), Some(&Cursor::Hand));

    h.rec.nav.set(false);
    assert_eq!(h.press("stub b tool"), ModalResponse::Stay);
    assert_eq!(h.session.tool_name(), "stub b");
    assert!(!h.session.is_navigating());
}

#[test]
fn test_navigation_timer_keeps_passing() {
    let mut h = harness();
    h.rec.nav.set(true);
    h.center();
    h.rec.nav.set(false);
    assert_eq!(
        h.send(InputEvent::Timer { delta: 0.1 }),
        ModalResponse::Pass
    );
    assert_eq!(h.center(), ModalResponse::Stay);
    assert!(!h.session.is_navigating());
}

#[test]
fn test_navigate_action_is_released_by_session() {
    let mut h = harness();
    assert_eq!(h.press("navigate"), ModalResponse::Pass);
    // the host swallows the release; the session already forgot the action
    assert!(!h.session.actions().using("navigate"));
}

#[test]
fn test_pass_through_actions() {
    let mut h = harness();
    h.center();
    let ticks = h.modal_ticks();
    assert_eq!(h.press("window actions"), ModalResponse::Pass);
    assert_eq!(h.center(), ModalResponse::Pass);
    h.send(InputEvent::release("window actions"));
    assert_eq!(h.press("autosave"), ModalResponse::Pass);
    h.send(InputEvent::release("autosave"));
    // only the two release events reached the tool
    assert_eq!(h.modal_ticks(), ticks + 2);
}

#[test]
fn test_help_toggle_short_circuits() {
    let mut h = harness();
    h.center();
    let ticks = h.modal_ticks();
    assert_eq!(h.press("tool help"), ModalResponse::Stay);
    assert!(h.session.help_visible());
    assert_eq!(h.session.help_text().as_deref(), Some("stub help"));
    assert_eq!(h.modal_ticks(), ticks);

    h.tap("tool help");
    assert!(!h.session.help_visible());
    assert!(h.session.help_text().is_none());
}

#[test]
fn test_finish_actions() {
    let mut h = harness();
    assert_eq!(
        h.press("done"),
        ModalResponse::Confirm { edit_mode: false }
    );

    let mut h = harness();
    assert_eq!(
        h.press("edit mode"),
        ModalResponse::Confirm { edit_mode: true }
    );
}

#[test]
fn test_tool_errors_are_contained() {
    let mut h = harness();
    h.center();

    assert_eq!(h.press("fail"), ModalResponse::Stay);
    {
        let alerts = h.rec.alerts.borrow();
        let alert = alerts.last().unwrap();
        assert_eq!(alert.level, AlertLevel::Exception);
        assert_eq!(alert.message, "- stub failed\n- second line");
    }

    assert_eq!(h.press("assert"), ModalResponse::Stay);
    assert_eq!(
        h.rec.alerts.borrow().last().unwrap().level,
        AlertLevel::AssertionFailure
    );
    assert_eq!(h.session.mode(), Mode::Main);

    // the loop keeps running after recovered errors
    h.tap("insert");
    assert_eq!(h.session.target().vertex_count(), 1);
}

#[test]
fn test_fatal_error_finishes_session() {
    let mut h = harness();
    h.center();
    assert_eq!(
        h.press("fatal"),
        ModalResponse::Confirm { edit_mode: false }
    );
    assert!(h.session.exit_requested());
    assert_eq!(
        h.rec.alerts.borrow().last().unwrap().level,
        AlertLevel::Exception
    );
}

#[test]
fn test_tool_needs_valid_pointer() {
    let mut h = harness();
    h.press("insert");
    assert_eq!(h.modal_ticks(), 0);
    assert_eq!(h.session.target().vertex_count(), 0);
    assert_eq!(h.rec.cursors.borrow().last(), Some(&Cursor::Default));

    h.mouse(900.0, 300.0);
    assert_eq!(h.modal_ticks(), 0);

    h.center();
    assert_eq!(h.modal_ticks(), 1);
    assert_eq!(h.rec.cursors.borrow().last(), Some(&Cursor::Crosshair));
}

#[test]
fn test_select_all_toggles_with_undo() {
    let mut h = harness();
    h.center();
    h.tap("insert");
    h.session.target_mut().deselect_all();

    h.tap("select all");
    assert!(h.session.target().any_selected());
    assert_eq!(h.session.undo_label(), Some("select all"));

    h.tap("select all");
    assert!(!h.session.target().any_selected());
    assert_eq!(h.session.undo_len(), 3);

    h.tap("undo");
    assert!(h.session.target().any_selected());
}

#[test]
fn test_window_hover_clears_and_stays() {
    let mut h = harness();
    h.center();
    let ticks = h.modal_ticks();
    h.rec.hovering.set(true);
    assert_eq!(h.press("insert"), ModalResponse::Stay);
    assert_eq!(h.modal_ticks(), ticks);

    h.session.request_exit();
    assert_eq!(
        h.center(),
        ModalResponse::Confirm { edit_mode: false }
    );
}

#[test]
fn test_backup_timer() {
    let mut config = Config::default();
    config.backup.interval_secs = 1.0;
    config.backup.filename = "backup_test".to_string();
    let mut h = harness_with(config);

    // the first tick only arms the timer
    h.send(InputEvent::Timer { delta: 0.4 });
    h.send(InputEvent::Timer { delta: 0.6 });
    assert!(h.rec.backups.borrow().is_empty());
    h.send(InputEvent::Timer { delta: 0.5 });
    assert_eq!(h.rec.backups.borrow().as_slice(), ["backup_test"]);

    // failures are logged and the timer restarts
    h.rec.fail_backup.set(true);
    h.send(InputEvent::Timer { delta: 0.6 });
    assert_eq!(
        h.send(InputEvent::Timer { delta: 0.6 }),
        ModalResponse::Stay
    );
    assert_eq!(h.rec.backups.borrow().len(), 2);
    assert!(h.rec.alerts.borrow().is_empty());
}

#[test]
fn test_backup_disabled() {
    let mut config = Config::default();
    config.backup.interval_secs = 0.0;
    let mut h = harness_with(config);
    for _ in 0..5 {
        h.send(InputEvent::Timer { delta: 100.0 });
    }
    assert!(h.rec.backups.borrow().is_empty());
}

#[test]
fn test_profiler_keys() {
    let mut h = harness();
    h.center();
    h.center();
    assert!(h.session.profiler().stats("modal").unwrap().count >= 2);
    let ticks = h.modal_ticks();
    h.press("profiler print");
    h.press("profiler clear");
    assert_eq!(h.modal_ticks(), ticks);
    // only the clearing event itself is left
    assert_eq!(h.session.profiler().stats("modal").unwrap().count, 1);
}

#[test]
fn test_pointer_hit_tracks_mouse() {
    let mut h = harness();
    assert!(h.session.pointer_hit().is_none());
    h.center();
    let (point, normal) = h.session.pointer_hit().unwrap();
    assert!((point.x - 2.3).abs() < 1e-3 && (point.y - 2.1).abs() < 1e-3);
    assert!(normal.z > 0.99);
    h.mouse(-10.0, -10.0);
    assert!(h.session.pointer_hit().is_none());
}
