//! Recording collaborators and a stub tool shared by the session tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use retopokit_core::glam::{Vec2, Vec3};
use retopokit_core::{Alert, Point2D, ToolError, ToolResult};
use retopokit_mesh::{primitives, SourceMesh, TargetMesh};
use retopokit_session::host::{
    AlertSurface, BackupHook, Cursor, CursorSink, RenderCache, WindowManager,
};
use retopokit_session::{
    ActionState, Actions, HostServices, InputEvent, ModalResponse, PerspectiveView, Session,
    SessionBuilder, Tool, ToolRegistry,
};
use retopokit_settings::{Config, RenderOptions};

pub type Log = Rc<RefCell<Vec<String>>>;

pub const CENTER: (f32, f32) = (400.0, 300.0);

/// Looks straight down at the grid; the screen center lands at (2.3, 2.1, 0)
pub fn top_view() -> PerspectiveView {
    PerspectiveView::new(
        Vec3::new(2.3, 2.1, 10.0),
        Vec3::new(2.3, 2.1, 0.0),
        800.0,
        600.0,
    )
}

pub fn grid_source() -> SourceMesh {
    SourceMesh::new("grid", primitives::grid(4, 4, 1.0)).unwrap()
}

/// Action state whose navigation flag the test can force on
pub struct Scripted {
    inner: ActionState,
    nav: Rc<Cell<bool>>,
}

impl Actions for Scripted {
    fn process(&mut self, event: &InputEvent) {
        self.inner.process(event)
    }

    fn pressed(&self, name: &str) -> bool {
        self.inner.pressed(name)
    }

    fn using(&self, name: &str) -> bool {
        self.inner.using(name)
    }

    fn navigating(&self) -> bool {
        self.nav.get() || self.inner.navigating()
    }

    fn is_timer(&self) -> bool {
        self.inner.is_timer()
    }

    fn unuse(&mut self, name: &str) {
        self.inner.unuse(name)
    }

    fn mouse(&self) -> Option<Point2D> {
        self.inner.mouse()
    }

    fn size(&self) -> Vec2 {
        self.inner.size()
    }

    fn time_delta(&self) -> f32 {
        self.inner.time_delta()
    }
}

/// Lifecycle-logging tool; reacts to `insert`, `retract`, `step back`,
/// `fail`, `assert` and `fatal`
pub struct Stub {
    name: &'static str,
    log: Log,
}

impl Tool for Stub {
    fn name(&self) -> &str {
        self.name
    }

    fn help(&self) -> &str {
        "stub help"
    }

    fn start(&mut self, _session: &mut Session) -> ToolResult {
        self.log.borrow_mut().push(format!("{} start", self.name));
        Ok(())
    }

    fn update_tool_options(&mut self, _session: &mut Session) -> ToolResult {
        self.log.borrow_mut().push(format!("{} options", self.name));
        Ok(())
    }

    fn update(&mut self, _session: &mut Session) -> ToolResult {
        self.log.borrow_mut().push(format!("{} update", self.name));
        Ok(())
    }

    fn modal(&mut self, session: &mut Session) -> ToolResult {
        self.log.borrow_mut().push(format!("{} modal", self.name));
        let actions = session.actions();
        let (insert, retract, step_back) = (
            actions.pressed("insert"),
            actions.pressed("retract"),
            actions.pressed("step back"),
        );
        let (fail, assert, fatal) = (
            actions.pressed("fail"),
            actions.pressed("assert"),
            actions.pressed("fatal"),
        );
        if insert {
            let point = session.pointer_hit().map_or(Vec3::ZERO, |(p, _)| p);
            session.undo_push("stub insert", false);
            session.target_mut().add_vertex(point, Vec3::Z);
        }
        if retract {
            // tentative edit rolled back within the same tick
            session.undo_push("stub retract", false);
            session.target_mut().add_vertex(Vec3::ZERO, Vec3::Z);
            session.cancel_top();
        }
        if step_back {
            session.pop_undo();
        }
        if fail {
            return Err(ToolError::recoverable("stub failed\nsecond line"));
        }
        if assert {
            return Err(ToolError::assertion("stub invariant"));
        }
        if fatal {
            return Err(ToolError::fatal("stub gave up"));
        }
        Ok(())
    }
}

pub fn stub_registry(log: &Log) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    let (a, b) = (log.clone(), log.clone());
    registry
        .register("stub a tool", "stub a", move || Stub {
            name: "stub a",
            log: a.clone(),
        })
        .register("stub b tool", "stub b", move || Stub {
            name: "stub b",
            log: b.clone(),
        });
    registry
}

/// Everything the recording collaborators saw
#[derive(Clone, Default)]
pub struct Recorder {
    pub alerts: Rc<RefCell<Vec<Alert>>>,
    pub backups: Log,
    pub fail_backup: Rc<Cell<bool>>,
    pub renders: Rc<Cell<usize>>,
    pub cursors: Rc<RefCell<Vec<Cursor>>>,
    pub hovering: Rc<Cell<bool>>,
    pub nav: Rc<Cell<bool>>,
}

struct RecordAlerts(Rc<RefCell<Vec<Alert>>>);

impl AlertSurface for RecordAlerts {
    fn report(&mut self, alert: &Alert) {
        self.0.borrow_mut().push(alert.clone());
    }
}

struct RecordBackup {
    log: Log,
    fail: Rc<Cell<bool>>,
}

impl BackupHook for RecordBackup {
    fn save_backup(&mut self, filename: &str) -> anyhow::Result<()> {
        self.log.borrow_mut().push(filename.to_string());
        if self.fail.get() {
            anyhow::bail!("disk full");
        }
        Ok(())
    }
}

struct CountRenders(Rc<Cell<usize>>);

impl RenderCache for CountRenders {
    fn replace_target(&mut self, _target: &TargetMesh, _options: &RenderOptions) {
        self.0.set(self.0.get() + 1);
    }
}

struct RecordCursor(Rc<RefCell<Vec<Cursor>>>);

impl CursorSink for RecordCursor {
    fn set_cursor(&mut self, cursor: Cursor) {
        self.0.borrow_mut().push(cursor);
    }
}

struct Hover(Rc<Cell<bool>>);

impl WindowManager for Hover {
    fn hovering(&mut self, _actions: &dyn Actions) -> bool {
        self.0.get()
    }
}

impl Recorder {
    pub fn host(&self, view: PerspectiveView) -> HostServices {
        let mut host = HostServices::headless(view);
        host.alerts = Box::new(RecordAlerts(self.alerts.clone()));
        host.backup = Box::new(RecordBackup {
            log: self.backups.clone(),
            fail: self.fail_backup.clone(),
        });
        host.render = Box::new(CountRenders(self.renders.clone()));
        host.cursor = Box::new(RecordCursor(self.cursors.clone()));
        host.windows = Box::new(Hover(self.hovering.clone()));
        host
    }

    pub fn actions(&self) -> Scripted {
        Scripted {
            inner: ActionState::new(800.0, 600.0),
            nav: self.nav.clone(),
        }
    }
}

pub struct Harness {
    pub session: Session,
    pub log: Log,
    pub rec: Recorder,
}

impl Harness {
    pub fn send(&mut self, event: InputEvent) -> ModalResponse {
        self.session.modal(&event)
    }

    pub fn press(&mut self, action: &str) -> ModalResponse {
        self.send(InputEvent::press(action))
    }

    /// Press followed by release, returning the press response
    pub fn tap(&mut self, action: &str) -> ModalResponse {
        let response = self.press(action);
        self.send(InputEvent::release(action));
        response
    }

    pub fn mouse(&mut self, x: f32, y: f32) -> ModalResponse {
        self.send(InputEvent::mouse(x, y))
    }

    pub fn center(&mut self) -> ModalResponse {
        self.mouse(CENTER.0, CENTER.1)
    }

    pub fn modal_ticks(&self) -> usize {
        self.log
            .borrow()
            .iter()
            .filter(|l| l.ends_with(" modal"))
            .count()
    }
}

/// Session over one grid source, driven by the stub tools
pub fn builder(log: &Log, rec: &Recorder) -> SessionBuilder {
    Session::builder()
        .target(TargetMesh::new("retopo"))
        .source(grid_source())
        .tools(stub_registry(log))
        .host(rec.host(top_view()))
        .actions(rec.actions())
}

pub fn harness_with(config: Config) -> Harness {
    let log = Log::default();
    let rec = Recorder::default();
    let session = builder(&log, &rec).config(config).build().unwrap();
    Harness { session, log, rec }
}

pub fn harness() -> Harness {
    harness_with(Config::default())
}
