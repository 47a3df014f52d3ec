//! Recorded input scripts replayed by the `retopokit` binary.

use std::path::Path;

use anyhow::Context;
use glam::Vec3;
use retopokit_mesh::{primitives, SourceMesh, TargetMesh, TriangleData};
use retopokit_session::{
    builtin_registry, ActionState, HostServices, InputEvent, ModalResponse, PerspectiveView,
    Session,
};
use retopokit_settings::Config;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Procedural source shapes a script can ask for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    Grid { nx: u32, ny: u32, cell: f32 },
    Cube { size: f32 },
    Sphere { radius: f32, segments: u32, rings: u32 },
}

impl Primitive {
    fn triangles(&self) -> TriangleData {
        match *self {
            Primitive::Grid { nx, ny, cell } => primitives::grid(nx, ny, cell),
            Primitive::Cube { size } => primitives::cube(size),
            Primitive::Sphere {
                radius,
                segments,
                rings,
            } => primitives::uv_sphere(radius, segments, rings),
        }
    }
}

fn default_scale() -> f32 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSpec {
    pub name: String,
    #[serde(flatten)]
    pub shape: Primitive,
    #[serde(default = "default_scale")]
    pub scale: f32,
    #[serde(default)]
    pub offset: Vec3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewSpec {
    pub eye: Vec3,
    pub target: Vec3,
    pub width: f32,
    pub height: f32,
}

impl Default for ViewSpec {
    fn default() -> Self {
        let view = PerspectiveView::default();
        Self {
            eye: view.eye,
            target: view.target,
            width: view.viewport.x,
            height: view.viewport.y,
        }
    }
}

/// A headless editing session: sources, camera and the events to feed it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayScript {
    #[serde(default = "default_target")]
    pub target: String,
    pub sources: Vec<SourceSpec>,
    #[serde(default)]
    pub view: ViewSpec,
    #[serde(default)]
    pub starting_tool: Option<String>,
    pub events: Vec<InputEvent>,
}

fn default_target() -> String {
    "Retopo".to_string()
}

/// What a replay produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplaySummary {
    pub events: usize,
    pub finished: Option<ModalResponse>,
    pub tool: String,
    pub vertices: usize,
    pub edges: usize,
    pub faces: usize,
    pub undo: usize,
    pub redo: usize,
}

impl ReplayScript {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing script {}", path.display()))
    }

    pub fn build_session(&self, config: Config) -> anyhow::Result<Session> {
        let view = PerspectiveView::new(
            self.view.eye,
            self.view.target,
            self.view.width,
            self.view.height,
        );
        let mut builder = Session::builder()
            .target(TargetMesh::new(self.target.clone()))
            .tools(builtin_registry())
            .config(config)
            .host(HostServices::headless(view))
            .actions(ActionState::new(self.view.width, self.view.height));
        for spec in &self.sources {
            let data = spec.shape.triangles().transformed(spec.scale, spec.offset);
            let mesh = SourceMesh::new(spec.name.clone(), data)
                .with_context(|| format!("building source {}", spec.name))?;
            builder = builder.source(mesh);
        }
        if let Some(tool) = &self.starting_tool {
            builder = builder.starting_tool(tool.clone());
        }
        Ok(builder.build()?)
    }

    /// Feeds every event to `session`, stopping early when it finishes
    pub fn replay(&self, session: &mut Session) -> ReplaySummary {
        let mut finished = None;
        let mut events = 0;
        for event in &self.events {
            events += 1;
            let response = session.modal(event);
            debug!(?event, ?response, "replayed");
            if response.is_finished() {
                finished = Some(response);
                break;
            }
        }
        let target = session.target();
        let summary = ReplaySummary {
            events,
            finished,
            tool: session.tool_name(),
            vertices: target.vertex_count(),
            edges: target.edge_count(),
            faces: target.face_count(),
            undo: session.undo_len(),
            redo: session.redo_len(),
        };
        info!(?summary, "replay complete");
        summary
    }
}
