//! The editing session: one target mesh, its history, the active tool and
//! the sources it is retopologized onto.
//!
//! The session is an explicit context object; tools receive it by mutable
//! reference on every lifecycle call. History, the modal loop and spatial
//! queries live in the `history`, `modal` and `queries` submodules.

mod history;
mod modal;
mod queries;

use glam::Vec3;
use retopokit_core::{Alert, AlertLevel, SessionError, ToolError};
use retopokit_mesh::{SourceSurface, TargetMesh};
use retopokit_settings::Config;
use tracing::{error, info, warn};

use crate::actions::{ActionState, Actions};
use crate::history::HistoryStacks;
use crate::host::{HostServices, Viewpoint};
use crate::instrument::Instrument;
use crate::mode::Mode;
use crate::profiler::Profiler;
use crate::sources::SourceSet;
use crate::tool::{SharedTool, ToolRegistry};

pub struct Session {
    config: Config,
    target: TargetMesh,
    sources: SourceSet,
    history: HistoryStacks,
    registry: ToolRegistry,
    tool: SharedTool,
    /// Tool restored while its own tick was running; activated once the
    /// tick returns
    pending_activation: Option<SharedTool>,
    mode: Mode,
    navigating: bool,
    exit: bool,
    help_visible: bool,
    /// Source hit under the pointer, refreshed every event
    pointer_hit: Option<(Vec3, Vec3)>,
    /// Seconds left until the next backup; unset until the first timer tick
    time_to_save: Option<f64>,
    actions: Box<dyn Actions>,
    host: HostServices,
    profiler: Profiler,
    instrument: Option<Instrument>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("target", &self.target.name())
            .field("sources", &self.sources)
            .field("tool", &self.tool_name())
            .field("mode", &self.mode)
            .field("undo", &self.history.undo_len())
            .field("redo", &self.history.redo_len())
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::default()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn target(&self) -> &TargetMesh {
        &self.target
    }

    /// Mutable access for tools. Push an undo step before mutating.
    pub fn target_mut(&mut self) -> &mut TargetMesh {
        &mut self.target
    }

    pub fn sources(&self) -> &SourceSet {
        &self.sources
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn tool(&self) -> &SharedTool {
        &self.tool
    }

    pub fn tool_name(&self) -> String {
        self.tool
            .try_borrow()
            .map(|t| t.name().to_string())
            .unwrap_or_default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_navigating(&self) -> bool {
        self.navigating
    }

    pub fn help_visible(&self) -> bool {
        self.help_visible
    }

    /// Help text of the active tool, when help is toggled on
    pub fn help_text(&self) -> Option<String> {
        if !self.help_visible {
            return None;
        }
        self.tool.try_borrow().ok().map(|t| t.help().to_string())
    }

    /// `(point, normal)` of the source hit under the pointer
    pub fn pointer_hit(&self) -> Option<(Vec3, Vec3)> {
        self.pointer_hit
    }

    pub fn actions(&self) -> &dyn Actions {
        self.actions.as_ref()
    }

    pub fn viewpoint(&self) -> &dyn Viewpoint {
        self.host.viewpoint.as_ref()
    }

    pub fn host(&self) -> &HostServices {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut HostServices {
        &mut self.host
    }

    pub fn profiler(&self) -> &Profiler {
        &self.profiler
    }

    /// Asks the modal loop to finish at the end of the current event
    pub fn request_exit(&mut self) {
        self.exit = true;
    }

    pub fn exit_requested(&self) -> bool {
        self.exit
    }

    pub fn alert(&mut self, level: AlertLevel, message: impl Into<String>) {
        self.host.alerts.report(&Alert::new(level, message));
    }

    /// Surfaces a contained tool error; fatal errors also request exit
    pub(crate) fn report_tool_error(&mut self, err: &ToolError) {
        match err.severity() {
            AlertLevel::AssertionFailure => warn!(error = %err, "tool assertion failed"),
            _ => error!(error = %err, "tool error"),
        }
        let message = Alert::new(err.severity(), err.to_string()).bulleted();
        self.host.alerts.report(&Alert::new(err.severity(), message));
        if err.is_fatal() {
            self.exit = true;
        }
    }
}

/// Assembles a [`Session`]; startup failures are the only fatal errors
#[derive(Default)]
pub struct SessionBuilder {
    target: Option<TargetMesh>,
    sources: SourceSet,
    registry: ToolRegistry,
    starting_tool: Option<String>,
    config: Config,
    host: Option<HostServices>,
    actions: Option<Box<dyn Actions>>,
    instrument: Option<Instrument>,
}

impl SessionBuilder {
    pub fn target(mut self, target: TargetMesh) -> Self {
        self.target = Some(target);
        self
    }

    pub fn source(mut self, source: impl SourceSurface + 'static) -> Self {
        self.sources.push(source);
        self
    }

    pub fn sources(mut self, sources: SourceSet) -> Self {
        self.sources = sources;
        self
    }

    pub fn tools(mut self, registry: ToolRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Name of the tool to activate first; defaults to the first registered
    pub fn starting_tool(mut self, name: impl Into<String>) -> Self {
        self.starting_tool = Some(name.into());
        self
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn host(mut self, host: HostServices) -> Self {
        self.host = Some(host);
        self
    }

    pub fn actions(mut self, actions: impl Actions + 'static) -> Self {
        self.actions = Some(Box::new(actions));
        self
    }

    /// Overrides the instrumentation sink configured in settings
    pub fn instrument(mut self, instrument: Instrument) -> Self {
        self.instrument = Some(instrument);
        self
    }

    pub fn build(self) -> Result<Session, SessionError> {
        let target = self.target.ok_or(SessionError::NoTarget)?;
        if target.name().trim().is_empty() {
            return Err(SessionError::InvalidTarget {
                reason: "target mesh has no name".to_string(),
            });
        }
        if self.registry.is_empty() {
            return Err(SessionError::NoTools);
        }
        let factory = match &self.starting_tool {
            Some(name) => self
                .registry
                .by_name(name)
                .ok_or_else(|| SessionError::UnknownTool { name: name.clone() })?,
            None => self.registry.first().ok_or(SessionError::NoTools)?,
        };

        let instrument = match self.instrument {
            Some(instrument) => Some(instrument),
            None => Instrument::from_settings(&self.config.instrument).unwrap_or_else(|e| {
                warn!(error = %e, "instrumentation disabled");
                None
            }),
        };

        let mut session = Session {
            history: HistoryStacks::new(self.config.history.undo_depth),
            config: self.config,
            target,
            sources: self.sources,
            registry: self.registry,
            tool: factory(),
            pending_activation: None,
            mode: Mode::Main,
            navigating: false,
            exit: false,
            help_visible: false,
            pointer_hit: None,
            time_to_save: None,
            actions: self
                .actions
                .unwrap_or_else(|| Box::new(ActionState::default())),
            host: self.host.unwrap_or_default(),
            profiler: Profiler::new(),
            instrument,
        };

        info!(
            mesh = session.target.name(),
            sources = session.sources.len(),
            tools = session.registry.len(),
            "starting session"
        );

        let tool = session.tool.clone();
        if let Err(e) = session.set_tool(tool, true) {
            session.report_tool_error(&e);
        }

        // flush any stale derived state
        session.undo_push("initial", false);
        session.cancel_top();

        Ok(session)
    }
}
