//! Mount/unmount lifecycle for one engine on a [`Host`].

use std::cell::Cell;
use std::rc::Rc;

use crate::engine::Engine;
use crate::foundation::error::{FxError, FxResult};
use crate::host::{ClientId, Host, HostClient, HostEvent, Registration};
use crate::render::Surface;

/// Lifecycle of a [`Controller`]. Transitions only move forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerState {
    /// Constructed, not yet mounted.
    Uninitialized,
    /// Mounted: subscribed to input and drawing on every frame.
    Running,
    /// Stopped; every registration has been released.
    TornDown,
}

/// Counters accumulated while running.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControllerStats {
    /// Frames ticked and drawn.
    pub frames_drawn: u64,
    /// Input events forwarded to the engine.
    pub events_handled: u64,
    /// Frames whose render failed.
    pub render_errors: u64,
}

/// Requests teardown of a running controller from outside its owner.
///
/// Honored at the next callback the controller receives: a pending frame is skipped, and a frame
/// already executing finishes without requesting another.
#[derive(Clone, Debug, Default)]
pub struct StopHandle {
    requested: Rc<Cell<bool>>,
}

impl StopHandle {
    /// Ask the controller to tear down.
    pub fn request_stop(&self) {
        self.requested.set(true);
    }

    /// Whether a stop has been requested.
    pub fn is_requested(&self) -> bool {
        self.requested.get()
    }
}

/// Owns one engine, its drawing surface and every host registration made on its behalf.
pub struct Controller<E: Engine> {
    engine: E,
    surface: Surface,
    state: ControllerState,
    id: Option<ClientId>,
    subscriptions: Vec<Registration>,
    frame: Option<Registration>,
    last_frame_ms: Option<f64>,
    stop: StopHandle,
    stats: ControllerStats,
}

impl<E: Engine> std::fmt::Debug for Controller<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("engine", &self.engine.name())
            .field("state", &self.state)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl<E: Engine> Controller<E> {
    /// Wrap an engine; nothing is registered until [`Controller::start`].
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            surface: Surface::new(crate::foundation::core::Viewport::new(0.0, 0.0)),
            state: ControllerState::Uninitialized,
            id: None,
            subscriptions: Vec::new(),
            frame: None,
            last_frame_ms: None,
            stop: StopHandle::default(),
            stats: ControllerStats::default(),
        }
    }

    /// Mount on `host`: size the surface, build geometry, subscribe to input and request the
    /// first frame.
    pub fn start(&mut self, host: &mut Host) -> FxResult<()> {
        match self.state {
            ControllerState::Uninitialized => {}
            ControllerState::Running => {
                return Err(FxError::lifecycle(format!(
                    "{} controller is already running",
                    self.engine.name()
                )));
            }
            ControllerState::TornDown => {
                return Err(FxError::lifecycle(format!(
                    "{} controller cannot restart after teardown",
                    self.engine.name()
                )));
            }
        }

        let id = host.register_client();
        let viewport = host.viewport();
        self.surface.resize(viewport);
        self.engine.resize(viewport);
        self.subscriptions = self
            .engine
            .subscriptions()
            .iter()
            .map(|&kind| host.subscribe(id, kind))
            .collect();
        self.frame = Some(host.request_frame(id));
        self.id = Some(id);
        self.state = ControllerState::Running;

        tracing::debug!(
            engine = self.engine.name(),
            width = viewport.width,
            height = viewport.height,
            dpr = viewport.effective_dpr(),
            "controller mounted"
        );
        Ok(())
    }

    /// Release the frame request and every subscription. Idempotent; a controller that was never
    /// started can no longer be started afterwards.
    pub fn stop(&mut self) {
        if self.state == ControllerState::TornDown {
            return;
        }
        let was_running = self.state == ControllerState::Running;
        if let Some(frame) = self.frame.take() {
            frame.release();
        }
        for sub in self.subscriptions.drain(..) {
            sub.release();
        }
        self.state = ControllerState::TornDown;
        if was_running {
            tracing::debug!(
                engine = self.engine.name(),
                frames = self.stats.frames_drawn,
                "controller torn down"
            );
        }
    }

    /// Handle that requests teardown from another client or callback.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// The wrapped engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Mutable access to the wrapped engine.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// The surface holding the most recently drawn frame.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Alpha the layer should be composited with.
    pub fn layer_opacity(&self) -> f64 {
        self.engine.layer_opacity()
    }

    /// Counters so far.
    pub fn stats(&self) -> ControllerStats {
        self.stats
    }

    fn honor_stop_request(&mut self) -> bool {
        if self.stop.is_requested() {
            self.stop();
        }
        self.state != ControllerState::Running
    }
}

impl<E: Engine> HostClient for Controller<E> {
    fn client_id(&self) -> Option<ClientId> {
        self.id
    }

    fn on_event(&mut self, _host: &mut Host, event: &HostEvent) {
        if self.honor_stop_request() {
            return;
        }
        match *event {
            HostEvent::PointerMove(pos) => self.engine.pointer_move(pos),
            HostEvent::PointerLeave => self.engine.pointer_leave(),
            HostEvent::Resize(viewport) => {
                self.surface.resize(viewport);
                self.engine.resize(viewport);
            }
        }
        self.stats.events_handled += 1;
    }

    fn on_frame(&mut self, host: &mut Host, now_ms: f64) {
        self.frame = None;
        if self.honor_stop_request() {
            return;
        }
        let dt = match self.last_frame_ms {
            Some(last) => now_ms - last,
            None => host.fps().frame_duration_ms(),
        };
        self.last_frame_ms = Some(now_ms);

        self.engine.tick(dt);
        if let Err(err) = self.engine.render(&mut self.surface) {
            self.stats.render_errors += 1;
            tracing::warn!(engine = self.engine.name(), error = %err, "frame render failed");
        }
        self.stats.frames_drawn += 1;

        if self.honor_stop_request() {
            return;
        }
        if let Some(id) = self.id {
            self.frame = Some(host.request_frame(id));
        }
    }
}

impl<E: Engine> Drop for Controller<E> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
#[path = "../tests/unit/controller.rs"]
mod tests;
