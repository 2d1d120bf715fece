//! Circuit-matrix effect: a jittered grid of nodes joined by right-angle traces, with packets
//! hopping between neighbors and nodes brightening under the pointer.

/// Jittered grid graph construction.
pub mod graph;
/// Pointer sampling and node activation.
pub mod interact;
/// Circuit layer painting.
pub mod render;
/// Packets, node energy and the per-tick rules.
pub mod sim;

use crate::config::CircuitConfig;
use crate::engine::{Engine, EventKind};
use crate::foundation::core::{Point, Viewport};
use crate::foundation::error::FxResult;
use crate::foundation::rng::RandomSource;
use crate::render::Surface;

pub use graph::{CircuitGraph, Node, build_graph};
pub use interact::Pointer;
pub use sim::{CircuitState, Packet, PacketTone, TickReport, Trail};

/// The circuit layer as a mountable [`Engine`].
pub struct CircuitEngine {
    cfg: CircuitConfig,
    state: CircuitState,
    rng: Box<dyn RandomSource>,
}

impl std::fmt::Debug for CircuitEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CircuitEngine")
            .field("nodes", &self.state.graph.len())
            .field("packets", &self.state.packets.len())
            .finish_non_exhaustive()
    }
}

impl CircuitEngine {
    /// Create an engine with an empty graph; geometry is built on the first resize.
    pub fn new(cfg: CircuitConfig, rng: Box<dyn RandomSource>) -> Self {
        Self {
            cfg,
            state: CircuitState::new(CircuitGraph::empty()),
            rng,
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &CircuitConfig {
        &self.cfg
    }

    /// Current simulation state.
    pub fn state(&self) -> &CircuitState {
        &self.state
    }

    /// Mutable simulation state, for scripted scenarios.
    pub fn state_mut(&mut self) -> &mut CircuitState {
        &mut self.state
    }

    /// Advance one tick and report what happened.
    pub fn step(&mut self, dt_ms: f64) -> TickReport {
        sim::tick(&mut self.state, &self.cfg, dt_ms, &mut self.rng)
    }
}

impl Engine for CircuitEngine {
    fn name(&self) -> &'static str {
        "circuit"
    }

    fn subscriptions(&self) -> &'static [EventKind] {
        &[
            EventKind::PointerMove,
            EventKind::PointerLeave,
            EventKind::Resize,
        ]
    }

    fn resize(&mut self, viewport: Viewport) {
        let graph = build_graph(
            viewport.css_width(),
            viewport.css_height(),
            &self.cfg,
            &mut self.rng,
        );
        tracing::debug!(
            nodes = graph.len(),
            dropped_packets = self.state.packets.len(),
            "circuit geometry rebuilt"
        );
        self.state.replace_graph(graph);
    }

    fn pointer_move(&mut self, pos: Point) {
        self.state.pointer.move_to(pos);
    }

    fn pointer_leave(&mut self) {
        self.state.pointer.leave();
    }

    fn tick(&mut self, dt_ms: f64) {
        self.step(dt_ms);
    }

    fn render(&self, surface: &mut Surface) -> FxResult<()> {
        render::render(&self.state, &self.cfg, surface)
    }

    fn layer_opacity(&self) -> f64 {
        self.cfg.opacity
    }
}

#[cfg(test)]
#[path = "../../tests/unit/circuit/engine.rs"]
mod tests;
