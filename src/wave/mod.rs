//! Wave-ripple effect: fast pointer motion leaves expanding, wobbling rings with glints,
//! refraction streaks and a spray of particles over faint full-width sine lines.

/// Wave layer painting.
pub mod render;
/// Ripples, particles and their per-tick rules.
pub mod state;

use crate::config::WaveConfig;
use crate::engine::{Engine, EventKind};
use crate::foundation::core::{Point, Viewport};
use crate::foundation::error::FxResult;
use crate::foundation::rng::RandomSource;
use crate::render::Surface;

pub use state::{Particle, Ripple, WaveState, particle_opacity, ripple_alpha};

/// The wave layer as a mountable [`Engine`].
pub struct WaveEngine {
    cfg: WaveConfig,
    state: WaveState,
    rng: Box<dyn RandomSource>,
}

impl std::fmt::Debug for WaveEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaveEngine")
            .field("ripples", &self.state.ripples.len())
            .field("particles", &self.state.particles.len())
            .finish_non_exhaustive()
    }
}

impl WaveEngine {
    /// Create an idle engine.
    pub fn new(cfg: WaveConfig, rng: Box<dyn RandomSource>) -> Self {
        Self {
            cfg,
            state: WaveState::new(),
            rng,
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &WaveConfig {
        &self.cfg
    }

    /// Current simulation state.
    pub fn state(&self) -> &WaveState {
        &self.state
    }
}

impl Engine for WaveEngine {
    fn name(&self) -> &'static str {
        "wave"
    }

    fn subscriptions(&self) -> &'static [EventKind] {
        &[
            EventKind::PointerMove,
            EventKind::PointerLeave,
            EventKind::Resize,
        ]
    }

    // Ripples live in CSS space and are not tied to the surface size.
    fn resize(&mut self, _viewport: Viewport) {}

    fn pointer_move(&mut self, pos: Point) {
        if state::on_pointer_move(&mut self.state, &self.cfg, pos, &mut self.rng) {
            tracing::trace!(x = pos.x, y = pos.y, "ripple spawned");
        }
    }

    fn pointer_leave(&mut self) {
        state::on_pointer_leave(&mut self.state);
    }

    fn tick(&mut self, _dt_ms: f64) {
        state::tick(&mut self.state, &self.cfg);
    }

    fn render(&self, surface: &mut Surface) -> FxResult<()> {
        render::render(&self.state, &self.cfg, surface)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/wave/engine.rs"]
mod tests;
