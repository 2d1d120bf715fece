use crate::circuit::sim::{CircuitState, spawn_packet_from};
use crate::config::CircuitConfig;
use crate::foundation::core::Point;
use crate::foundation::rng::RandomSource;

/// Last sampled pointer position in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pointer {
    /// Position relative to the surface origin.
    pub pos: Point,
    /// `false` once the pointer has left the surface.
    pub active: bool,
}

impl Default for Pointer {
    fn default() -> Self {
        Self {
            pos: Point::new(-1000.0, -1000.0),
            active: false,
        }
    }
}

impl Pointer {
    /// Record a move sample.
    pub fn move_to(&mut self, pos: Point) {
        self.pos = pos;
        self.active = true;
    }

    /// Mark the pointer as gone.
    pub fn leave(&mut self) {
        self.active = false;
    }
}

/// Energize nodes near the pointer and occasionally emit packets from the strongest of them.
///
/// Returns the number of packets emitted. Emission is rate limited on the engine clock, so at
/// most one packet leaves per cooldown window regardless of how many nodes qualify.
pub fn activate_nearby<R: RandomSource + ?Sized>(
    state: &mut CircuitState,
    cfg: &CircuitConfig,
    rng: &mut R,
) -> usize {
    if !state.pointer.active {
        return 0;
    }
    let tuning = &cfg.tuning;
    let radius = tuning.activation_radius;
    let pointer = state.pointer.pos;
    let now = state.clock_ms;
    let mut emitted = 0;

    for idx in 0..state.graph.nodes.len() {
        let node = &mut state.graph.nodes[idx];
        let dist = node.pos.distance(pointer);
        if dist >= radius {
            continue;
        }
        let intensity = 1.0 - dist / radius;
        node.energy = (node.energy + intensity * tuning.activation_gain).min(1.0);

        if intensity <= tuning.emit_threshold || !cooldown_elapsed(state.last_emit_ms, now, cfg) {
            continue;
        }
        if rng.chance(tuning.emit_chance)
            && spawn_packet_from(&state.graph, &mut state.packets, cfg, idx, rng)
        {
            state.last_emit_ms = Some(now);
            emitted += 1;
        }
    }
    emitted
}

fn cooldown_elapsed(last: Option<f64>, now: f64, cfg: &CircuitConfig) -> bool {
    last.is_none_or(|t| now - t >= cfg.tuning.emit_cooldown_ms)
}

#[cfg(test)]
#[path = "../../tests/unit/circuit/interact.rs"]
mod tests;
