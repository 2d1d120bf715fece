use std::collections::VecDeque;

use crate::config::WaveConfig;
use crate::foundation::core::{Point, TICK_SECONDS, Vec2};
use crate::foundation::rng::RandomSource;

/// An expanding ring disturbance.
#[derive(Clone, Debug, PartialEq)]
pub struct Ripple {
    /// Spawn position.
    pub center: Point,
    /// Current radius; grows every tick.
    pub radius: f64,
    /// Wobble and growth driver.
    pub strength: f64,
    /// Ticks lived.
    pub age: u32,
    /// Ticks until the ripple has fully faded.
    pub max_age: u32,
    /// Per-ripple phase offset in radians.
    pub phase: f64,
}

impl Ripple {
    /// Fraction of the lifetime consumed.
    pub fn progress(&self) -> f64 {
        f64::from(self.age) / f64::from(self.max_age.max(1))
    }

    /// Current alpha.
    pub fn alpha(&self) -> f64 {
        ripple_alpha(self.age, self.max_age)
    }
}

/// A short-lived spark thrown off by a fast pointer movement.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    /// Current position.
    pub pos: Point,
    /// Per-tick displacement.
    pub vel: Vec2,
    /// Ticks lived.
    pub life: f64,
    /// Lifetime in ticks.
    pub max_life: f64,
    /// Dot radius scale.
    pub size: f64,
}

impl Particle {
    /// Current opacity.
    pub fn opacity(&self) -> f64 {
        particle_opacity(self.life, self.max_life)
    }
}

/// `(1 - age/max_age)^2`, zero from `max_age` on.
pub fn ripple_alpha(age: u32, max_age: u32) -> f64 {
    if max_age == 0 || age >= max_age {
        return 0.0;
    }
    let k = 1.0 - f64::from(age) / f64::from(max_age);
    k * k
}

/// `sin(pi * life/max_life) * 0.8` over the lifetime, zero outside it.
pub fn particle_opacity(life: f64, max_life: f64) -> f64 {
    if max_life.is_nan() || max_life <= 0.0 || life <= 0.0 || life >= max_life {
        return 0.0;
    }
    (std::f64::consts::PI * life / max_life).sin() * 0.8
}

/// Everything the wave layer mutates from tick to tick.
#[derive(Clone, Debug, Default)]
pub struct WaveState {
    /// Live ripples, oldest first.
    pub ripples: VecDeque<Ripple>,
    /// Live particles, oldest first.
    pub particles: VecDeque<Particle>,
    /// Previous pointer sample; `None` until the first move (or after a leave).
    pub last_pointer: Option<Point>,
    /// Animation time in seconds.
    pub time: f64,
}

impl WaveState {
    /// Empty state.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Feed a pointer sample. Returns `true` when a ripple was spawned.
///
/// The first sample after construction or a leave only records the position.
pub fn on_pointer_move<R: RandomSource + ?Sized>(
    state: &mut WaveState,
    cfg: &WaveConfig,
    pos: Point,
    rng: &mut R,
) -> bool {
    let prev = state.last_pointer.replace(pos);
    let Some(prev) = prev else {
        return false;
    };
    let velocity = prev.distance(pos);
    if !velocity.is_finite() || velocity <= cfg.tuning.velocity_threshold {
        return false;
    }
    spawn_ripple(state, cfg, pos, velocity, rng);
    true
}

/// Forget the previous pointer sample.
pub fn on_pointer_leave(state: &mut WaveState) {
    state.last_pointer = None;
}

/// Spawn a ripple and its particle burst at `pos` for a pointer moving at `velocity`.
pub fn spawn_ripple<R: RandomSource + ?Sized>(
    state: &mut WaveState,
    cfg: &WaveConfig,
    pos: Point,
    velocity: f64,
    rng: &mut R,
) {
    let tuning = &cfg.tuning;
    while state.ripples.len() >= cfg.max_ripples.max(1) {
        state.ripples.pop_front();
    }
    state.ripples.push_back(Ripple {
        center: pos,
        radius: 0.0,
        strength: (velocity * tuning.strength_per_velocity).min(cfg.strength),
        age: 0,
        max_age: tuning.max_age,
        phase: rng.angle(),
    });

    let count = burst_size(velocity, cfg);
    for _ in 0..count {
        let angle = rng.angle();
        let speed = rng.span(1.0, 3.0);
        let max_life = rng.span(tuning.particle_life_min, tuning.particle_life_span);
        let size = rng.span(1.0, 2.0);
        while state.particles.len() >= tuning.max_particles.max(1) {
            state.particles.pop_front();
        }
        state.particles.push_back(Particle {
            pos,
            vel: Vec2::new(angle.cos() * speed, angle.sin() * speed),
            life: 0.0,
            max_life,
            size,
        });
    }
}

/// Particles launched for a pointer moving at `velocity`.
pub fn burst_size(velocity: f64, cfg: &WaveConfig) -> usize {
    let n = (velocity / cfg.tuning.velocity_per_particle).floor();
    if !n.is_finite() || n <= 0.0 {
        return 0;
    }
    (n as usize).min(cfg.tuning.max_burst)
}

/// Advance ripples and particles one tick and expire the finished ones.
pub fn tick(state: &mut WaveState, cfg: &WaveConfig) {
    let tuning = &cfg.tuning;
    state.time += TICK_SECONDS;

    for r in &mut state.ripples {
        r.age = r.age.saturating_add(1);
        r.radius += tuning.base_growth + r.strength * tuning.growth_per_strength;
    }
    state.ripples.retain(|r| r.age <= r.max_age);

    for p in &mut state.particles {
        p.life += 1.0;
        p.pos += p.vel;
        p.vel *= tuning.particle_drag;
    }
    state.particles.retain(|p| p.life <= p.max_life);
}

#[cfg(test)]
#[path = "../../tests/unit/wave/state.rs"]
mod tests;
