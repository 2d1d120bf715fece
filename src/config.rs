//! Serde-facing tuning and configuration for the engines and overlays.
//!
//! Every numeric constant that shapes the look of the effects lives here with its default, so a
//! scene file can adjust it without touching code. Only the top-level knobs (`opacity`, `speed`,
//! `density`, `strength`, `max_ripples`) are expected to change in normal use.

use crate::foundation::core::Rgb8;
use crate::foundation::error::{FxError, FxResult};

/// Shared color theme.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Dim trace green (`#2D6A4F`).
    pub primary: Rgb8,
    /// Bright accent green (`#74C365`).
    pub accent: Rgb8,
    /// Circuit background fill (`#080c0a`).
    pub background: Rgb8,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            primary: Rgb8::new(0x2D, 0x6A, 0x4F),
            accent: Rgb8::new(0x74, 0xC3, 0x65),
            background: Rgb8::new(0x08, 0x0C, 0x0A),
        }
    }
}

/// Circuit-matrix layer configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CircuitConfig {
    /// Alpha applied to the whole layer.
    pub opacity: f64,
    /// Multiplies packet speeds and the ambient spawn rate.
    pub speed: f64,
    /// Inversely scales grid spacing; scales the packet cap and ambient spawn rate.
    pub density: f64,
    /// Colors.
    pub palette: Palette,
    /// Fine tuning.
    pub tuning: CircuitTuning,
}

impl Default for CircuitConfig {
    fn default() -> Self {
        Self {
            opacity: 0.6,
            speed: 1.0,
            density: 1.0,
            palette: Palette::default(),
            tuning: CircuitTuning::default(),
        }
    }
}

impl CircuitConfig {
    /// Grid spacing in CSS pixels for the configured density.
    pub fn grid_size(&self) -> f64 {
        (self.tuning.base_spacing / self.density).floor().max(1.0)
    }

    /// Maximum number of concurrent packets.
    pub fn packet_cap(&self) -> usize {
        (self.tuning.packets_per_density * self.density)
            .floor()
            .max(0.0) as usize
    }

    /// Per-tick probability of an ambient packet spawn.
    pub fn ambient_spawn_probability(&self) -> f64 {
        self.tuning.ambient_spawn_rate * self.speed * self.density
    }

    /// Validate user-facing values.
    pub fn validate(&self) -> FxResult<()> {
        unit("circuit.opacity", self.opacity)?;
        positive("circuit.speed", self.speed)?;
        positive("circuit.density", self.density)?;
        self.tuning.validate()
    }
}

/// Circuit simulation constants.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CircuitTuning {
    /// Grid spacing at density 1.
    pub base_spacing: f64,
    /// Keep probability for cells where `row + col` is odd.
    pub odd_cell_keep: f64,
    /// Total jitter span as a fraction of grid spacing (centered on the cell).
    pub jitter: f64,
    /// Maximum connection distance as a multiple of grid spacing.
    pub connect_factor: f64,
    /// Probability that an eligible pair is connected.
    pub edge_keep: f64,
    /// Upper bound of the uniform initial node energy.
    pub initial_energy: f64,
    /// Multiplicative energy decay per tick.
    pub energy_decay: f64,
    /// Energy added to an endpoint while a packet is near it.
    pub endpoint_boost: f64,
    /// Probability that an arriving packet continues to another neighbor.
    pub reroute: f64,
    /// Ambient spawn probability per tick at speed 1 / density 1.
    pub ambient_spawn_rate: f64,
    /// Packet cap per unit of density.
    pub packets_per_density: f64,
    /// Minimum per-tick packet speed (progress units).
    pub packet_speed_min: f64,
    /// Random span added to the minimum packet speed.
    pub packet_speed_span: f64,
    /// Minimum packet size in CSS pixels.
    pub packet_size_min: f64,
    /// Random span added to the minimum packet size.
    pub packet_size_span: f64,
    /// Probability a packet uses the accent color.
    pub accent_ratio: f64,
    /// Trail ring-buffer capacity.
    pub trail_capacity: usize,
    /// Pointer activation radius.
    pub activation_radius: f64,
    /// Energy gained at zero distance from the pointer.
    pub activation_gain: f64,
    /// Intensity above which an activated node may emit a packet.
    pub emit_threshold: f64,
    /// Probability of emitting once above threshold and off cooldown.
    pub emit_chance: f64,
    /// Minimum engine-clock milliseconds between interaction spawns.
    pub emit_cooldown_ms: f64,
    /// Radius of the pointer glow gradient.
    pub pointer_glow_radius: f64,
    /// Gaussian blur radius of the glow layer, in device pixels at dpr 1.
    pub glow_radius: u32,
}

impl Default for CircuitTuning {
    fn default() -> Self {
        Self {
            base_spacing: 70.0,
            odd_cell_keep: 0.4,
            jitter: 0.25,
            connect_factor: 1.6,
            edge_keep: 0.65,
            initial_energy: 0.2,
            energy_decay: 0.96,
            endpoint_boost: 0.2,
            reroute: 0.6,
            ambient_spawn_rate: 0.05,
            packets_per_density: 80.0,
            packet_speed_min: 0.008,
            packet_speed_span: 0.012,
            packet_size_min: 2.5,
            packet_size_span: 2.0,
            accent_ratio: 0.75,
            trail_capacity: 15,
            activation_radius: 120.0,
            activation_gain: 0.5,
            emit_threshold: 0.5,
            emit_chance: 0.4,
            emit_cooldown_ms: 50.0,
            pointer_glow_radius: 150.0,
            glow_radius: 6,
        }
    }
}

impl CircuitTuning {
    fn validate(&self) -> FxResult<()> {
        positive("circuit.tuning.base_spacing", self.base_spacing)?;
        for (name, v) in [
            ("odd_cell_keep", self.odd_cell_keep),
            ("jitter", self.jitter),
            ("edge_keep", self.edge_keep),
            ("initial_energy", self.initial_energy),
            ("energy_decay", self.energy_decay),
            ("endpoint_boost", self.endpoint_boost),
            ("reroute", self.reroute),
            ("ambient_spawn_rate", self.ambient_spawn_rate),
            ("accent_ratio", self.accent_ratio),
            ("activation_gain", self.activation_gain),
            ("emit_threshold", self.emit_threshold),
            ("emit_chance", self.emit_chance),
        ] {
            unit(&format!("circuit.tuning.{name}"), v)?;
        }
        if self.energy_decay >= 1.0 {
            return Err(FxError::validation(
                "circuit.tuning.energy_decay must be < 1",
            ));
        }
        for (name, v) in [
            ("connect_factor", self.connect_factor),
            ("packets_per_density", self.packets_per_density),
            ("packet_speed_min", self.packet_speed_min),
            ("packet_size_min", self.packet_size_min),
            ("activation_radius", self.activation_radius),
        ] {
            positive(&format!("circuit.tuning.{name}"), v)?;
        }
        for (name, v) in [
            ("packet_speed_span", self.packet_speed_span),
            ("packet_size_span", self.packet_size_span),
            ("emit_cooldown_ms", self.emit_cooldown_ms),
            ("pointer_glow_radius", self.pointer_glow_radius),
        ] {
            non_negative(&format!("circuit.tuning.{name}"), v)?;
        }
        if self.trail_capacity == 0 {
            return Err(FxError::validation(
                "circuit.tuning.trail_capacity must be >= 1",
            ));
        }
        Ok(())
    }
}

/// Wave/ripple layer configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Upper bound on per-ripple strength.
    pub strength: f64,
    /// Ring-buffer capacity for live ripples.
    pub max_ripples: usize,
    /// Colors.
    pub palette: Palette,
    /// Fine tuning.
    pub tuning: WaveTuning,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            strength: 50.0,
            max_ripples: 12,
            palette: Palette::default(),
            tuning: WaveTuning::default(),
        }
    }
}

impl WaveConfig {
    /// Validate user-facing values.
    pub fn validate(&self) -> FxResult<()> {
        non_negative("wave.strength", self.strength)?;
        if self.max_ripples == 0 {
            return Err(FxError::validation("wave.max_ripples must be >= 1"));
        }
        self.tuning.validate()
    }
}

/// Wave simulation constants.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct WaveTuning {
    /// Pointer travel per sample above which a ripple spawns.
    pub velocity_threshold: f64,
    /// Ripple strength gained per unit of velocity.
    pub strength_per_velocity: f64,
    /// Ripple lifetime in ticks.
    pub max_age: u32,
    /// Radius growth per tick, independent of strength.
    pub base_growth: f64,
    /// Radius growth per tick per unit of strength.
    pub growth_per_strength: f64,
    /// Concentric rings per ripple.
    pub ring_count: u32,
    /// Polyline segments per ring.
    pub ring_segments: u32,
    /// Velocity units per burst particle.
    pub velocity_per_particle: f64,
    /// Maximum particles in one burst.
    pub max_burst: usize,
    /// Maximum live particles across all bursts; oldest are dropped first.
    pub max_particles: usize,
    /// Per-tick velocity drag factor.
    pub particle_drag: f64,
    /// Minimum particle lifetime in ticks.
    pub particle_life_min: f64,
    /// Random span added to the particle lifetime.
    pub particle_life_span: f64,
    /// Highlight glints per ripple.
    pub highlight_count: u32,
    /// Refraction curves per ripple.
    pub refraction_count: u32,
    /// Full-width background sine lines.
    pub background_waves: u32,
    /// Alpha of the background sine lines.
    pub background_alpha: f64,
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            velocity_threshold: 8.0,
            strength_per_velocity: 0.6,
            max_age: 180,
            base_growth: 4.0,
            growth_per_strength: 0.1,
            ring_count: 5,
            ring_segments: 64,
            velocity_per_particle: 10.0,
            max_burst: 8,
            max_particles: 256,
            particle_drag: 0.98,
            particle_life_min: 60.0,
            particle_life_span: 40.0,
            highlight_count: 8,
            refraction_count: 6,
            background_waves: 3,
            background_alpha: 0.02,
        }
    }
}

impl WaveTuning {
    fn validate(&self) -> FxResult<()> {
        non_negative("wave.tuning.velocity_threshold", self.velocity_threshold)?;
        non_negative("wave.tuning.strength_per_velocity", self.strength_per_velocity)?;
        positive("wave.tuning.velocity_per_particle", self.velocity_per_particle)?;
        positive("wave.tuning.particle_life_min", self.particle_life_min)?;
        non_negative("wave.tuning.particle_life_span", self.particle_life_span)?;
        non_negative("wave.tuning.base_growth", self.base_growth)?;
        non_negative("wave.tuning.growth_per_strength", self.growth_per_strength)?;
        unit("wave.tuning.particle_drag", self.particle_drag)?;
        unit("wave.tuning.background_alpha", self.background_alpha)?;
        if self.max_age == 0 {
            return Err(FxError::validation("wave.tuning.max_age must be >= 1"));
        }
        if self.ring_segments < 3 {
            return Err(FxError::validation("wave.tuning.ring_segments must be >= 3"));
        }
        Ok(())
    }
}

/// Static film-grain overlay.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    /// Overlay alpha.
    pub opacity: f64,
    /// Hash seed; the grain pattern is stable for a seed.
    pub seed: u64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            opacity: 0.05,
            seed: 0x5EED,
        }
    }
}

impl NoiseConfig {
    /// Validate user-facing values.
    pub fn validate(&self) -> FxResult<()> {
        unit("noise.opacity", self.opacity)
    }
}

/// CRT scanline overlay.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ScanlineConfig {
    /// Overlay alpha.
    pub opacity: f64,
    /// Height of each clear and each dark band, in CSS pixels.
    pub line_height: f64,
    /// Scroll the bands downward over time.
    pub animate: bool,
}

impl Default for ScanlineConfig {
    fn default() -> Self {
        Self {
            opacity: 0.1,
            line_height: 2.0,
            animate: false,
        }
    }
}

impl ScanlineConfig {
    /// Validate user-facing values.
    pub fn validate(&self) -> FxResult<()> {
        unit("scanlines.opacity", self.opacity)?;
        positive("scanlines.line_height", self.line_height)
    }
}

fn unit(name: &str, v: f64) -> FxResult<()> {
    if !v.is_finite() || !(0.0..=1.0).contains(&v) {
        return Err(FxError::validation(format!("{name} must be in [0, 1]")));
    }
    Ok(())
}

fn positive(name: &str, v: f64) -> FxResult<()> {
    if !v.is_finite() || v <= 0.0 {
        return Err(FxError::validation(format!("{name} must be finite and > 0")));
    }
    Ok(())
}

fn non_negative(name: &str, v: f64) -> FxResult<()> {
    if !v.is_finite() || v < 0.0 {
        return Err(FxError::validation(format!(
            "{name} must be finite and >= 0"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
