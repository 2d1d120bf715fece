//! circuitwave renders two procedural background effects on the CPU: a circuit-board matrix of
//! nodes and packet-carrying traces, and a water-ripple layer of deformed rings and particles.
//!
//! Each effect is an [`Engine`] mounted through a [`Controller`] on a single-threaded [`Host`]
//! that delivers pointer input, resizes and frame callbacks. Offline, the public API is
//! session-oriented:
//!
//! - Load and validate a [`Scene`]
//! - Create a [`RenderSession`]
//! - Render single frames or stream a range into a [`FrameSink`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Circuit-matrix engine.
pub mod circuit;
/// Serde configuration for engines and overlays.
pub mod config;
/// Engine lifecycle controller.
pub mod controller;
/// Encoding sinks.
pub mod encode;
/// The engine contract.
pub mod engine;
/// Frame and input scheduler.
pub mod host;
/// Noise and scanline overlays.
pub mod overlay;
/// CPU rasterization surfaces.
pub mod render;
/// Scene description.
pub mod scene;
/// Offline scene playback.
pub mod session;
/// Wave-ripple engine.
pub mod wave;

pub use crate::foundation::core::{
    Fps, FrameIndex, FrameRange, Point, Rect, Rgb8, Rgba8Premul, TICK_SECONDS, Vec2, Viewport,
};
pub use crate::foundation::error::{FxError, FxResult};
pub use crate::foundation::rng::{RandomSource, Rng64, ScriptedRandom};

pub use crate::circuit::CircuitEngine;
pub use crate::config::{
    CircuitConfig, CircuitTuning, NoiseConfig, Palette, ScanlineConfig, WaveConfig, WaveTuning,
};
pub use crate::controller::{Controller, ControllerState, ControllerStats, StopHandle};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
pub use crate::encode::png::PngSequenceSink;
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::engine::{Engine, EventKind};
pub use crate::host::{ClientId, Host, HostClient, HostEvent, PumpReport, Registration};
pub use crate::overlay::{NoiseOverlay, ScanlineOverlay};
pub use crate::render::{FrameRGBA, Surface};
pub use crate::scene::{Scene, ScriptEvent};
pub use crate::session::{RenderSession, RenderStats};
pub use crate::wave::WaveEngine;
