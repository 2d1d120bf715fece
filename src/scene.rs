//! JSON scene description for offline rendering.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::config::{CircuitConfig, NoiseConfig, ScanlineConfig, WaveConfig};
use crate::foundation::core::{Fps, FrameIndex, FrameRange, Viewport};
use crate::foundation::error::{FxError, FxResult};

/// Everything needed to render a clip: surface, timing, which layers are mounted and the pointer
/// input replayed against them.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Scene {
    /// Surface size in CSS pixels plus device pixel ratio.
    pub viewport: Viewport,
    /// Host frame rate.
    pub fps: Fps,
    /// Clip length in frames.
    pub duration: u64,
    /// Seed for every random stream in the session.
    #[serde(default)]
    pub seed: u64,
    /// Circuit-matrix layer, if mounted.
    #[serde(default)]
    pub circuit: Option<CircuitConfig>,
    /// Wave-ripple layer, if mounted.
    #[serde(default)]
    pub wave: Option<WaveConfig>,
    /// Film grain overlay.
    #[serde(default)]
    pub noise: Option<NoiseConfig>,
    /// Scanline overlay.
    #[serde(default)]
    pub scanlines: Option<ScanlineConfig>,
    /// Timed host input.
    #[serde(default)]
    pub pointer: Vec<ScriptEvent>,
}

/// One scripted host input, dispatched before the pump of `frame`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptEvent {
    /// Pointer moves to `(x, y)` in CSS pixels.
    Move {
        /// Frame index.
        frame: u64,
        /// X in CSS pixels.
        x: f64,
        /// Y in CSS pixels.
        y: f64,
    },
    /// Pointer leaves the surface.
    Leave {
        /// Frame index.
        frame: u64,
    },
    /// Viewport changes; the device pixel ratio is kept unless given.
    Resize {
        /// Frame index.
        frame: u64,
        /// New width in CSS pixels.
        width: f64,
        /// New height in CSS pixels.
        height: f64,
        /// New device pixel ratio.
        #[serde(default)]
        dpr: Option<f64>,
    },
}

impl ScriptEvent {
    /// Frame the event fires on.
    pub fn frame(&self) -> u64 {
        match *self {
            Self::Move { frame, .. } | Self::Leave { frame } | Self::Resize { frame, .. } => frame,
        }
    }
}

impl Scene {
    /// A scene with both engines and both overlays at their defaults and no pointer input.
    pub fn with_defaults(viewport: Viewport, fps: Fps, duration: u64, seed: u64) -> Self {
        Self {
            viewport,
            fps,
            duration,
            seed,
            circuit: Some(CircuitConfig::default()),
            wave: Some(WaveConfig::default()),
            noise: Some(NoiseConfig::default()),
            scanlines: Some(ScanlineConfig::default()),
            pointer: Vec::new(),
        }
    }

    /// Parse a scene from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> FxResult<Self> {
        serde_json::from_reader(r).map_err(|e| FxError::serde(format!("parse scene JSON: {e}")))
    }

    /// Parse a scene from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> FxResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            FxError::validation(format!("open scene JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Validate timing, surface and every configured layer.
    pub fn validate(&self) -> FxResult<()> {
        self.viewport.validate()?;
        Fps::new(self.fps.num, self.fps.den)?;
        if self.duration == 0 {
            return Err(FxError::validation("scene duration must be >= 1 frame"));
        }
        if let Some(c) = &self.circuit {
            c.validate()?;
        }
        if let Some(w) = &self.wave {
            w.validate()?;
        }
        if let Some(n) = &self.noise {
            n.validate()?;
        }
        if let Some(s) = &self.scanlines {
            s.validate()?;
        }
        for (i, ev) in self.pointer.iter().enumerate() {
            match *ev {
                ScriptEvent::Move { x, y, .. } if !x.is_finite() || !y.is_finite() => {
                    return Err(FxError::validation(format!(
                        "pointer[{i}] move position must be finite"
                    )));
                }
                ScriptEvent::Resize {
                    width, height, dpr, ..
                } => {
                    let vp = Viewport {
                        width,
                        height,
                        dpr: dpr.unwrap_or(self.viewport.dpr),
                    };
                    vp.validate().map_err(|e| {
                        FxError::validation(format!("pointer[{i}] resize: {e}"))
                    })?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// The whole clip as a frame range.
    pub fn range(&self) -> FrameRange {
        FrameRange {
            start: FrameIndex(0),
            end: FrameIndex(self.duration),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/scene.rs"]
mod tests;
