use crate::foundation::error::{FxError, FxResult};

pub use kurbo::{Point, Rect, Vec2};

/// Fixed simulation time step advanced per tick, in seconds.
pub const TICK_SECONDS: f64 = 0.016;

/// Absolute 0-based frame index in host timeline space.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Half-open frame range `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameRange {
    /// Inclusive range start.
    pub start: FrameIndex,
    /// Exclusive range end.
    pub end: FrameIndex,
}

impl FrameRange {
    /// Create a validated range with `start <= end`.
    pub fn new(start: FrameIndex, end: FrameIndex) -> FxResult<Self> {
        if start.0 > end.0 {
            return Err(FxError::validation("FrameRange start must be <= end"));
        }
        Ok(Self { start, end })
    }

    /// Number of frames contained in the range.
    pub fn len_frames(self) -> u64 {
        self.end.0.saturating_sub(self.start.0)
    }

    /// Return `true` when the range has no frames.
    pub fn is_empty(self) -> bool {
        self.start.0 == self.end.0
    }

    /// Return `true` when `f` is inside `[start, end)`.
    pub fn contains(self, f: FrameIndex) -> bool {
        self.start.0 <= f.0 && f.0 < self.end.0
    }
}

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated frame rate.
    pub fn new(num: u32, den: u32) -> FxResult<Self> {
        if den == 0 {
            return Err(FxError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(FxError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Frame rate as a float.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame in milliseconds.
    pub fn frame_duration_ms(self) -> f64 {
        1000.0 * f64::from(self.den) / f64::from(self.num)
    }
}

/// Drawing-surface dimensions in CSS pixels plus the device pixel ratio.
///
/// Simulation runs in CSS pixel space; only the rasterizer sees device pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Width in CSS pixels.
    pub width: f64,
    /// Height in CSS pixels.
    pub height: f64,
    /// Device pixel ratio (1.0 on standard displays).
    #[serde(default = "default_dpr")]
    pub dpr: f64,
}

fn default_dpr() -> f64 {
    1.0
}

impl Viewport {
    /// Viewport with a device pixel ratio of 1.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            dpr: 1.0,
        }
    }

    /// Set the device pixel ratio.
    pub fn with_dpr(mut self, dpr: f64) -> Self {
        self.dpr = dpr;
        self
    }

    /// Effective device pixel ratio; non-finite or non-positive ratios fall back to 1.
    pub fn effective_dpr(self) -> f64 {
        if self.dpr.is_finite() && self.dpr > 0.0 {
            self.dpr
        } else {
            1.0
        }
    }

    /// CSS width clamped to a finite non-negative value.
    pub fn css_width(self) -> f64 {
        finite_non_negative(self.width)
    }

    /// CSS height clamped to a finite non-negative value.
    pub fn css_height(self) -> f64 {
        finite_non_negative(self.height)
    }

    /// Device-pixel dimensions of the backing surface, clamped to the rasterizer limit.
    pub fn pixel_size(self) -> (u16, u16) {
        let dpr = self.effective_dpr();
        let px = |css: f64| -> u16 { (css * dpr).ceil().clamp(0.0, f64::from(u16::MAX)) as u16 };
        (px(self.css_width()), px(self.css_height()))
    }

    /// Return `true` when the backing surface would have no pixels.
    pub fn is_degenerate(self) -> bool {
        let (w, h) = self.pixel_size();
        w == 0 || h == 0
    }

    /// Validate viewport values supplied by configuration.
    pub fn validate(self) -> FxResult<()> {
        if !self.width.is_finite() || !self.height.is_finite() {
            return Err(FxError::validation("viewport width/height must be finite"));
        }
        if self.width < 0.0 || self.height < 0.0 {
            return Err(FxError::validation("viewport width/height must be >= 0"));
        }
        if !self.dpr.is_finite() || self.dpr <= 0.0 {
            return Err(FxError::validation("viewport dpr must be finite and > 0"));
        }
        Ok(())
    }
}

fn finite_non_negative(v: f64) -> f64 {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}

/// Straight-alpha sRGB color used by palettes. Serialized as `"#rrggbb"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Build a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb`.
    pub fn from_hex(s: &str) -> FxResult<Self> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| FxError::validation(format!("color '{s}' must start with '#'")))?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(FxError::validation(format!(
                "color '{s}' must be in #rrggbb form"
            )));
        }
        let ch = |i: usize| -> FxResult<u8> {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|e| FxError::validation(format!("color '{s}': {e}")))
        };
        Ok(Self::new(ch(0)?, ch(2)?, ch(4)?))
    }
}

impl TryFrom<String> for Rgb8 {
    type Error = FxError;

    fn try_from(s: String) -> FxResult<Self> {
        Self::from_hex(&s)
    }
}

impl From<Rgb8> for String {
    fn from(c: Rgb8) -> Self {
        format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b)
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Premultiplied red.
    pub r: u8,
    /// Premultiplied green.
    pub g: u8,
    /// Premultiplied blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Rgba8Premul {
    /// Premultiply straight RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    /// Pixel bytes in `[r, g, b, a]` order.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
