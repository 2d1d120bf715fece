//! Full-frame post overlays: static film grain and CRT scanlines.

use crate::config::{NoiseConfig, ScanlineConfig};
use crate::foundation::error::FxResult;
use crate::foundation::math::{hash_u32, unit_to_u8};
use crate::render::Surface;
use crate::render::composite::{over, over_in_place};

/// Alpha of a dark scanline band before the overlay opacity is applied.
const SCANLINE_BAND_ALPHA: f64 = 0.3;

/// Static grayscale grain composited at low opacity.
///
/// The grain bitmap depends only on the seed and the pixel size, so it is built once per size.
#[derive(Debug)]
pub struct NoiseOverlay {
    cfg: NoiseConfig,
    cache: Option<NoiseTile>,
}

#[derive(Debug)]
struct NoiseTile {
    width: u32,
    height: u32,
    bytes: Vec<u8>,
}

impl NoiseOverlay {
    /// Create an overlay; nothing is allocated until the first apply.
    pub fn new(cfg: NoiseConfig) -> Self {
        Self { cfg, cache: None }
    }

    /// Composite the grain over `surface`.
    pub fn apply(&mut self, surface: &mut Surface) -> FxResult<()> {
        if self.cfg.opacity <= 0.0 || surface.is_empty() {
            return Ok(());
        }
        let (w, h) = (surface.pixel_width(), surface.pixel_height());
        let stale = self
            .cache
            .as_ref()
            .is_none_or(|t| t.width != w || t.height != h);
        if stale {
            self.cache = Some(NoiseTile {
                width: w,
                height: h,
                bytes: noise_bytes(self.cfg.seed, w, h),
            });
        }
        let Some(tile) = &self.cache else {
            return Ok(());
        };
        over_in_place(surface.data_mut(), &tile.bytes, self.cfg.opacity as f32)
    }
}

/// Opaque grayscale noise, one hashed value per pixel.
pub fn noise_bytes(seed: u64, w: u32, h: u32) -> Vec<u8> {
    let mut bytes = vec![0u8; (w as usize).saturating_mul(h as usize).saturating_mul(4)];
    for y in 0..h {
        for x in 0..w {
            let idx = ((y as usize) * (w as usize) + (x as usize)) * 4;
            let v = hash_u32(seed, x, y) as u8;
            bytes[idx..idx + 4].copy_from_slice(&[v, v, v, 255]);
        }
    }
    bytes
}

/// Alternating clear and darkened horizontal bands.
#[derive(Clone, Debug)]
pub struct ScanlineOverlay {
    cfg: ScanlineConfig,
}

impl ScanlineOverlay {
    /// Create an overlay.
    pub fn new(cfg: ScanlineConfig) -> Self {
        Self { cfg }
    }

    /// Whether the CSS row at `y` falls in a dark band at `time_s`.
    ///
    /// Bands are `line_height` tall, starting with a clear band at the top; when animated they
    /// scroll down by one `line_height` per second.
    pub fn is_dark_row(&self, y: f64, time_s: f64) -> bool {
        let lh = self.cfg.line_height;
        if !lh.is_finite() || lh <= 0.0 {
            return false;
        }
        let shift = if self.cfg.animate { time_s * lh } else { 0.0 };
        let band = ((y - shift) / lh).floor();
        band.rem_euclid(2.0) == 1.0
    }

    /// Darken every device row that falls in a dark band.
    pub fn apply(&self, surface: &mut Surface, time_s: f64) {
        let alpha = unit_to_u8(SCANLINE_BAND_ALPHA * self.cfg.opacity);
        if alpha == 0 || surface.is_empty() {
            return;
        }
        let dpr = surface.dpr();
        let row_bytes = surface.pixel_width() as usize * 4;
        let rows = surface.pixel_height();
        let data = surface.data_mut();
        for y in 0..rows {
            let css_y = (f64::from(y) + 0.5) / dpr;
            if !self.is_dark_row(css_y, time_s) {
                continue;
            }
            let start = y as usize * row_bytes;
            for d in data[start..start + row_bytes].chunks_exact_mut(4) {
                let out = over([d[0], d[1], d[2], d[3]], [0, 0, 0, alpha], 1.0);
                d.copy_from_slice(&out);
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/overlay.rs"]
mod tests;
