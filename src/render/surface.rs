use kurbo::{BezPath, PathEl};
use vello_cpu::kurbo::Shape as _;

use crate::foundation::core::{Point, Rect, Rgb8, Rgba8Premul, Viewport};
use crate::foundation::error::FxResult;
use crate::foundation::math::unit_to_u8;
use crate::render::FrameRGBA;
use crate::render::blur::blur_rgba8_premul;
use crate::render::composite::{over, over_in_place, premul_over_in_place};

const CURVE_TOLERANCE: f64 = 0.1;

/// One stop of a radial falloff, in straight alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    /// Normalized distance from the center in `[0, 1]`.
    pub offset: f64,
    /// Stop color.
    pub color: Rgb8,
    /// Stop alpha in `[0, 1]`.
    pub alpha: f64,
}

impl ColorStop {
    /// Build a stop.
    pub const fn new(offset: f64, color: Rgb8, alpha: f64) -> Self {
        Self {
            offset,
            color,
            alpha,
        }
    }
}

/// Premultiplied RGBA8 drawing target addressed in CSS pixels.
///
/// The backing buffer is `ceil(css * dpr)` device pixels on each axis; every drawing call is
/// scaled by the device pixel ratio so callers never see device pixels.
pub struct Surface {
    viewport: Viewport,
    width: u16,
    height: u16,
    data: Vec<u8>,
    ctx: Option<vello_cpu::RenderContext>,
    scratch: Option<vello_cpu::Pixmap>,
    blur_out: Vec<u8>,
    blur_tmp: Vec<u8>,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("viewport", &self.viewport)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl Surface {
    /// Allocate a transparent surface for `viewport`.
    pub fn new(viewport: Viewport) -> Self {
        let (width, height) = viewport.pixel_size();
        Self {
            viewport,
            width,
            height,
            data: vec![0u8; byte_len(width, height)],
            ctx: None,
            scratch: None,
            blur_out: Vec::new(),
            blur_tmp: Vec::new(),
        }
    }

    /// Adopt a new viewport, reallocating (and clearing) only when the pixel size changes.
    pub fn resize(&mut self, viewport: Viewport) {
        let (width, height) = viewport.pixel_size();
        self.viewport = viewport;
        if (width, height) == (self.width, self.height) {
            return;
        }
        self.width = width;
        self.height = height;
        self.data = vec![0u8; byte_len(width, height)];
        self.ctx = None;
        self.scratch = None;
        self.blur_out.clear();
        self.blur_tmp.clear();
    }

    /// Current viewport.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Effective device pixel ratio.
    pub fn dpr(&self) -> f64 {
        self.viewport.effective_dpr()
    }

    /// Width in device pixels.
    pub fn pixel_width(&self) -> u32 {
        u32::from(self.width)
    }

    /// Height in device pixels.
    pub fn pixel_height(&self) -> u32 {
        u32::from(self.height)
    }

    /// Return `true` when the surface has no pixels; drawing is then a no-op.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Premultiplied RGBA8 bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable premultiplied RGBA8 bytes, for per-pixel overlays.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// One device pixel, if in range.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.pixel_width() || y >= self.pixel_height() {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + x as usize) * 4;
        Some([
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ])
    }

    /// Reset every pixel to transparent.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Fill every pixel with an opaque color.
    pub fn fill(&mut self, color: Rgb8) {
        let px = [color.r, color.g, color.b, 255];
        for d in self.data.chunks_exact_mut(4) {
            d.copy_from_slice(&px);
        }
    }

    /// Rasterize vector drawing and composite it over the current contents.
    pub fn paint(&mut self, f: impl FnOnce(&mut Painter<'_>)) -> FxResult<()> {
        let Some(scratch) = self.render_scratch(f) else {
            return Ok(());
        };
        let out = premul_over_in_place(&mut self.data, scratch.data_as_u8_slice());
        self.scratch = Some(scratch);
        out
    }

    /// Rasterize vector drawing, blur it by `radius` CSS pixels and composite the halo.
    pub fn paint_glow(&mut self, radius: f64, f: impl FnOnce(&mut Painter<'_>)) -> FxResult<()> {
        let Some(scratch) = self.render_scratch(f) else {
            return Ok(());
        };
        let radius_px = if radius.is_finite() && radius > 0.0 {
            (radius * self.dpr()).round() as u32
        } else {
            0
        };
        let len = self.data.len();
        self.blur_out.resize(len, 0);
        self.blur_tmp.resize(len, 0);
        let (width, height) = (self.pixel_width(), self.pixel_height());
        let out = blur_rgba8_premul(
            scratch.data_as_u8_slice(),
            &mut self.blur_out,
            &mut self.blur_tmp,
            width,
            height,
            radius_px,
        )
        .and_then(|()| premul_over_in_place(&mut self.data, &self.blur_out));
        self.scratch = Some(scratch);
        out
    }

    /// Composite a radial color falloff centered at `center` (CSS pixels) directly onto the
    /// surface. Pixels at or beyond `radius` are untouched.
    pub fn radial_splat(&mut self, center: Point, radius: f64, stops: &[ColorStop]) {
        if self.is_empty() || stops.is_empty() || !radius.is_finite() || radius <= 0.0 {
            return;
        }
        if !center.x.is_finite() || !center.y.is_finite() {
            return;
        }
        let dpr = self.dpr();
        let (w, h) = (self.pixel_width() as i64, self.pixel_height() as i64);
        let x0 = (((center.x - radius) * dpr).floor() as i64).clamp(0, w);
        let x1 = (((center.x + radius) * dpr).ceil() as i64).clamp(0, w);
        let y0 = (((center.y - radius) * dpr).floor() as i64).clamp(0, h);
        let y1 = (((center.y + radius) * dpr).ceil() as i64).clamp(0, h);

        for y in y0..y1 {
            let cy = (y as f64 + 0.5) / dpr;
            for x in x0..x1 {
                let cx = (x as f64 + 0.5) / dpr;
                let d = Point::new(cx, cy).distance(center);
                if d >= radius {
                    continue;
                }
                let [r, g, b, a] = sample_stops(stops, d / radius);
                if a == 0 {
                    continue;
                }
                let src = Rgba8Premul::from_straight_rgba(r, g, b, a).to_array();
                let idx = ((y as usize) * (w as usize) + x as usize) * 4;
                let dst = [
                    self.data[idx],
                    self.data[idx + 1],
                    self.data[idx + 2],
                    self.data[idx + 3],
                ];
                self.data[idx..idx + 4].copy_from_slice(&over(dst, src, 1.0));
            }
        }
    }

    /// Composite another surface of the same pixel size over this one.
    pub fn composite_over(&mut self, src: &Surface, opacity: f64) -> FxResult<()> {
        over_in_place(&mut self.data, &src.data, opacity as f32)
    }

    /// Copy the pixels out as a frame.
    pub fn to_frame(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.pixel_width(),
            height: self.pixel_height(),
            data: self.data.clone(),
            premultiplied: true,
        }
    }

    fn render_scratch(
        &mut self,
        f: impl FnOnce(&mut Painter<'_>),
    ) -> Option<vello_cpu::Pixmap> {
        if self.is_empty() {
            return None;
        }
        let (w, h) = (self.width, self.height);
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == w && ctx.height() == h => ctx,
            _ => vello_cpu::RenderContext::new(w, h),
        };
        ctx.reset();
        ctx.set_transform(vello_cpu::kurbo::Affine::scale(self.dpr()));
        f(&mut Painter { ctx: &mut ctx });
        ctx.flush();

        let mut scratch = match self.scratch.take() {
            Some(p) if p.width() == w && p.height() == h => p,
            _ => vello_cpu::Pixmap::new(w, h),
        };
        scratch.data_as_u8_slice_mut().fill(0);
        ctx.render_to_pixmap(&mut scratch);
        self.ctx = Some(ctx);
        Some(scratch)
    }
}

/// Vector drawing handle, in CSS pixels, valid for one [`Surface::paint`] call.
pub struct Painter<'a> {
    ctx: &'a mut vello_cpu::RenderContext,
}

impl Painter<'_> {
    /// Fill an axis-aligned rectangle.
    pub fn fill_rect(&mut self, rect: Rect, color: Rgb8, alpha: f64) {
        let Some(c) = paint_color(color, alpha) else {
            return;
        };
        self.ctx.set_paint(c);
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            rect.x0, rect.y0, rect.x1, rect.y1,
        ));
    }

    /// Fill a circle.
    pub fn fill_circle(&mut self, center: Point, radius: f64, color: Rgb8, alpha: f64) {
        if !radius.is_finite() || radius <= 0.0 {
            return;
        }
        let Some(c) = paint_color(color, alpha) else {
            return;
        };
        let circle = vello_cpu::kurbo::Circle::new(point_to_cpu(center), radius);
        let mut p = vello_cpu::kurbo::BezPath::new();
        for el in circle.path_elements(CURVE_TOLERANCE) {
            p.push(el);
        }
        self.ctx.set_paint(c);
        self.ctx.fill_path(&p);
    }

    /// Fill a closed path.
    pub fn fill_path(&mut self, path: &BezPath, color: Rgb8, alpha: f64) {
        let Some(c) = paint_color(color, alpha) else {
            return;
        };
        self.ctx.set_paint(c);
        self.ctx.fill_path(&bezpath_to_cpu(path));
    }

    /// Stroke a path `width` CSS pixels wide.
    pub fn stroke_path(&mut self, path: &BezPath, width: f64, color: Rgb8, alpha: f64) {
        if !width.is_finite() || width <= 0.0 {
            return;
        }
        let Some(c) = paint_color(color, alpha) else {
            return;
        };
        self.ctx.set_paint(c);
        self.ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
        self.ctx.stroke_path(&bezpath_to_cpu(path));
    }
}

fn paint_color(color: Rgb8, alpha: f64) -> Option<vello_cpu::peniko::Color> {
    let a = unit_to_u8(alpha);
    if a == 0 {
        return None;
    }
    Some(vello_cpu::peniko::Color::from_rgba8(
        color.r, color.g, color.b, a,
    ))
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

/// Interpolate straight RGBA8 between the stops bracketing `t`.
pub(crate) fn sample_stops(stops: &[ColorStop], t: f64) -> [u8; 4] {
    let to_px = |s: &ColorStop| [s.color.r, s.color.g, s.color.b, unit_to_u8(s.alpha)];
    let Some(first) = stops.first() else {
        return [0, 0, 0, 0];
    };
    if t <= first.offset {
        return to_px(first);
    }
    for pair in stops.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if t <= b.offset {
            let span = b.offset - a.offset;
            let u = if span > 0.0 { (t - a.offset) / span } else { 1.0 };
            let lerp = |x: u8, y: u8| -> u8 {
                let (x, y) = (f64::from(x), f64::from(y));
                (x + (y - x) * u).round().clamp(0.0, 255.0) as u8
            };
            let alpha = a.alpha + (b.alpha - a.alpha) * u;
            return [
                lerp(a.color.r, b.color.r),
                lerp(a.color.g, b.color.g),
                lerp(a.color.b, b.color.b),
                unit_to_u8(alpha),
            ];
        }
    }
    stops.last().map(to_px).unwrap_or([0, 0, 0, 0])
}

fn byte_len(width: u16, height: u16) -> usize {
    usize::from(width) * usize::from(height) * 4
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
