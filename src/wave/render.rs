use std::f64::consts::{PI, TAU};

use kurbo::BezPath;

use crate::config::{Palette, WaveConfig};
use crate::foundation::core::{Point, Rgb8};
use crate::foundation::error::FxResult;
use crate::render::surface::sample_stops;
use crate::render::{ColorStop, Painter, Surface};
use crate::wave::state::{Ripple, WaveState};

const WHITE: Rgb8 = Rgb8::new(255, 255, 255);
const BACKGROUND_STEP: f64 = 10.0;

/// Paint the wave layer over a transparent surface.
pub fn render(state: &WaveState, cfg: &WaveConfig, surface: &mut Surface) -> FxResult<()> {
    surface.clear();
    if surface.is_empty() {
        return Ok(());
    }
    let palette = cfg.palette;
    let t = state.time;

    surface.paint(|p| {
        for ripple in &state.ripples {
            draw_rings(p, ripple, cfg, &palette, t);
            draw_refraction(p, ripple, cfg, &palette, t);
        }
    })?;

    for ripple in &state.ripples {
        splat_highlights(surface, ripple, cfg, &palette, t);
    }

    for (i, particle) in state.particles.iter().enumerate() {
        let alpha = particle.opacity();
        if alpha <= 0.0 {
            continue;
        }
        let shimmer = (t * 10.0 + i as f64).sin() * 0.5 + 0.5;
        let stops = [
            ColorStop::new(0.0, WHITE, alpha * shimmer),
            ColorStop::new(0.5, palette.accent, alpha * 0.5),
            ColorStop::new(1.0, palette.primary, 0.0),
        ];
        surface.radial_splat(particle.pos, particle.size * 2.0, &stops);
    }

    let viewport = surface.viewport();
    let (width, height) = (viewport.css_width(), viewport.css_height());
    surface.paint(|p| draw_background(p, cfg, &palette, t, width, height))
}

/// Radius offset of ring `ring` at angle `theta`.
pub fn ring_wobble(ripple: &Ripple, ring: u32, theta: f64, t: f64) -> f64 {
    (theta * 4.0 + ripple.phase + t * 3.0 + f64::from(ring) * 0.5).sin()
        * ripple.strength
        * 0.15
        * (1.0 - ripple.progress())
}

fn draw_rings(p: &mut Painter<'_>, ripple: &Ripple, cfg: &WaveConfig, palette: &Palette, t: f64) {
    let alpha = ripple.alpha();
    if alpha <= 0.0 {
        return;
    }
    let rings = cfg.tuning.ring_count.max(1);
    let segments = cfg.tuning.ring_segments.max(3);
    for w in 0..rings {
        let k = f64::from(w) / f64::from(rings);
        let ring_radius = ripple.radius * (0.3 + k * 0.7);
        if ring_radius <= 0.0 {
            continue;
        }
        let ring_alpha = alpha * (1.0 - k * 0.6);
        let width = 2.0 - k * 1.5;
        // Stroke gradient runs from half the ring radius (offset 0) to the ring radius (offset 1).
        let stops = [
            ColorStop::new(0.0, palette.accent, 0.0),
            ColorStop::new(0.7, palette.primary, ring_alpha * 0.3),
            ColorStop::new(1.0, palette.accent, ring_alpha * 0.5),
        ];

        let point_at = |s: u32| -> (Point, f64) {
            let theta = f64::from(s) / f64::from(segments) * TAU;
            let r = ring_radius + ring_wobble(ripple, w, theta, t);
            (
                Point::new(
                    ripple.center.x + theta.cos() * r,
                    ripple.center.y + theta.sin() * r,
                ),
                r,
            )
        };

        let (mut prev, mut prev_r) = point_at(0);
        for s in 1..=segments {
            let (next, next_r) = point_at(s);
            let offset = ((prev_r + next_r) * 0.5 - ring_radius * 0.5) / (ring_radius * 0.5);
            let [r, g, b, a] = sample_stops(&stops, offset);
            let mut seg = BezPath::new();
            seg.move_to(prev);
            seg.line_to(next);
            p.stroke_path(&seg, width, Rgb8::new(r, g, b), f64::from(a) / 255.0);
            prev = next;
            prev_r = next_r;
        }
    }
}

fn draw_refraction(
    p: &mut Painter<'_>,
    ripple: &Ripple,
    cfg: &WaveConfig,
    palette: &Palette,
    t: f64,
) {
    let alpha = ripple.alpha() * 0.25;
    if alpha <= 0.0 {
        return;
    }
    let count = cfg.tuning.refraction_count;
    for i in 0..count {
        let fi = f64::from(i);
        let base = fi / f64::from(count) * TAU + ripple.phase;
        let angle = base + (t * 2.0 + fi).sin() * 0.3;
        let dir = Point::new(angle.cos(), angle.sin()).to_vec2();
        let a = ripple.center + dir * (ripple.radius * 0.2);
        let b = ripple.center + dir * (ripple.radius * 0.9);
        let bend = ripple.strength * 0.3;
        let ctrl = Point::new(
            (a.x + b.x) / 2.0 + (t * 4.0 + fi).sin() * bend,
            (a.y + b.y) / 2.0 + (t * 4.0 + fi).cos() * bend,
        );
        let mut path = BezPath::new();
        path.move_to(a);
        path.quad_to(ctrl, b);
        p.stroke_path(&path, 1.0, palette.accent, alpha);
    }
}

fn splat_highlights(
    surface: &mut Surface,
    ripple: &Ripple,
    cfg: &WaveConfig,
    palette: &Palette,
    t: f64,
) {
    let alpha = ripple.alpha();
    if alpha <= 0.0 {
        return;
    }
    let count = cfg.tuning.highlight_count;
    for h in 0..count {
        let fh = f64::from(h);
        let angle = fh / f64::from(count) * TAU + ripple.phase + t * 2.0;
        let dist = ripple.radius * (0.4 + (t * 5.0 + fh).sin() * 0.2);
        let center = Point::new(
            ripple.center.x + angle.cos() * dist,
            ripple.center.y + angle.sin() * dist,
        );
        let shimmer = (t * 8.0 + fh * 0.7).sin() * 0.5 + 0.5;
        let glint = alpha * shimmer * 0.6;
        let stops = [
            ColorStop::new(0.0, palette.accent, glint),
            ColorStop::new(0.5, WHITE, glint * 0.8),
            ColorStop::new(1.0, palette.accent, 0.0),
        ];
        surface.radial_splat(center, 3.0 + shimmer * 2.0, &stops);
    }
}

fn draw_background(
    p: &mut Painter<'_>,
    cfg: &WaveConfig,
    palette: &Palette,
    t: f64,
    width: f64,
    height: f64,
) {
    for i in 0..cfg.tuning.background_waves {
        let fi = f64::from(i);
        let base_y = height * (0.3 + fi * 0.25);
        let amplitude = 20.0 + fi * 10.0;
        let mut path = BezPath::new();
        path.move_to((0.0, base_y));
        let mut x = 0.0;
        while x <= width {
            let y = base_y + (x * 0.01 + t * (1.0 + fi * 0.3) + fi * PI / 3.0).sin() * amplitude;
            path.line_to((x, y));
            x += BACKGROUND_STEP;
        }
        p.stroke_path(&path, 1.0, palette.accent, cfg.tuning.background_alpha);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/wave/render.rs"]
mod tests;
