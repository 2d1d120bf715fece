use kurbo::BezPath;

use crate::circuit::sim::{CircuitState, Packet, PacketTone};
use crate::config::{CircuitConfig, Palette};
use crate::foundation::core::{Point, Rect, Rgb8};
use crate::foundation::error::FxResult;
use crate::render::{ColorStop, Painter, Surface};

const BODY_GLOW_ALPHA: f64 = 0.8;
const NODE_GLOW_THRESHOLD: f64 = 0.15;
const NODE_ACCENT_THRESHOLD: f64 = 0.4;

/// Paint the circuit layer at full strength; the caller applies the layer opacity.
///
/// Reads `state` only. Packets or edges whose node indices no longer resolve are skipped.
pub fn render(state: &CircuitState, cfg: &CircuitConfig, surface: &mut Surface) -> FxResult<()> {
    let palette = cfg.palette;
    surface.fill(palette.background);
    if surface.is_empty() {
        return Ok(());
    }

    if state.pointer.active {
        let stops = [
            ColorStop::new(0.0, palette.accent, 0.12),
            ColorStop::new(0.5, palette.primary, 0.05),
            ColorStop::new(1.0, palette.primary, 0.0),
        ];
        surface.radial_splat(state.pointer.pos, cfg.tuning.pointer_glow_radius, &stops);
    }

    surface.paint(|p| draw_edges(p, state, &palette))?;

    let glow_radius = f64::from(cfg.tuning.glow_radius);
    surface.paint_glow(glow_radius, |p| draw_glow(p, state, &palette))?;

    surface.paint(|p| {
        for packet in &state.packets {
            if resolves(state, packet) {
                draw_packet(p, packet, &palette);
            }
        }
        draw_nodes(p, state, &palette);
    })
}

/// Right-angle trace between two node centers, bending at the midpoint of the dominant axis.
pub fn edge_path(a: Point, b: Point) -> BezPath {
    let mid = a.midpoint(b);
    let mut path = BezPath::new();
    path.move_to(a);
    if (a.x - b.x).abs() > (a.y - b.y).abs() {
        path.line_to((mid.x, a.y));
        path.line_to((mid.x, b.y));
    } else {
        path.line_to((a.x, mid.y));
        path.line_to((b.x, mid.y));
    }
    path.line_to(b);
    path
}

/// Current edge length of a node square.
pub fn node_size(energy: f64, time: f64, pulse_phase: f64) -> f64 {
    let pulse = (time * 2.0 + pulse_phase).sin() * 0.5 + 0.5;
    2.5 + energy * 5.0 + pulse * 0.8
}

fn draw_edges(p: &mut Painter<'_>, state: &CircuitState, palette: &Palette) {
    let graph = &state.graph;
    for (i, j) in graph.edges() {
        let (Some(a), Some(b)) = (graph.node(i), graph.node(j)) else {
            continue;
        };
        let e = a.energy.max(b.energy);
        p.stroke_path(
            &edge_path(a.pos, b.pos),
            1.0 + e * 0.5,
            palette.primary,
            0.15 + e * 0.4,
        );
    }
}

fn draw_glow(p: &mut Painter<'_>, state: &CircuitState, palette: &Palette) {
    for packet in &state.packets {
        if resolves(state, packet) {
            p.fill_rect(square(packet.pos, packet.size * 1.5), palette.accent, BODY_GLOW_ALPHA);
        }
    }
    for node in &state.graph.nodes {
        if node.energy > NODE_GLOW_THRESHOLD {
            let size = node_size(node.energy, state.time, node.pulse_phase);
            p.fill_rect(
                square(node.pos, size * 1.5),
                palette.accent,
                BODY_GLOW_ALPHA * node.energy,
            );
        }
    }
}

fn draw_packet(p: &mut Painter<'_>, packet: &Packet, palette: &Palette) {
    let color = tone_color(packet.tone, palette);
    let len = packet.trail.len() as f64;
    for (idx, pt) in packet.trail.iter().enumerate() {
        let k = idx as f64 / len;
        let size = packet.size * (1.0 - k * 0.6);
        p.fill_rect(square(*pt, size), color, (1.0 - k) * 0.7);
    }
    p.fill_rect(square(packet.pos, packet.size), color, 1.0);
}

fn draw_nodes(p: &mut Painter<'_>, state: &CircuitState, palette: &Palette) {
    for node in &state.graph.nodes {
        let size = node_size(node.energy, state.time, node.pulse_phase);
        let (color, alpha) = if node.energy > NODE_ACCENT_THRESHOLD {
            (palette.accent, 1.0)
        } else {
            (palette.primary, 0.35 + node.energy * 0.65)
        };
        p.fill_rect(square(node.pos, size), color, alpha);
    }
}

fn resolves(state: &CircuitState, packet: &Packet) -> bool {
    state.graph.node(packet.from).is_some() && state.graph.node(packet.to).is_some()
}

fn tone_color(tone: PacketTone, palette: &Palette) -> Rgb8 {
    match tone {
        PacketTone::Accent => palette.accent,
        PacketTone::Primary => palette.primary,
    }
}

fn square(center: Point, size: f64) -> Rect {
    let h = size / 2.0;
    Rect::new(center.x - h, center.y - h, center.x + h, center.y + h)
}

#[cfg(test)]
#[path = "../../tests/unit/circuit/render.rs"]
mod tests;
