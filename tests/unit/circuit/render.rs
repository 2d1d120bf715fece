use super::*;
use crate::circuit::graph::{CircuitGraph, Node};
use crate::circuit::sim::Trail;
use crate::foundation::core::Viewport;
use kurbo::PathEl;

fn node(x: f64, y: f64, neighbors: Vec<usize>, energy: f64) -> Node {
    Node {
        pos: Point::new(x, y),
        neighbors,
        energy,
        pulse_phase: 0.0,
    }
}

fn pair_state(energy: f64) -> CircuitState {
    CircuitState::new(CircuitGraph {
        nodes: vec![
            node(10.0, 20.0, vec![1], energy),
            node(70.0, 30.0, vec![0], energy),
        ],
        grid_size: 70.0,
    })
}

fn bg(cfg: &CircuitConfig) -> [u8; 4] {
    let b = cfg.palette.background;
    [b.r, b.g, b.b, 255]
}

#[test]
fn edge_path_bends_on_dominant_axis() {
    let path = edge_path(Point::new(0.0, 0.0), Point::new(100.0, 20.0));
    let pts: Vec<Point> = path
        .elements()
        .iter()
        .map(|el| match *el {
            PathEl::MoveTo(p) | PathEl::LineTo(p) => p,
            _ => panic!("unexpected element"),
        })
        .collect();
    assert_eq!(
        pts,
        vec![
            Point::new(0.0, 0.0),
            Point::new(50.0, 0.0),
            Point::new(50.0, 20.0),
            Point::new(100.0, 20.0),
        ]
    );

    let path = edge_path(Point::new(0.0, 0.0), Point::new(20.0, 100.0));
    assert_eq!(path.elements()[1], PathEl::LineTo(Point::new(0.0, 50.0)));
    assert_eq!(path.elements()[2], PathEl::LineTo(Point::new(20.0, 50.0)));
}

#[test]
fn node_size_grows_with_energy_and_pulse() {
    let trough = 1.5 * std::f64::consts::PI;
    assert!((node_size(0.0, 0.0, trough) - 2.5).abs() < 1e-9);
    assert!((node_size(1.0, 0.0, trough) - 7.5).abs() < 1e-9);
    let peak = 0.5 * std::f64::consts::PI;
    assert!((node_size(0.0, 0.0, peak) - 3.3).abs() < 1e-9);
}

#[test]
fn empty_graph_renders_plain_background() {
    let cfg = CircuitConfig::default();
    let state = CircuitState::new(CircuitGraph::empty());
    let mut s = Surface::new(Viewport::new(16.0, 8.0));
    render(&state, &cfg, &mut s).unwrap();
    let want = bg(&cfg);
    assert!(s.data().chunks_exact(4).all(|px| px == want));
}

#[test]
fn nodes_are_drawn_over_background() {
    let cfg = CircuitConfig::default();
    let state = pair_state(0.8);
    let mut s = Surface::new(Viewport::new(80.0, 40.0));
    render(&state, &cfg, &mut s).unwrap();
    let px = s.pixel(10, 20).unwrap();
    assert_ne!(px, bg(&cfg));
    // A hot node is painted in the accent green.
    assert!(px[1] > 150, "node pixel {px:?}");
    assert_eq!(s.pixel(40, 5), Some(bg(&cfg)));
}

#[test]
fn pointer_glow_only_when_active() {
    let cfg = CircuitConfig::default();
    let mut state = CircuitState::new(CircuitGraph::empty());
    state.pointer.pos = Point::new(50.0, 50.0);

    let mut s = Surface::new(Viewport::new(400.0, 400.0));
    render(&state, &cfg, &mut s).unwrap();
    assert_eq!(s.pixel(50, 50), Some(bg(&cfg)));

    state.pointer.active = true;
    render(&state, &cfg, &mut s).unwrap();
    let lit = s.pixel(50, 50).unwrap();
    assert!(lit[1] > bg(&cfg)[1]);
    // Outside the 150 px glow radius.
    assert_eq!(s.pixel(300, 300), Some(bg(&cfg)));
}

#[test]
fn dangling_packets_are_skipped() {
    let cfg = CircuitConfig::default();
    let mut state = pair_state(0.0);
    state.packets.push(Packet {
        from: 0,
        to: 5,
        progress: 0.5,
        speed: 0.01,
        tone: PacketTone::Accent,
        size: 4.0,
        pos: Point::new(60.0, 5.0),
        trail: Trail::new(15),
    });
    let mut s = Surface::new(Viewport::new(80.0, 40.0));
    render(&state, &cfg, &mut s).unwrap();
    assert_eq!(s.pixel(60, 5), Some(bg(&cfg)));
}

#[test]
fn degenerate_surface_is_a_no_op() {
    let cfg = CircuitConfig::default();
    let state = pair_state(0.5);
    let mut s = Surface::new(Viewport::new(0.0, 0.0));
    render(&state, &cfg, &mut s).unwrap();
    assert!(s.data().is_empty());
}
