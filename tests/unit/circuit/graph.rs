use super::*;
use crate::foundation::rng::{Rng64, ScriptedRandom};
use std::collections::HashSet;

fn assert_structural_invariants(g: &CircuitGraph) {
    for (i, n) in g.nodes.iter().enumerate() {
        assert!(!n.neighbors.is_empty(), "node {i} is isolated");
        let mut seen = HashSet::new();
        for &j in &n.neighbors {
            assert!(j < g.len(), "node {i} refers to pruned index {j}");
            assert_ne!(i, j, "self loop at {i}");
            assert!(seen.insert(j), "duplicate neighbor {j} at {i}");
            assert!(
                g.nodes[j].neighbors.contains(&i),
                "edge {i}->{j} is not symmetric"
            );
        }
    }
}

#[test]
fn built_graphs_are_connected_symmetric_and_in_range() {
    let cfg = CircuitConfig::default();
    for seed in 0..16u64 {
        let mut rng = Rng64::new(seed);
        let g = build_graph(800.0, 600.0, &cfg, &mut rng);
        assert!(!g.is_empty());
        assert_structural_invariants(&g);
    }
}

#[test]
fn dense_graphs_keep_invariants() {
    let cfg = CircuitConfig {
        density: 3.0,
        ..CircuitConfig::default()
    };
    let mut rng = Rng64::new(42);
    let g = build_graph(640.0, 360.0, &cfg, &mut rng);
    assert_eq!(g.grid_size, 23.0);
    assert_structural_invariants(&g);
}

#[test]
fn square_surface_positions_stay_within_margin() {
    let cfg = CircuitConfig::default();
    let mut rng = Rng64::new(7);
    let g = build_graph(1000.0, 1000.0, &cfg, &mut rng);
    let grid = g.grid_size;
    assert!(!g.is_empty());
    let lo = -grid * 0.25;
    let hi = 1000.0 + grid * 1.25;
    for n in &g.nodes {
        assert!(n.pos.x >= lo && n.pos.x <= hi, "x out of bounds: {}", n.pos.x);
        assert!(n.pos.y >= lo && n.pos.y <= hi, "y out of bounds: {}", n.pos.y);
        assert!((0.0..=cfg.tuning.initial_energy).contains(&n.energy));
        assert!((0.0..std::f64::consts::TAU).contains(&n.pulse_phase));
    }
}

#[test]
fn degenerate_surfaces_yield_empty_graphs() {
    let cfg = CircuitConfig::default();
    let mut rng = Rng64::new(1);
    for (w, h) in [
        (0.0, 0.0),
        (0.0, 900.0),
        (900.0, 0.0),
        (-5.0, 100.0),
        (f64::NAN, 100.0),
        (0.4, 0.4),
    ] {
        let g = build_graph(w, h, &cfg, &mut rng);
        assert!(g.is_empty(), "{w}x{h} produced {} nodes", g.len());
        assert_eq!(g.edge_count(), 0);
    }
}

#[test]
fn same_seed_same_graph_different_seed_different_graph() {
    let cfg = CircuitConfig::default();
    let a = build_graph(500.0, 400.0, &cfg, &mut Rng64::new(3));
    let b = build_graph(500.0, 400.0, &cfg, &mut Rng64::new(3));
    let c = build_graph(500.0, 400.0, &cfg, &mut Rng64::new(4));
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn always_keep_source_builds_full_eight_neighborhood_mesh() {
    let cfg = CircuitConfig::default();
    // 0.0 keeps every odd cell and every eligible edge; jitter shifts all nodes equally.
    let mut rng = ScriptedRandom::constant(0.0);
    let g = build_graph(140.0, 70.0, &cfg, &mut rng);
    assert_eq!(g.len(), 6);
    // 4 horizontal + 3 vertical + 4 diagonal.
    assert_eq!(g.edge_count(), 11);
    assert_structural_invariants(&g);
    let corner = &g.nodes[0];
    assert_eq!(corner.neighbors.len(), 3);
    assert!((corner.pos.x + 70.0 * 0.125).abs() < 1e-9);
}

#[test]
fn never_connect_source_prunes_everything() {
    let cfg = CircuitConfig::default();
    let mut rng = ScriptedRandom::constant(0.99);
    let g = build_graph(700.0, 700.0, &cfg, &mut rng);
    assert!(g.is_empty());
}
