use super::*;
use crate::foundation::rng::Rng64;

fn engine() -> CircuitEngine {
    CircuitEngine::new(CircuitConfig::default(), Box::new(Rng64::new(9)))
}

#[test]
fn resize_builds_geometry_and_drops_packets() {
    let mut e = engine();
    assert!(e.state().graph.is_empty());
    e.resize(Viewport::new(640.0, 480.0));
    assert!(!e.state().graph.is_empty());

    let cfg = e.config().clone();
    for _ in 0..10 {
        let CircuitState { graph, packets, .. } = e.state_mut();
        let g = graph.clone();
        sim::spawn_packet_from(&g, packets, &cfg, 0, &mut Rng64::new(1));
    }
    assert!(!e.state().packets.is_empty());

    e.resize(Viewport::new(320.0, 240.0));
    assert!(e.state().packets.is_empty());
}

#[test]
fn zero_viewport_gives_empty_graph_and_ticks_fine() {
    let mut e = engine();
    e.resize(Viewport::new(0.0, 0.0));
    assert!(e.state().graph.is_empty());
    for _ in 0..5 {
        e.tick(16.0);
    }
    assert!(e.state().packets.is_empty());
}

#[test]
fn pointer_events_toggle_activity() {
    let mut e = engine();
    e.pointer_move(Point::new(5.0, 6.0));
    assert!(e.state().pointer.active);
    assert_eq!(e.state().pointer.pos, Point::new(5.0, 6.0));
    e.pointer_leave();
    assert!(!e.state().pointer.active);
}

#[test]
fn exposes_layer_opacity_and_subscriptions() {
    let e = engine();
    assert_eq!(e.name(), "circuit");
    assert_eq!(e.layer_opacity(), 0.6);
    assert!(e.subscriptions().contains(&EventKind::PointerLeave));
    assert!(e.subscriptions().contains(&EventKind::Resize));
}

#[test]
fn dpr_does_not_change_css_geometry() {
    let mut a = engine();
    let mut b = engine();
    a.resize(Viewport::new(400.0, 300.0));
    b.resize(Viewport::new(400.0, 300.0).with_dpr(2.0));
    assert_eq!(a.state().graph, b.state().graph);
}
