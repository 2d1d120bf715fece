use super::*;
use crate::foundation::core::Viewport;
use crate::wave::state::Particle;

fn alpha_sum(s: &Surface) -> u64 {
    s.data().chunks_exact(4).map(|px| u64::from(px[3])).sum()
}

fn ripple(age: u32) -> Ripple {
    Ripple {
        center: Point::new(100.0, 100.0),
        radius: 60.0,
        strength: 30.0,
        age,
        max_age: 180,
        phase: 0.0,
    }
}

#[test]
fn idle_layer_only_carries_faint_background_lines() {
    let cfg = WaveConfig::default();
    let state = WaveState::new();
    let mut s = Surface::new(Viewport::new(200.0, 400.0));
    render(&state, &cfg, &mut s).unwrap();
    assert_eq!(s.pixel(100, 2), Some([0, 0, 0, 0]));
    let max_a = s.data().chunks_exact(4).map(|px| px[3]).max().unwrap();
    assert!(max_a > 0 && max_a <= 8, "background alpha {max_a}");
}

#[test]
fn ripples_and_particles_add_ink() {
    let cfg = WaveConfig::default();
    let mut s = Surface::new(Viewport::new(200.0, 200.0));
    let mut state = WaveState::new();
    render(&state, &cfg, &mut s).unwrap();
    let idle = alpha_sum(&s);

    state.ripples.push_back(ripple(10));
    render(&state, &cfg, &mut s).unwrap();
    let with_ripple = alpha_sum(&s);
    assert!(with_ripple > idle);

    state.particles.push_back(Particle {
        pos: Point::new(20.0, 20.0),
        vel: crate::foundation::core::Vec2::ZERO,
        life: 40.0,
        max_life: 80.0,
        size: 3.0,
    });
    render(&state, &cfg, &mut s).unwrap();
    assert!(s.pixel(20, 20).unwrap()[3] > 0);
}

#[test]
fn faded_ripples_draw_nothing() {
    let cfg = WaveConfig::default();
    let mut s = Surface::new(Viewport::new(200.0, 200.0));
    let mut state = WaveState::new();
    render(&state, &cfg, &mut s).unwrap();
    let idle = s.data().to_vec();
    state.ripples.push_back(ripple(180));
    render(&state, &cfg, &mut s).unwrap();
    assert_eq!(s.data(), &idle[..]);
}

#[test]
fn wobble_vanishes_at_end_of_life() {
    let r = ripple(180);
    for ring in 0..5 {
        assert_eq!(ring_wobble(&r, ring, 1.0, 2.0), 0.0);
    }
    let young = ripple(0);
    let w = ring_wobble(&young, 0, 0.0, 0.0);
    assert!(w.abs() <= young.strength * 0.15);
}

#[test]
fn rendering_is_repeatable() {
    let cfg = WaveConfig::default();
    let mut state = WaveState::new();
    state.ripples.push_back(ripple(30));
    state.time = 1.25;
    let mut a = Surface::new(Viewport::new(160.0, 120.0).with_dpr(1.5));
    let mut b = Surface::new(Viewport::new(160.0, 120.0).with_dpr(1.5));
    render(&state, &cfg, &mut a).unwrap();
    render(&state, &cfg, &mut b).unwrap();
    assert_eq!(a.data(), b.data());
}

#[test]
fn degenerate_surface_is_a_no_op() {
    let cfg = WaveConfig::default();
    let mut state = WaveState::new();
    state.ripples.push_back(ripple(1));
    let mut s = Surface::new(Viewport::new(50.0, 0.0));
    render(&state, &cfg, &mut s).unwrap();
}
