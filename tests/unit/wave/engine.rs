use super::*;
use crate::foundation::rng::Rng64;

#[test]
fn pointer_motion_drives_ripples_through_the_engine() {
    let mut e = WaveEngine::new(WaveConfig::default(), Box::new(Rng64::new(1)));
    e.pointer_move(Point::new(0.0, 0.0));
    e.pointer_move(Point::new(5.0, 0.0));
    assert!(e.state().ripples.is_empty());
    e.pointer_move(Point::new(55.0, 0.0));
    assert_eq!(e.state().ripples.len(), 1);

    for _ in 0..200 {
        e.tick(16.0);
    }
    assert!(e.state().ripples.is_empty());
    assert!(e.state().particles.is_empty());
}

#[test]
fn resize_keeps_live_ripples() {
    let mut e = WaveEngine::new(WaveConfig::default(), Box::new(Rng64::new(2)));
    e.pointer_move(Point::new(0.0, 0.0));
    e.pointer_move(Point::new(100.0, 0.0));
    e.resize(Viewport::new(10.0, 10.0));
    assert_eq!(e.state().ripples.len(), 1);
    assert_eq!(e.layer_opacity(), 1.0);
    assert_eq!(e.name(), "wave");
}
