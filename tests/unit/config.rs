use super::*;

#[test]
fn defaults_validate() {
    CircuitConfig::default().validate().unwrap();
    WaveConfig::default().validate().unwrap();
    NoiseConfig::default().validate().unwrap();
    ScanlineConfig::default().validate().unwrap();
}

#[test]
fn derived_circuit_values_follow_density_and_speed() {
    let cfg = CircuitConfig::default();
    assert_eq!(cfg.grid_size(), 70.0);
    assert_eq!(cfg.packet_cap(), 80);
    assert!((cfg.ambient_spawn_probability() - 0.05).abs() < 1e-12);

    let cfg = CircuitConfig {
        density: 2.0,
        speed: 0.5,
        ..CircuitConfig::default()
    };
    assert_eq!(cfg.grid_size(), 35.0);
    assert_eq!(cfg.packet_cap(), 160);
    assert!((cfg.ambient_spawn_probability() - 0.05).abs() < 1e-12);

    let cfg = CircuitConfig {
        density: 0.5,
        ..CircuitConfig::default()
    };
    assert_eq!(cfg.grid_size(), 140.0);
    assert_eq!(cfg.packet_cap(), 40);
}

#[test]
fn invalid_values_are_rejected() {
    let bad = CircuitConfig {
        density: 0.0,
        ..CircuitConfig::default()
    };
    assert!(bad.validate().is_err());

    let bad = CircuitConfig {
        opacity: 1.5,
        ..CircuitConfig::default()
    };
    assert!(bad.validate().is_err());

    let mut bad = CircuitConfig::default();
    bad.tuning.energy_decay = 1.0;
    assert!(bad.validate().is_err());

    let bad = WaveConfig {
        max_ripples: 0,
        ..WaveConfig::default()
    };
    assert!(bad.validate().is_err());

    let bad = ScanlineConfig {
        line_height: 0.0,
        ..ScanlineConfig::default()
    };
    assert!(bad.validate().is_err());
}

#[test]
fn partial_json_fills_defaults() {
    let cfg: CircuitConfig = serde_json::from_str(r#"{ "density": 2.0 }"#).unwrap();
    assert_eq!(cfg.density, 2.0);
    assert_eq!(cfg.opacity, 0.6);
    assert_eq!(cfg.tuning.trail_capacity, 15);

    let cfg: WaveConfig =
        serde_json::from_str(r#"{ "max_ripples": 3, "tuning": { "max_age": 10 } }"#).unwrap();
    assert_eq!(cfg.max_ripples, 3);
    assert_eq!(cfg.tuning.max_age, 10);
    assert_eq!(cfg.tuning.ring_count, 5);
}
