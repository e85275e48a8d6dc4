use approx::assert_relative_eq;

use super::*;
use crate::tests::init_logger;

#[test]
fn powered_bound_is_floored() {
    // v dt cancels 0.5 a dt^2
    let dt = 0.02;
    let bound = powered_bound(-0.5 * -10.0 * dt, -10.0, dt, 0.5);
    assert_relative_eq!(bound, 0.5);

    let bound = powered_bound(100.0, 30.0, dt, 0.5);
    assert_relative_eq!(bound, 100.0 * dt + 0.5 * 30.0 * dt * dt, epsilon = 1e-6);
}

#[test]
fn coasting_bound_decays() {
    let first = coasting_physical_bound(100.0, 1, 0.02, 8.0, 0.05);
    let later = coasting_physical_bound(100.0, 400, 0.02, 8.0, 0.05);
    assert_relative_eq!(first, 100.0 * libm::expf(-0.0025) * 0.02, epsilon = 1e-6);
    assert!(later < first);
    assert_relative_eq!(later, 2.0 * libm::expf(-1.0), epsilon = 1e-5);

    // negative burnout velocity falls back to the floor
    assert_relative_eq!(coasting_physical_bound(-3.0, 1, 0.02, 8.0, 0.05), 0.05);
}

#[test]
fn hybrid_bound_takes_tighter() {
    assert_relative_eq!(coasting_limit(0.3, 0.25), 0.25);
    assert_relative_eq!(coasting_limit(0.25, 0.3), 0.25);
    assert_relative_eq!(adaptive_bound(0.1, 1.5, 0.1), 0.25, epsilon = 1e-6);
}

#[test]
fn hybrid_bound_applied_in_coasting_step() {
    init_logger();
    let config = FlightConfig {
        dt: 0.01,
        min_coast_delta: 0.3,
        adaptive_weight: 1.0,
        adaptive_bias: 0.25,
        ..Default::default()
    };

    // physical floored to 0.3, adaptive 0.25
    let mut gate = AltitudeGate::new(0.0);
    let outcome = gate.coasting_step(10.0, 0.0, 1, &config);
    assert!(!outcome.accepted);
    assert_relative_eq!(outcome.limit, 0.25);
    assert_relative_eq!(gate.validated_altitude(), 0.25);

    // adaptive now 0.5, physical floored to 0.3
    let outcome = gate.coasting_step(10.0, 0.0, 2, &config);
    assert_relative_eq!(outcome.limit, 0.3);
    assert_relative_eq!(gate.validated_altitude(), 0.55, epsilon = 1e-6);
}

#[test]
fn powered_step_integrates_velocity() {
    let config = FlightConfig::default();
    let mut gate = AltitudeGate::new(0.0);
    for n in 1..=200 {
        gate.powered_step(0.0, 5.0, &config);
        assert_relative_eq!(gate.velocity(), 5.0 * 0.02 * n as f32, epsilon = 1e-3);
    }
}

#[test]
fn powered_step_accepts_plausible_reading() {
    let config = FlightConfig::default();
    let mut gate = AltitudeGate::new(100.0);
    let outcome = gate.powered_step(100.3, 30.0, &config);
    assert!(outcome.accepted);
    assert_relative_eq!(gate.validated_altitude(), 100.3);
    assert_relative_eq!(gate.last_accepted_delta(), 0.3, epsilon = 1e-4);
}

#[test]
fn powered_step_clamps_baro_spike() {
    let config = FlightConfig::default();
    let mut gate = AltitudeGate::new(100.0);
    let outcome = gate.powered_step(180.0, 30.0, &config);
    assert!(!outcome.accepted);
    // v = 0.6 m/s after one step, bound floored at 0.5
    assert_relative_eq!(outcome.limit, 0.5);
    assert_relative_eq!(gate.validated_altitude(), 100.5);
    assert_relative_eq!(gate.last_accepted_delta(), 0.5);
    assert_relative_eq!(gate.raw_altitude(), 180.0);
}

#[test]
fn rejected_drop_still_projects_upwards() {
    let config = FlightConfig::default();
    let mut gate = AltitudeGate::new(100.0);
    let outcome = gate.powered_step(20.0, 30.0, &config);
    assert!(!outcome.accepted);
    assert!(outcome.signed_delta > 0.0);
    assert!(gate.validated_altitude() > 100.0);
}

#[test]
fn coasting_step_keeps_sign_of_accepted_delta() {
    let config = FlightConfig::default();
    let mut gate = AltitudeGate::new(500.0);
    gate.coasting_step(500.1, 50.0, 1, &config);
    let outcome = gate.coasting_step(500.0, 50.0, 2, &config);
    assert!(outcome.accepted);
    assert_relative_eq!(outcome.signed_delta, -0.1, epsilon = 1e-3);
    assert_relative_eq!(gate.last_accepted_delta(), 0.1, epsilon = 1e-3);
}

#[test]
fn coasting_velocity_decays_by_gravity_only() {
    let config = FlightConfig::default();
    let mut gate = AltitudeGate::new(0.0);
    for _ in 0..50 {
        gate.powered_step(0.0, 100.0, &config);
    }
    let burnout_velocity = gate.velocity();
    for k in 1..=10 {
        gate.coasting_step(0.0, burnout_velocity, k, &config);
    }
    assert_relative_eq!(
        gate.velocity(),
        burnout_velocity - 10.0 * config.gravity * config.dt,
        epsilon = 1e-3
    );
}

#[test]
fn reseed_discards_history() {
    let config = FlightConfig::default();
    let mut gate = AltitudeGate::new(0.0);
    gate.powered_step(0.2, 50.0, &config);
    gate.reseed(3.0);
    assert_eq!(gate.validated_altitude(), 3.0);
    assert_eq!(gate.velocity(), 0.0);
    assert_eq!(gate.max_altitude(), 3.0);
}

#[test]
fn tracks_max_altitude() {
    let config = FlightConfig::default();
    let mut gate = AltitudeGate::new(0.0);
    for raw in [0.1, 0.2, 0.3, 0.25, 0.2] {
        gate.coasting_step(raw, 50.0, 1, &config);
    }
    assert_relative_eq!(gate.max_altitude(), 0.3);
    assert_relative_eq!(gate.validated_altitude(), 0.2);
}
