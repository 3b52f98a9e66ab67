//! Integration tests for the sensor calibration pipeline
//!
//! Exercises the full acquisition flow - calibrate, validate, derive, store,
//! health-score, fault-scan - plus the calibration workflow and diagnostics,
//! and checks the health-score bound as a property over arbitrary sample
//! sequences.

mod common;

use proptest::prelude::*;

use common::{electrical_sample, pack_location, sample};
use thermoguard_core::constants::buffers::READING_HISTORY;
use thermoguard_core::{RawSample, SensorError, SensorRegistry, SensorSpec};

#[test]
fn submit_then_diagnostics_round_trip() {
    let mut registry = SensorRegistry::new();
    registry
        .register("te_pack_a_01", pack_location(), None, None)
        .unwrap();

    let reading = registry
        .submit_reading("te_pack_a_01", electrical_sample(1_000, 1.5, 12.0))
        .unwrap();
    assert_eq!(reading.power_w, 18.0);

    let diag = registry.diagnostics("te_pack_a_01").unwrap();
    let last = diag.last.unwrap();

    // The snapshot reports exactly what was derived
    assert_eq!(last, reading);
    assert_eq!(last.power_w, last.current_a * last.voltage_v);
    assert_eq!(diag.recent.len(), 1);
    assert_eq!(diag.mean_power_w, 18.0);
    assert_eq!(diag.mean_current_a, 1.5);
    assert_eq!(diag.error_count, 0);
}

#[test]
fn calibration_corrects_a_biased_sensor() {
    let mut registry = SensorRegistry::new();
    registry
        .register("te_pack_a_01", pack_location(), None, None)
        .unwrap();

    // Sensor reads 10% high on current and 2°C low
    let raw = RawSample {
        timestamp: 1_000,
        current_a: 1.1,
        voltage_v: 12.0,
        temperature_c: 40.0,
        resistance_ohm: 10.0,
        signal_quality: 0.97,
    };
    registry.submit_reading("te_pack_a_01", raw).unwrap();

    // Reference instrument says 1.0 A / 12.0 V / 42.0°C
    let record = registry
        .calibrate("te_pack_a_01", 42.0, 1.0, 12.0)
        .unwrap();
    assert!((record.after.current_multiplier - 1.0 / 1.1).abs() < 1e-6);
    assert_eq!(record.after.temperature_offset, 2.0);

    // The same raw input now reproduces the reference
    let corrected = registry
        .submit_reading("te_pack_a_01", RawSample { timestamp: 2_000, ..raw })
        .unwrap();
    assert!((corrected.current_a - 1.0).abs() < 1e-6);
    assert!((corrected.temperature_c - 42.0).abs() < 1e-6);
}

#[test]
fn calibration_at_reference_point_is_idempotent() {
    let mut registry = SensorRegistry::new();
    registry
        .register("te_pack_a_01", pack_location(), None, None)
        .unwrap();

    let reading = registry
        .submit_reading("te_pack_a_01", sample(1_000, 45.0))
        .unwrap();
    let before = registry.get("te_pack_a_01").unwrap().calibration;

    // Reference exactly equals the last reading: nothing to correct
    let record = registry
        .calibrate(
            "te_pack_a_01",
            reading.temperature_c,
            reading.current_a,
            reading.voltage_v,
        )
        .unwrap();

    assert_eq!(record.after, before);
    assert_eq!(registry.get("te_pack_a_01").unwrap().calibration, before);
}

#[test]
fn overcurrent_sample_is_rejected_without_side_effects() {
    let spec = SensorSpec {
        max_current_a: 2.0,
        ..SensorSpec::default()
    };
    let mut registry = SensorRegistry::new();
    registry
        .register("te_pack_a_01", pack_location(), Some(spec), None)
        .unwrap();
    registry
        .submit_reading("te_pack_a_01", electrical_sample(1_000, 1.0, 12.0))
        .unwrap();

    let before_health = registry.get("te_pack_a_01").unwrap().status.health;

    let err = registry
        .submit_reading("te_pack_a_01", electrical_sample(2_000, 2.5, 12.0))
        .unwrap_err();
    assert!(matches!(err, SensorError::OutOfRange { .. }));

    let sensor = registry.get("te_pack_a_01").unwrap();
    assert_eq!(sensor.last_reading.unwrap().timestamp, 1_000);
    assert_eq!(sensor.status.health, before_health);
    assert_eq!(sensor.history.len(), 1);
}

#[test]
fn history_evicts_beyond_cap() {
    let mut registry = SensorRegistry::new();
    registry
        .register("te_pack_a_01", pack_location(), None, None)
        .unwrap();

    for i in 0..(READING_HISTORY as u64 + 10) {
        registry
            .submit_reading("te_pack_a_01", sample(i * 1_000, 45.0))
            .unwrap();
    }

    let sensor = registry.get("te_pack_a_01").unwrap();
    assert_eq!(sensor.history.len(), READING_HISTORY);
    // Newest survives, the first ten were evicted
    assert_eq!(
        sensor.last_reading.unwrap().timestamp,
        (READING_HISTORY as u64 + 9) * 1_000
    );
}

#[test]
fn register_unregister_lifecycle() {
    let mut registry = SensorRegistry::new();
    registry
        .register("te_pack_a_01", pack_location(), None, None)
        .unwrap();
    registry
        .submit_reading("te_pack_a_01", sample(1_000, 45.0))
        .unwrap();
    assert_eq!(registry.len(), 1);

    registry.unregister("te_pack_a_01").unwrap();
    assert!(registry.is_empty());
    assert_eq!(
        registry.submit_reading("te_pack_a_01", sample(2_000, 45.0)),
        Err(SensorError::NotFound)
    );

    // Id becomes free again, with a clean history
    registry
        .register("te_pack_a_01", pack_location(), None, None)
        .unwrap();
    assert!(registry.get("te_pack_a_01").unwrap().history.is_empty());
}

#[test]
fn degraded_quality_drags_health_down() {
    let mut registry = SensorRegistry::new();
    registry
        .register("te_pack_a_01", pack_location(), None, None)
        .unwrap();

    let mut noisy = sample(1_000, 45.0);
    noisy.signal_quality = 0.6;
    registry.submit_reading("te_pack_a_01", noisy).unwrap();

    let status = &registry.get("te_pack_a_01").unwrap().status;
    assert!(status.health <= 0.6 + 1e-6);
    // health < 0.7 flags maintenance
    assert!(status.maintenance_required);
}

proptest! {
    /// Health stays in [0, 1] for any sequence of samples, accepted or not
    #[test]
    fn health_always_in_unit_interval(
        samples in prop::collection::vec(
            (0.0f32..6.0, 0.0f32..60.0, -60.0f32..140.0, 0.0f32..1.0),
            1..60,
        )
    ) {
        let mut registry = SensorRegistry::new();
        registry.register("te", pack_location(), None, None).unwrap();

        let mut timestamp = 0u64;
        for (current_a, voltage_v, temperature_c, signal_quality) in samples {
            timestamp += 1_000;
            let _ = registry.submit_reading(
                "te",
                RawSample {
                    timestamp,
                    current_a,
                    voltage_v,
                    temperature_c,
                    resistance_ohm: 10.0,
                    signal_quality,
                },
            );

            let health = registry.get("te").unwrap().status.health;
            prop_assert!((0.0..=1.0).contains(&health), "health {} out of bounds", health);
        }
    }
}
