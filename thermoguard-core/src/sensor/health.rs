//! Health Scoring and Fault Scanning
//!
//! Both functions here are pure: no side effects, no stored state. The fault
//! set in particular is recomputed from scratch on every reading rather than
//! maintained incrementally - the set always reflects exactly the latest
//! reading against the spec, and the function can be tested in isolation.
//!
//! ## Health Score
//!
//! The score starts at 1.0 on every update and is multiplied down:
//!
//! ```text
//! score = quality
//!       x 0.9  if current- or temperature-variance over the last 10
//!              readings exceeds its limit (needs >= 10 readings)
//!       x max(0.5, 1 - 0.1 x error_count)
//!       x age derating (linear 1.0 -> 0.5 across the design life)
//! ```
//!
//! clamped to [0, 1]. Monotone in every penalty input: more errors, worse
//! quality, higher variance or higher age never raise the score.

use crate::buffer::History;
use crate::constants::health::{
    AGE_DERATING_FLOOR, CURRENT_VARIANCE_LIMIT_A2, DESIGN_LIFE_HOURS, ERROR_PENALTY_FLOOR,
    ERROR_PENALTY_PER_ERROR, TEMPERATURE_VARIANCE_LIMIT_C2, VARIANCE_PENALTY, VARIANCE_WINDOW,
};
use crate::constants::limits::{
    HIGH_TEMPERATURE_FRACTION, LOW_QUALITY_THRESHOLD, OVERCURRENT_FRACTION,
    RESISTANCE_DRIFT_FRACTION,
};

use super::{FaultCode, FaultSet, Reading, SensorSpec};

/// Compute the health score for a sensor after a new reading
///
/// `reading` is the just-accepted reading (already in `history`),
/// `error_count` the cumulative communication-error count and
/// `operating_hours` the accumulated service time.
pub fn health_score<const N: usize>(
    reading: &Reading,
    history: &History<Reading, N>,
    error_count: u32,
    operating_hours: f32,
) -> f32 {
    let mut score = reading.signal_quality;

    if history.len() >= VARIANCE_WINDOW {
        let current_var = window_variance(history, |r| r.current_a);
        let temperature_var = window_variance(history, |r| r.temperature_c);

        if current_var > CURRENT_VARIANCE_LIMIT_A2
            || temperature_var > TEMPERATURE_VARIANCE_LIMIT_C2
        {
            score *= VARIANCE_PENALTY;
        }
    }

    score *= (1.0 - error_count as f32 * ERROR_PENALTY_PER_ERROR).max(ERROR_PENALTY_FLOOR);
    score *= age_derating(operating_hours);

    score.clamp(0.0, 1.0)
}

/// Age multiplier: linear from 1.0 at zero hours to the floor at end of
/// design life, constant beyond.
pub fn age_derating(operating_hours: f32) -> f32 {
    let used = (operating_hours / DESIGN_LIFE_HOURS).clamp(0.0, 1.0);
    1.0 - (1.0 - AGE_DERATING_FLOOR) * used
}

/// Population variance of a field over the most recent window
pub(crate) fn window_variance<const N: usize>(
    history: &History<Reading, N>,
    field: impl Fn(&Reading) -> f32 + Copy,
) -> f32 {
    let n = history.len().min(VARIANCE_WINDOW);
    if n == 0 {
        return 0.0;
    }

    let mean = history.recent(VARIANCE_WINDOW).map(field).sum::<f32>() / n as f32;
    history
        .recent(VARIANCE_WINDOW)
        .map(field)
        .map(|v| {
            let d = v - mean;
            d * d
        })
        .sum::<f32>()
        / n as f32
}

/// Recompute the reading-derived fault set from scratch
///
/// Checks the latest reading against spec fractions; communication faults
/// are not this function's concern (they are maintained by the
/// error-reporting path).
pub fn fault_scan(reading: &Reading, spec: &SensorSpec) -> FaultSet {
    let mut faults = FaultSet::new();

    if reading.temperature_c > spec.max_temperature_c * HIGH_TEMPERATURE_FRACTION {
        let _ = faults.insert(FaultCode::HighTemperature);
    }

    if reading.current_a > spec.max_current_a * OVERCURRENT_FRACTION {
        let _ = faults.insert(FaultCode::Overcurrent);
    }

    if reading.signal_quality < LOW_QUALITY_THRESHOLD {
        let _ = faults.insert(FaultCode::LowSignalQuality);
    }

    let drift = libm::fabsf(reading.resistance_ohm - spec.nominal_resistance_ohm);
    if drift > spec.nominal_resistance_ohm * RESISTANCE_DRIFT_FRACTION {
        let _ = faults.insert(FaultCode::ResistanceDrift);
    }

    faults
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(current: f32, temperature: f32, quality: f32) -> Reading {
        Reading {
            timestamp: 0,
            current_a: current,
            voltage_v: 12.0,
            temperature_c: temperature,
            resistance_ohm: 10.0,
            power_w: current * 12.0,
            gradient_c_per_s: 0.0,
            signal_quality: quality,
        }
    }

    #[test]
    fn perfect_sensor_scores_one() {
        let mut history: History<Reading, 20> = History::new();
        let r = reading(1.0, 40.0, 1.0);
        history.push(r);

        assert_eq!(health_score(&r, &history, 0, 0.0), 1.0);
    }

    #[test]
    fn quality_scales_score() {
        let mut history: History<Reading, 20> = History::new();
        let r = reading(1.0, 40.0, 0.8);
        history.push(r);

        assert!((health_score(&r, &history, 0, 0.0) - 0.8).abs() < 1e-6);
    }

    #[test]
    fn unstable_temperature_penalized() {
        let mut history: History<Reading, 20> = History::new();
        // Alternate ±4°C: variance 16°C², far over the limit
        for i in 0..12 {
            let t = if i % 2 == 0 { 36.0 } else { 44.0 };
            history.push(reading(1.0, t, 1.0));
        }
        let r = reading(1.0, 44.0, 1.0);

        let score = health_score(&r, &history, 0, 0.0);
        assert!((score - VARIANCE_PENALTY).abs() < 1e-6);
    }

    #[test]
    fn error_penalty_floors_at_half() {
        let mut history: History<Reading, 20> = History::new();
        let r = reading(1.0, 40.0, 1.0);
        history.push(r);

        // 3 errors: x0.7
        assert!((health_score(&r, &history, 3, 0.0) - 0.7).abs() < 1e-6);
        // 20 errors would be x-1.0 unfloored; floor holds at 0.5
        assert!((health_score(&r, &history, 20, 0.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn age_derating_is_linear_to_floor() {
        assert_eq!(age_derating(0.0), 1.0);
        let half_life = DESIGN_LIFE_HOURS / 2.0;
        assert!((age_derating(half_life) - 0.75).abs() < 1e-6);
        assert_eq!(age_derating(DESIGN_LIFE_HOURS), AGE_DERATING_FLOOR);
        // Beyond design life stays at the floor
        assert_eq!(age_derating(DESIGN_LIFE_HOURS * 3.0), AGE_DERATING_FLOOR);
    }

    #[test]
    fn fault_scan_flags_each_condition() {
        let spec = SensorSpec::default();

        // Clean reading: no faults
        assert!(fault_scan(&reading(1.0, 40.0, 1.0), &spec).is_empty());

        // 91% of max temperature
        let hot = reading(1.0, spec.max_temperature_c * 0.91, 1.0);
        assert!(fault_scan(&hot, &spec).contains(&FaultCode::HighTemperature));

        // 95% of max current
        let loaded = reading(spec.max_current_a * 0.95, 40.0, 1.0);
        assert!(fault_scan(&loaded, &spec).contains(&FaultCode::Overcurrent));

        // Poor signal
        let noisy = reading(1.0, 40.0, 0.3);
        assert!(fault_scan(&noisy, &spec).contains(&FaultCode::LowSignalQuality));

        // Drifted resistance
        let mut drifted = reading(1.0, 40.0, 1.0);
        drifted.resistance_ohm = spec.nominal_resistance_ohm * 1.3;
        assert!(fault_scan(&drifted, &spec).contains(&FaultCode::ResistanceDrift));
    }
}
