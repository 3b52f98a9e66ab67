//! Sensor Registry - the Owning Table and its Operations
//!
//! ## Overview
//!
//! The registry owns every [`Sensor`] and is the only code that mutates one.
//! All operations are synchronous, bounded-time calls driven by the external
//! data-acquisition loop; side effects are confined to the target sensor, so
//! the caller serializes per-sensor updates and nothing else. Worst case is
//! O(history window) for the variance pass.
//!
//! ## Submit Pipeline
//!
//! `submit_reading` runs the full acquisition pipeline: calibrate, validate
//! against the spec envelope, derive power/resistance/gradient, store,
//! re-score health and re-scan faults. Validation precedes every mutation -
//! a rejected sample leaves history, last reading and health untouched.

use heapless::FnvIndexMap;

use crate::config::RegistryConfig;
use crate::constants::buffers::{CALIBRATION_LOG, MAX_SENSORS};
use crate::constants::health::{
    MAINTENANCE_FAULT_COUNT, MAINTENANCE_HEALTH_THRESHOLD, OPERATIONAL_HEALTH_FLOOR,
    OPERATIONAL_QUALITY_FLOOR, VARIANCE_WINDOW,
};
use crate::constants::limits::{MIN_CURRENT_A, RANGE_TOLERANCE, TEMP_VALIDATION_MARGIN_C};
use crate::constants::time::{MS_PER_HOUR_F32, MS_PER_SECOND};
use crate::errors::{ReadingField, SensorError, SensorResult};
use crate::events::Id;

use super::calibration::{CalibrationCoefficients, CalibrationRecord, ReferencePoint};
use super::health;
use super::{FaultCode, FaultSet, RawSample, Reading, Sensor, SensorLocation, SensorSpec};

/// Side-effect-free snapshot returned by [`SensorRegistry::diagnostics`]
#[derive(Debug, Clone)]
pub struct SensorDiagnostics {
    /// Most recent accepted reading
    pub last: Option<Reading>,
    /// The newest readings, oldest first
    pub recent: heapless::Vec<Reading, VARIANCE_WINDOW>,
    /// Rolling mean current (A) over the recent window
    pub mean_current_a: f32,
    /// Rolling mean voltage (V)
    pub mean_voltage_v: f32,
    /// Rolling mean temperature (°C)
    pub mean_temperature_c: f32,
    /// Rolling mean power (W)
    pub mean_power_w: f32,
    /// Temperature standard deviation over the recent window
    pub stddev_temperature_c: f32,
    /// Calibration history, oldest first
    pub calibrations: heapless::Vec<CalibrationRecord, CALIBRATION_LOG>,
    /// Cumulative communication-error count
    pub error_count: u32,
    /// Current health score
    pub health: f32,
    /// Accumulated operating hours
    pub operating_hours: f32,
    /// Active fault codes
    pub faults: FaultSet,
}

/// Owning table of sensing elements, keyed by id
pub struct SensorRegistry {
    sensors: FnvIndexMap<Id, Sensor, MAX_SENSORS>,
    config: RegistryConfig,
}

impl SensorRegistry {
    /// Create a registry with default configuration
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create a registry with explicit configuration
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            sensors: FnvIndexMap::new(),
            config,
        }
    }

    /// Register a new sensor
    ///
    /// `spec` and `calibration` fall back to the configured defaults when
    /// not supplied. Fails with `DuplicateSensor` when the id exists.
    pub fn register(
        &mut self,
        id: &str,
        location: SensorLocation,
        spec: Option<SensorSpec>,
        calibration: Option<CalibrationCoefficients>,
    ) -> SensorResult<()> {
        let id = Id::new(id).ok_or(SensorError::IdTooLong)?;
        if self.sensors.contains_key(&id) {
            return Err(SensorError::DuplicateSensor);
        }

        let sensor = Sensor::new(
            id,
            location,
            spec.unwrap_or(self.config.default_spec),
            calibration.unwrap_or(self.config.default_calibration),
        );

        self.sensors
            .insert(id, sensor)
            .map_err(|_| SensorError::CapacityExceeded)?;
        Ok(())
    }

    /// Remove a sensor together with its history and calibration log
    pub fn unregister(&mut self, id: &str) -> SensorResult<()> {
        let id = Id::new(id).ok_or(SensorError::NotFound)?;
        self.sensors
            .remove(&id)
            .map(|_| ())
            .ok_or(SensorError::NotFound)
    }

    /// Run the acquisition pipeline on a raw sample
    ///
    /// Returns the calibrated reading on success. An `OutOfRange` rejection
    /// leaves the sensor exactly as it was.
    pub fn submit_reading(&mut self, id: &str, raw: RawSample) -> SensorResult<Reading> {
        let id = Id::new(id).ok_or(SensorError::NotFound)?;
        let calibration_interval = self.config.calibration_interval_hours;
        let sensor = self.sensors.get_mut(&id).ok_or(SensorError::NotFound)?;

        // 1. Calibrate
        let cal = sensor.calibration.apply(&raw);

        // 2. Validate against the spec envelope - before any mutation
        check_range(
            ReadingField::Current,
            cal.current_a,
            0.0,
            sensor.spec.max_current_a * RANGE_TOLERANCE,
        )?;
        check_range(
            ReadingField::Voltage,
            cal.voltage_v,
            0.0,
            sensor.spec.max_voltage_v * RANGE_TOLERANCE,
        )?;
        check_range(
            ReadingField::Temperature,
            cal.temperature_c,
            sensor.spec.operating_min_c - TEMP_VALIDATION_MARGIN_C,
            sensor.spec.operating_max_c + TEMP_VALIDATION_MARGIN_C,
        )?;
        check_range(ReadingField::SignalQuality, raw.signal_quality, 0.0, 1.0)?;

        // 3. Derive power, resistance and thermal gradient
        let power_w = cal.current_a * cal.voltage_v;
        let resistance_ohm = cal.voltage_v / cal.current_a.max(MIN_CURRENT_A);
        let gradient_c_per_s = match sensor.last_reading {
            Some(last) => {
                let dt_ms = raw.timestamp.saturating_sub(last.timestamp);
                if dt_ms > 0 {
                    (cal.temperature_c - last.temperature_c) * MS_PER_SECOND as f32
                        / dt_ms as f32
                } else {
                    0.0
                }
            }
            None => 0.0,
        };

        let reading = Reading {
            timestamp: raw.timestamp,
            current_a: cal.current_a,
            voltage_v: cal.voltage_v,
            temperature_c: cal.temperature_c,
            resistance_ohm,
            power_w,
            gradient_c_per_s,
            signal_quality: raw.signal_quality,
        };

        // 4. Store and accrue operating time
        if let Some(last) = sensor.last_reading {
            let dt_ms = raw.timestamp.saturating_sub(last.timestamp);
            sensor.operating_hours += dt_ms as f32 / MS_PER_HOUR_F32;
        }
        sensor.history.push(reading);
        sensor.last_reading = Some(reading);
        // A valid reading proves the link is up again
        sensor.status.consecutive_comm_errors = 0;

        // 5. Health score
        sensor.status.health = health::health_score(
            &reading,
            &sensor.history,
            sensor.status.error_count,
            sensor.operating_hours,
        );

        // 6. Faults recomputed from scratch, then derived flags
        let faults = health::fault_scan(&reading, &sensor.spec);
        if !faults.is_empty() {
            sensor.status.warning_count += 1;
        }
        sensor.status.faults = faults;

        sensor.status.calibration_due =
            sensor.operating_hours - sensor.hours_at_calibration > calibration_interval;
        sensor.status.maintenance_required = sensor.status.health < MAINTENANCE_HEALTH_THRESHOLD
            || sensor.status.faults.len() > MAINTENANCE_FAULT_COUNT
            || sensor.status.calibration_due;
        sensor.status.operational = sensor.status.health > OPERATIONAL_HEALTH_FLOOR
            && reading.signal_quality > OPERATIONAL_QUALITY_FLOOR
            && !sensor.status.faults.contains(&FaultCode::HighTemperature);

        Ok(reading)
    }

    /// Recalibrate against externally measured reference conditions
    ///
    /// Fails with `CalibrationUnavailable` when no reading has been accepted
    /// yet; the sensor keeps its prior calibration in that case.
    pub fn calibrate(
        &mut self,
        id: &str,
        reference_temperature_c: f32,
        reference_current_a: f32,
        reference_voltage_v: f32,
    ) -> SensorResult<CalibrationRecord> {
        let id = Id::new(id).ok_or(SensorError::NotFound)?;
        let sensor = self.sensors.get_mut(&id).ok_or(SensorError::NotFound)?;
        let last = sensor
            .last_reading
            .ok_or(SensorError::CalibrationUnavailable)?;

        let reference = ReferencePoint {
            temperature_c: reference_temperature_c,
            current_a: reference_current_a,
            voltage_v: reference_voltage_v,
        };

        let before = sensor.calibration;
        let after = before.adjusted(&last, reference);
        sensor.calibration = after;

        let record = CalibrationRecord {
            timestamp: last.timestamp,
            before,
            after,
            reference,
        };
        sensor.calibration_log.push(record);
        sensor.hours_at_calibration = sensor.operating_hours;
        sensor.status.calibration_due = false;

        Ok(record)
    }

    /// Record a communication error against a sensor
    ///
    /// Non-fatal: fault state accumulates, and past the configured
    /// consecutive threshold the sensor is marked non-operational with a
    /// communication-failure fault. Graceful degradation, never a crash.
    pub fn report_communication_error(&mut self, id: &str, reason: &'static str) -> SensorResult<()> {
        let id = Id::new(id).ok_or(SensorError::NotFound)?;
        let threshold = self.config.comm_error_threshold;
        let sensor = self.sensors.get_mut(&id).ok_or(SensorError::NotFound)?;

        sensor.status.error_count += 1;
        sensor.status.consecutive_comm_errors += 1;
        let _ = sensor.status.faults.insert(FaultCode::CommunicationError);
        log_warn!("sensor {}: communication error: {}", id, reason);

        if sensor.status.consecutive_comm_errors > threshold {
            let _ = sensor.status.faults.insert(FaultCode::CommunicationFailure);
            sensor.status.operational = false;
            log_warn!(
                "sensor {}: marked non-operational after {} consecutive errors",
                id,
                sensor.status.consecutive_comm_errors
            );
        }

        Ok(())
    }

    /// Side-effect-free diagnostic snapshot
    pub fn diagnostics(&self, id: &str) -> SensorResult<SensorDiagnostics> {
        let id = Id::new(id).ok_or(SensorError::NotFound)?;
        let sensor = self.sensors.get(&id).ok_or(SensorError::NotFound)?;

        let mut recent = heapless::Vec::new();
        for reading in sensor.history.recent(VARIANCE_WINDOW) {
            let _ = recent.push(*reading);
        }

        let n = recent.len().max(1) as f32;
        let mean = |f: fn(&Reading) -> f32| recent.iter().map(f).sum::<f32>() / n;

        let temperature_var = health::window_variance(&sensor.history, |r| r.temperature_c);

        Ok(SensorDiagnostics {
            last: sensor.last_reading,
            mean_current_a: mean(|r| r.current_a),
            mean_voltage_v: mean(|r| r.voltage_v),
            mean_temperature_c: mean(|r| r.temperature_c),
            mean_power_w: mean(|r| r.power_w),
            stddev_temperature_c: libm::sqrtf(temperature_var),
            recent,
            calibrations: sensor.calibration_log.iter().copied().collect(),
            error_count: sensor.status.error_count,
            health: sensor.status.health,
            operating_hours: sensor.operating_hours,
            faults: sensor.status.faults.clone(),
        })
    }

    /// Look up a sensor by id
    pub fn get(&self, id: &str) -> Option<&Sensor> {
        let id = Id::new(id)?;
        self.sensors.get(&id)
    }

    /// Iterate over all registered sensors
    pub fn iter(&self) -> impl Iterator<Item = &Sensor> {
        self.sensors.values()
    }

    /// Number of registered sensors
    pub fn len(&self) -> usize {
        self.sensors.len()
    }

    /// Check whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }
}

impl Default for SensorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Reject a value outside `[min, max]`, naming the violated field
///
/// Written as a negated conjunction so NaN fails the check.
fn check_range(field: ReadingField, value: f32, min: f32, max: f32) -> SensorResult<()> {
    if !(value >= min && value <= max) {
        return Err(SensorError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}
