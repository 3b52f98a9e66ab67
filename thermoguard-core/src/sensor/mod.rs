//! Sensor Entities and the Calibration Pipeline
//!
//! ## Overview
//!
//! Thermoelectric sensing elements double as temperature/overcurrent sensors
//! and as inputs to protective shutdown. This module owns everything on the
//! sensor side of that boundary:
//!
//! - [`RawSample`] - what the acquisition hardware delivers
//! - [`Reading`] - the calibrated, validated, derived record that is stored
//! - [`Sensor`] - identity, location, specification, calibration, bounded
//!   history and mutable status
//! - [`registry::SensorRegistry`] - the owning table and its operations
//!
//! Zones never hold sensors; they reference them by [`Id`] only. The mapping
//! from sensor readings to zone temperatures is the caller's fusion policy.
//!
//! ## Data Flow
//!
//! ```text
//! RawSample → calibrate → validate → derive → store → health-score → faults
//!                ↓            ↓         ↓        ↓          ↓           ↓
//!           coefficients   spec     power,R  history    [0,1]      recomputed
//!                                                                  from scratch
//! ```
//!
//! Validation happens before any mutation: a rejected sample leaves the
//! sensor exactly as it was.

pub mod calibration;
pub mod health;
pub mod registry;

pub use calibration::{CalibrationCoefficients, CalibrationRecord, ReferencePoint};
pub use registry::{SensorDiagnostics, SensorRegistry};

use heapless::FnvIndexSet;

use crate::buffer::History;
use crate::constants::buffers::{CALIBRATION_LOG, MAX_FAULT_CODES, READING_HISTORY};
use crate::constants::limits::{
    DEFAULT_MAX_CURRENT_A, DEFAULT_MAX_TEMPERATURE_C, DEFAULT_MAX_VOLTAGE_V,
    DEFAULT_NOMINAL_RESISTANCE_OHM, DEFAULT_OPERATING_MAX_C, DEFAULT_OPERATING_MIN_C,
};
use crate::events::{Id, PriorityClass};
use crate::time::Timestamp;

/// Raw electrical sample as delivered by the acquisition hardware
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSample {
    /// Sample timestamp (ms)
    pub timestamp: Timestamp,
    /// Uncalibrated current (A)
    pub current_a: f32,
    /// Uncalibrated voltage (V)
    pub voltage_v: f32,
    /// Uncalibrated temperature (°C)
    pub temperature_c: f32,
    /// Uncalibrated resistance (Ω)
    pub resistance_ohm: f32,
    /// Signal-quality score reported by the front end (0.0-1.0)
    pub signal_quality: f32,
}

/// Calibrated, validated reading with derived quantities
///
/// Immutable once stored; appended to the bounded per-sensor history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Sample timestamp (ms)
    pub timestamp: Timestamp,
    /// Calibrated current (A)
    pub current_a: f32,
    /// Calibrated voltage (V)
    pub voltage_v: f32,
    /// Calibrated temperature (°C)
    pub temperature_c: f32,
    /// Derived resistance (Ω), voltage over ε-guarded current
    pub resistance_ohm: f32,
    /// Derived power (W), current x voltage
    pub power_w: f32,
    /// Thermal gradient versus the previous reading (°C/s, signed)
    pub gradient_c_per_s: f32,
    /// Signal-quality score (0.0-1.0)
    pub signal_quality: f32,
}

/// Static hardware specification of a sensing element
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensorSpec {
    /// Maximum continuous current (A)
    pub max_current_a: f32,
    /// Maximum voltage (V)
    pub max_voltage_v: f32,
    /// Maximum element temperature (°C)
    pub max_temperature_c: f32,
    /// Lower operating temperature (°C)
    pub operating_min_c: f32,
    /// Upper operating temperature (°C)
    pub operating_max_c: f32,
    /// Nominal element resistance (Ω)
    pub nominal_resistance_ohm: f32,
}

impl Default for SensorSpec {
    fn default() -> Self {
        Self {
            max_current_a: DEFAULT_MAX_CURRENT_A,
            max_voltage_v: DEFAULT_MAX_VOLTAGE_V,
            max_temperature_c: DEFAULT_MAX_TEMPERATURE_C,
            operating_min_c: DEFAULT_OPERATING_MIN_C,
            operating_max_c: DEFAULT_OPERATING_MAX_C,
            nominal_resistance_ohm: DEFAULT_NOMINAL_RESISTANCE_OHM,
        }
    }
}

/// Physical placement of a sensor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorLocation {
    /// Zone this sensor is mounted in
    pub zone: Id,
    /// Position within the platform frame (m)
    pub position: [f32; 3],
    /// Priority class of the monitored subsystem
    pub priority: PriorityClass,
}

/// Fault codes recomputed from scratch on every reading
///
/// Reading-derived codes come out of the pure fault scan; the communication
/// codes are maintained by the error-reporting path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FaultCode {
    /// Temperature above 90% of the spec maximum
    HighTemperature = 0,
    /// Current above 90% of the spec maximum
    Overcurrent = 1,
    /// Signal quality below the usable threshold
    LowSignalQuality = 2,
    /// Resistance drifted beyond tolerance from nominal
    ResistanceDrift = 3,
    /// One or more recent communication errors
    CommunicationError = 4,
    /// Consecutive communication errors exceeded the configured threshold
    CommunicationFailure = 5,
}

impl FaultCode {
    /// Get human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            FaultCode::HighTemperature => "high_temperature",
            FaultCode::Overcurrent => "overcurrent",
            FaultCode::LowSignalQuality => "low_signal_quality",
            FaultCode::ResistanceDrift => "resistance_drift",
            FaultCode::CommunicationError => "communication_error",
            FaultCode::CommunicationFailure => "communication_failure",
        }
    }
}

/// Bounded fault-code set
pub type FaultSet = FnvIndexSet<FaultCode, MAX_FAULT_CODES>;

/// Mutable per-sensor status
#[derive(Debug, Clone, Default)]
pub struct SensorStatus {
    /// Whether the sensor's data is currently trustworthy
    pub operational: bool,
    /// Health score, always in [0, 1]
    pub health: f32,
    /// Active fault codes
    pub faults: FaultSet,
    /// Cumulative communication-error count
    pub error_count: u32,
    /// Updates that produced at least one fault code
    pub warning_count: u32,
    /// Communication errors since the last valid reading
    pub consecutive_comm_errors: u32,
    /// Health, fault or calibration state warrants service
    pub maintenance_required: bool,
    /// Calibration interval elapsed
    pub calibration_due: bool,
}

/// A registered thermoelectric sensing element
///
/// Owned exclusively by the [`SensorRegistry`]; all mutation goes through
/// registry operations.
#[derive(Clone)]
pub struct Sensor {
    /// Sensor identity
    pub id: Id,
    /// Physical placement
    pub location: SensorLocation,
    /// Hardware specification
    pub spec: SensorSpec,
    /// Active calibration coefficients
    pub calibration: CalibrationCoefficients,
    /// Mutable status
    pub status: SensorStatus,
    /// Bounded reading history, oldest evicted
    pub history: History<Reading, READING_HISTORY>,
    /// Bounded calibration log
    pub calibration_log: History<CalibrationRecord, CALIBRATION_LOG>,
    /// Most recent accepted reading
    pub last_reading: Option<Reading>,
    /// Cumulative operating hours, accumulated from sample timestamps
    pub operating_hours: f32,
    /// Operating hours at the last calibration
    pub hours_at_calibration: f32,
}

impl Sensor {
    /// Create a sensor with empty history and a fresh status
    pub fn new(
        id: Id,
        location: SensorLocation,
        spec: SensorSpec,
        calibration: CalibrationCoefficients,
    ) -> Self {
        Self {
            id,
            location,
            spec,
            calibration,
            status: SensorStatus {
                operational: true,
                health: 1.0,
                ..SensorStatus::default()
            },
            history: History::new(),
            calibration_log: History::new(),
            last_reading: None,
            operating_hours: 0.0,
            hours_at_calibration: 0.0,
        }
    }
}
