//! Error Types for the Thermal-Protection Core
//!
//! ## Design Philosophy
//!
//! ThermoGuard's error system follows the same constraints as the rest of the
//! crate:
//!
//! 1. **Small Size**: Each variant carries only inline numeric context and
//!    `&'static str` reasons, so errors stay cheap to return from hot paths.
//!
//! 2. **No Heap Allocation**: No `String` anywhere - deterministic memory
//!    usage on embedded targets.
//!
//! 3. **Copy Semantics**: Errors implement `Copy` for efficient returns
//!    without move-semantics complications.
//!
//! 4. **Two Audiences**: Configuration errors (`DuplicateZone`,
//!    `InvalidConfiguration`, ...) are programmer errors the caller must fix;
//!    they are surfaced synchronously and never auto-corrected. Operational
//!    degradation (communication faults, failed shutdown steps) is *not* an
//!    error - it is absorbed into sensor/zone status and surfaced through
//!    alerts and shutdown events instead, so a single faulty sensor never
//!    aborts the controller.
//!
//! ## Error Handling Strategy
//!
//! ```rust
//! use thermoguard_core::{SensorError, SensorRegistry, RawSample};
//!
//! fn handle_sample(registry: &mut SensorRegistry, sample: RawSample) {
//!     match registry.submit_reading("te_module_01", sample) {
//!         Ok(reading) => {
//!             // Calibrated reading - forward to the zone fusion layer
//!             let _ = reading.power_w;
//!         }
//!         Err(SensorError::OutOfRange { .. }) => {
//!             // Transient hardware/data fault - the sample was rejected,
//!             // sensor state is untouched
//!         }
//!         Err(SensorError::NotFound) => {
//!             // Acquisition loop and registry disagree - configuration bug
//!         }
//!         Err(_) => {}
//!     }
//! }
//! ```

use thiserror_no_std::Error;

use crate::events::Severity;

/// Result type for sensor-registry operations
pub type SensorResult<T> = Result<T, SensorError>;

/// Result type for zone and shutdown-orchestration operations
pub type ZoneResult<T> = Result<T, ZoneError>;

/// Reading field that failed spec validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingField {
    /// Calibrated current (A)
    Current,
    /// Calibrated voltage (V)
    Voltage,
    /// Calibrated temperature (°C)
    Temperature,
    /// Reported signal quality (0.0-1.0)
    SignalQuality,
}

/// Sensor-registry errors - kept small, Copy-able
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum SensorError {
    /// A sensor with this id is already registered
    #[error("Sensor id already registered")]
    DuplicateSensor,

    /// No sensor registered under this id
    #[error("Sensor not found")]
    NotFound,

    /// Registry table is at capacity
    #[error("Sensor table full")]
    CapacityExceeded,

    /// Id exceeds the inline id length limit
    #[error("Id exceeds the inline length limit")]
    IdTooLong,

    /// Calibrated value outside the sensor specification envelope
    #[error("{field:?} value {value} outside range [{min}, {max}]")]
    OutOfRange {
        /// Which field violated its bounds
        field: ReadingField,
        /// The calibrated value that failed validation
        value: f32,
        /// Minimum acceptable value
        min: f32,
        /// Maximum acceptable value
        max: f32,
    },

    /// Calibration requested before any reading was submitted
    #[error("No prior reading to calibrate against")]
    CalibrationUnavailable,
}

/// Precondition that blocked a zone reactivation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactivationBlock {
    /// Zone is not shut down - nothing to reactivate
    NotShutDown,
    /// A shutdown procedure is still executing
    ProcedureRunning,
    /// Mandatory cooldown period has not elapsed
    CoolingDown,
    /// Temperature still above normal-operating + hysteresis
    TemperatureHigh,
    /// |thermal gradient| above the reactivation stability limit
    GradientUnstable,
}

/// Zone state machine and shutdown-orchestrator errors
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ZoneError {
    /// A zone with this id already exists
    #[error("Zone id already exists")]
    DuplicateZone,

    /// No zone registered under this id
    #[error("Zone not found")]
    NotFound,

    /// Zone table is at capacity
    #[error("Zone table full")]
    CapacityExceeded,

    /// Id exceeds the inline id length limit
    #[error("Id exceeds the inline length limit")]
    IdTooLong,

    /// Thermal limits or procedure set rejected at configuration time
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration {
        /// What the configuration violated
        reason: &'static str,
    },

    /// No shutdown procedure registered for the requested severity tier
    #[error("No procedure for severity {severity:?}")]
    ProcedureNotFound {
        /// Severity tier that had no matching procedure
        severity: Severity,
    },

    /// Reactivation preconditions unmet; caller may retry later
    #[error("Reactivation blocked: {reason:?}")]
    ReactivationBlocked {
        /// The first violated precondition
        reason: ReactivationBlock,
    },
}

/// Actuation-collaborator failures
///
/// Returned by [`StepActuator`](crate::zone::StepActuator) implementations
/// when a shutdown command cannot be issued. A failing step is logged and the
/// procedure advances; the error never propagates to the caller.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuationError {
    /// Target component did not acknowledge the command
    #[error("Component unresponsive")]
    ComponentUnresponsive,

    /// Actuator rejected the command
    #[error("Command rejected: {reason}")]
    Rejected {
        /// Why the actuator refused
        reason: &'static str,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for SensorError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::DuplicateSensor => defmt::write!(fmt, "duplicate sensor id"),
            Self::NotFound => defmt::write!(fmt, "sensor not found"),
            Self::CapacityExceeded => defmt::write!(fmt, "sensor table full"),
            Self::IdTooLong => defmt::write!(fmt, "sensor id too long"),
            Self::OutOfRange { value, min, max, .. } =>
                defmt::write!(fmt, "value {} outside [{}, {}]", value, min, max),
            Self::CalibrationUnavailable => defmt::write!(fmt, "no prior reading"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ZoneError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::DuplicateZone => defmt::write!(fmt, "duplicate zone id"),
            Self::NotFound => defmt::write!(fmt, "zone not found"),
            Self::CapacityExceeded => defmt::write!(fmt, "zone table full"),
            Self::IdTooLong => defmt::write!(fmt, "zone id too long"),
            Self::InvalidConfiguration { reason } =>
                defmt::write!(fmt, "invalid configuration: {}", reason),
            Self::ProcedureNotFound { .. } => defmt::write!(fmt, "procedure missing"),
            Self::ReactivationBlocked { .. } => defmt::write!(fmt, "reactivation blocked"),
        }
    }
}
