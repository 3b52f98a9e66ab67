//! Core thermal-protection engine for ThermoGuard
//!
//! Turns raw thermoelectric sensor samples into calibrated readings and
//! drives staged protective shutdown of the affected zones. Designed for
//! vehicle control units with bounded memory.
//!
//! Key constraints:
//! - All collections bounded at compile time, no allocation on the data path
//! - Deterministic: callers pass explicit timestamps, nothing reads a clock
//! - A single faulty sensor or zone never aborts the controller
//!
//! ```no_run
//! use thermoguard_core::{
//!     OrchestratorConfig, RawSample, SensorLocation, SensorRegistry,
//!     ThermalLimits, ZoneBounds, ZoneOrchestrator,
//! };
//! use thermoguard_core::events::{Id, PriorityClass};
//!
//! let mut registry = SensorRegistry::new();
//! let mut orchestrator = ZoneOrchestrator::new(OrchestratorConfig::default());
//!
//! orchestrator.create_zone(
//!     "pack_a",
//!     PriorityClass::Critical,
//!     ThermalLimits::default(),
//!     ZoneBounds { min: [0.0; 3], max: [1.2, 0.8, 0.3] },
//!     None,
//! )?;
//! registry.register(
//!     "te_pack_a_01",
//!     SensorLocation {
//!         zone: Id::new("pack_a").unwrap(),
//!         position: [0.4, 0.2, 0.1],
//!         priority: PriorityClass::Critical,
//!     },
//!     None,
//!     None,
//! )?;
//! orchestrator.attach_sensor("pack_a", "te_pack_a_01")?;
//!
//! // Acquisition loop: calibrate the sample, fuse per zone, drive the
//! // state machine, advance running procedures.
//! let sample = RawSample {
//!     timestamp: 1_000,
//!     current_a: 1.2,
//!     voltage_v: 12.0,
//!     temperature_c: 47.5,
//!     resistance_ohm: 10.0,
//!     signal_quality: 0.97,
//! };
//! let reading = registry.submit_reading("te_pack_a_01", sample)?;
//! orchestrator.update_status("pack_a", reading.temperature_c, Some(reading.power_w), 1_000)?;
//! orchestrator.process(1_000);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[cfg(not(feature = "std"))]
extern crate alloc;

// Macros for optional logging
#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "log")]
macro_rules! log_info {
    ($($arg:tt)*) => { log::info!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_info {
    ($($arg:tt)*) => {};
}

pub mod buffer;
pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod sensor;
pub mod time;
pub mod zone;

// Public API
pub use config::{EscalationPolicy, OrchestratorConfig, OverrunPolicy, RegistryConfig};
pub use errors::{
    ActuationError, ReactivationBlock, ReadingField, SensorError, SensorResult, ZoneError,
    ZoneResult,
};
pub use events::{
    AlertKind, AlertListener, Severity, ShutdownEvent, ShutdownListener, ShutdownStatus,
    SubscriptionId, ZoneAlert,
};
pub use sensor::{
    CalibrationCoefficients, RawSample, Reading, SensorDiagnostics, SensorLocation, SensorRegistry,
    SensorSpec,
};
pub use zone::{
    NullActuator, ShutdownProcedure, ShutdownStep, StepAction, StepActuator, SystemStatistics,
    ThermalLimits, Zone, ZoneBounds, ZoneOrchestrator, ZoneState,
};

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
