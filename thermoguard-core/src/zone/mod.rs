//! Thermal Zones and the Shutdown State Machine
//!
//! ## Overview
//!
//! A zone is a logically bounded region of the platform - a battery-pack
//! section, a motor housing, the charger bay - with its own thermal limits
//! and one shutdown procedure per severity tier. This module owns the zone
//! side of the controller:
//!
//! - [`Zone`], [`ThermalLimits`], [`ZoneBounds`], [`ZoneStatus`] - entities
//! - [`procedure`] - procedure/step definitions and the actuation seam
//! - [`execution`] - the ephemeral per-zone execution state machine
//! - [`orchestrator`] - the owning table and all public operations
//!
//! ## Zone Lifecycle
//!
//! ```text
//!               violation (same call)
//! Operational ────────────────────────→ ShuttingDown(step 0..n)
//!      ↑                                        │ last step done
//!      │ reactivate: cooldown elapsed,          ▼
//!      │ temp ≤ normal + hysteresis,        Cooldown
//!      │ |gradient| ≤ 1 °C/s                    │
//!      └────────────────────────────────────────┘
//! ```
//!
//! Runtime violations are not errors - they are the expected signals that
//! drive these transitions. Only configuration mistakes surface as `Err`.

pub mod execution;
pub mod orchestrator;
pub mod procedure;

pub use execution::{ShutdownExecution, StepState};
pub use orchestrator::{SystemStatistics, ZoneOrchestrator};
pub use procedure::{NullActuator, ShutdownProcedure, ShutdownStep, StepAction, StepActuator};

use heapless::Vec;

use crate::constants::buffers::{MAX_PROCEDURES, MAX_ZONE_FAULTS, MAX_ZONE_SENSORS};
use crate::constants::limits::{
    DEFAULT_CRITICAL_C, DEFAULT_EMERGENCY_C, DEFAULT_MAX_GRADIENT_C_PER_S, DEFAULT_NORMAL_C,
    DEFAULT_THERMAL_MASS_J_PER_C, DEFAULT_WARNING_C,
};
use crate::errors::{ZoneError, ZoneResult};
use crate::events::{Id, PriorityClass, Severity, TriggerReason};
use crate::time::Timestamp;

/// Static thermal limits of a zone
///
/// Tiers must be strictly ordered `normal < warning < critical < emergency`;
/// [`validate`](Self::validate) enforces this at configuration time.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThermalLimits {
    /// Normal-operating ceiling (°C); reactivation reference
    pub normal_c: f32,
    /// Warning tier threshold (°C)
    pub warning_c: f32,
    /// Critical tier threshold (°C)
    pub critical_c: f32,
    /// Emergency tier threshold (°C)
    pub emergency_c: f32,
    /// Maximum thermal gradient (°C/s); twice this triggers emergency
    pub max_gradient_c_per_s: f32,
    /// Thermal mass (J/°C), carried for the vehicle-level collaborator
    pub thermal_mass_j_per_c: f32,
}

impl Default for ThermalLimits {
    fn default() -> Self {
        Self {
            normal_c: DEFAULT_NORMAL_C,
            warning_c: DEFAULT_WARNING_C,
            critical_c: DEFAULT_CRITICAL_C,
            emergency_c: DEFAULT_EMERGENCY_C,
            max_gradient_c_per_s: DEFAULT_MAX_GRADIENT_C_PER_S,
            thermal_mass_j_per_c: DEFAULT_THERMAL_MASS_J_PER_C,
        }
    }
}

impl ThermalLimits {
    /// Reject malformed limit sets
    pub fn validate(&self) -> ZoneResult<()> {
        if !(self.normal_c < self.warning_c
            && self.warning_c < self.critical_c
            && self.critical_c < self.emergency_c)
        {
            return Err(ZoneError::InvalidConfiguration {
                reason: "thermal tiers must be strictly ordered normal < warning < critical < emergency",
            });
        }
        if !(self.max_gradient_c_per_s > 0.0) {
            return Err(ZoneError::InvalidConfiguration {
                reason: "max gradient must be positive",
            });
        }
        if !(self.thermal_mass_j_per_c > 0.0) {
            return Err(ZoneError::InvalidConfiguration {
                reason: "thermal mass must be positive",
            });
        }
        Ok(())
    }
}

/// Axis-aligned boundary box of a zone (platform frame, m)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneBounds {
    /// Minimum corner
    pub min: [f32; 3],
    /// Maximum corner
    pub max: [f32; 3],
}

impl ZoneBounds {
    /// Whether a point lies inside the box (inclusive)
    pub fn contains(&self, point: [f32; 3]) -> bool {
        (0..3).all(|i| point[i] >= self.min[i] && point[i] <= self.max[i])
    }
}

/// Fault condition recorded against a zone when a violation trips
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneFault {
    /// Severity tier of the violation
    pub severity: Severity,
    /// What tripped it
    pub reason: TriggerReason,
    /// When it tripped
    pub at: Timestamp,
}

/// Mutable per-zone status
#[derive(Debug, Clone)]
pub struct ZoneStatus {
    /// Whether the zone's subsystems are powered and running
    pub operational: bool,
    /// Set from trigger until successful reactivation
    pub shutdown_active: bool,
    /// Latest fused temperature (°C); meaningless before the first update
    pub temperature_c: f32,
    /// Latest thermal gradient (°C/s, signed)
    pub gradient_c_per_s: f32,
    /// Latest power consumption (W)
    pub power_w: f32,
    /// Remaining mandatory cooldown (ms)
    pub cooldown_remaining_ms: u64,
    /// Active fault conditions, cleared on reactivation
    pub faults: Vec<ZoneFault, MAX_ZONE_FAULTS>,
    /// When the last procedure finished
    pub last_shutdown: Option<Timestamp>,
    /// When the last status update arrived
    pub last_update: Option<Timestamp>,
}

impl Default for ZoneStatus {
    fn default() -> Self {
        Self {
            operational: true,
            shutdown_active: false,
            temperature_c: 0.0,
            gradient_c_per_s: 0.0,
            power_w: 0.0,
            cooldown_remaining_ms: 0,
            faults: Vec::new(),
            last_shutdown: None,
            last_update: None,
        }
    }
}

/// Derived state of a zone's shutdown machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneState {
    /// No shutdown active
    Operational,
    /// A procedure is executing
    ShuttingDown {
        /// Index of the step currently executing
        step: usize,
    },
    /// Procedure finished; waiting for cooldown/reactivation
    Cooldown,
}

/// A protected thermal region of the platform
#[derive(Clone)]
pub struct Zone {
    /// Zone identity
    pub id: Id,
    /// Priority class of the protected subsystems
    pub priority: PriorityClass,
    /// Static thermal limits
    pub limits: ThermalLimits,
    /// Boundary geometry
    pub bounds: ZoneBounds,
    /// Attached sensor ids (weak references; fusion is the caller's job)
    pub sensors: Vec<Id, MAX_ZONE_SENSORS>,
    /// One procedure per severity tier
    pub procedures: Vec<ShutdownProcedure, MAX_PROCEDURES>,
    /// Mutable status
    pub status: ZoneStatus,
}

impl Zone {
    /// Procedure registered for a severity tier
    pub fn procedure_for(&self, severity: Severity) -> Option<&ShutdownProcedure> {
        self.procedures.iter().find(|p| p.severity == severity)
    }
}
