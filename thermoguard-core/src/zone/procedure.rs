//! Shutdown Procedures, Steps and the Actuation Seam
//!
//! A procedure is a static, ordered list of steps bound to one severity
//! tier. Steps name an action kind, the component ids it addresses (empty =
//! the whole zone), action parameters and a per-step timeout. The
//! orchestrator issues each step's action to a [`StepActuator`] - the
//! external collaborator that talks to contactors, pumps and power stages -
//! and holds the step for `min(timeout, cap)` before advancing.
//!
//! Zones created without explicit procedures get the three defaults below,
//! one per tier, mirroring how aggressively each tier needs to act:
//! warning sheds load, critical shuts down gracefully, emergency cuts power
//! and isolates immediately.

use heapless::Vec;

use crate::constants::buffers::{MAX_PROCEDURE_STEPS, MAX_STEP_COMPONENTS};
use crate::constants::time::{DEFAULT_STEP_TIMEOUT_MS, MS_PER_SECOND};
use crate::errors::ActuationError;
use crate::events::{Id, Severity};

/// Action kind a shutdown step performs
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepAction {
    /// Reduce power draw to the given fraction of nominal
    ReducePower {
        /// Target fraction of nominal power (0.0-1.0)
        fraction: f32,
    },
    /// Orderly shutdown preserving component state
    GracefulShutdown,
    /// Immediate power cut
    ImmediateShutdown,
    /// Electrically isolate the components (open contactors)
    Isolate,
    /// Run active cooling toward a target temperature
    Cool {
        /// Target temperature (°C)
        target_c: f32,
    },
}

impl StepAction {
    /// Get human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            StepAction::ReducePower { .. } => "reduce_power",
            StepAction::GracefulShutdown => "graceful_shutdown",
            StepAction::ImmediateShutdown => "immediate_shutdown",
            StepAction::Isolate => "isolate",
            StepAction::Cool { .. } => "cool",
        }
    }
}

/// One step of a shutdown procedure
#[derive(Debug, Clone, PartialEq)]
pub struct ShutdownStep {
    /// Position within the procedure, ascending execution order
    pub number: u8,
    /// Action to perform
    pub action: StepAction,
    /// Component ids the action addresses; empty addresses the whole zone
    pub components: Vec<Id, MAX_STEP_COMPONENTS>,
    /// Nominal step timeout (ms), bounded by the orchestrator's cap
    pub timeout_ms: u64,
}

impl ShutdownStep {
    /// Convenience constructor for a whole-zone step
    pub fn new(number: u8, action: StepAction, timeout_ms: u64) -> Self {
        Self {
            number,
            action,
            components: Vec::new(),
            timeout_ms,
        }
    }
}

/// Static definition of a staged shutdown procedure
#[derive(Debug, Clone, PartialEq)]
pub struct ShutdownProcedure {
    /// Procedure identity (unique within its zone)
    pub id: Id,
    /// Human-readable name
    pub name: &'static str,
    /// Severity tier this procedure answers
    pub severity: Severity,
    /// Ordered steps
    pub steps: Vec<ShutdownStep, MAX_PROCEDURE_STEPS>,
    /// Whether the shutdown can be reversed by reactivation
    pub reversible: bool,
}

impl ShutdownProcedure {
    /// Estimated duration with each step bounded by the cap (ms)
    pub fn estimated_duration_ms(&self, step_cap_ms: u64) -> u64 {
        self.steps
            .iter()
            .map(|s| s.timeout_ms.min(step_cap_ms))
            .sum()
    }

    /// Default procedure for a severity tier, `None` for `Normal`
    pub fn default_for(severity: Severity) -> Option<Self> {
        let mut steps = Vec::new();
        let (id, name, reversible) = match severity {
            Severity::Warning => {
                let _ = steps.push(ShutdownStep::new(
                    0,
                    StepAction::ReducePower { fraction: 0.5 },
                    2 * MS_PER_SECOND,
                ));
                let _ = steps.push(ShutdownStep::new(
                    1,
                    StepAction::Cool { target_c: 50.0 },
                    DEFAULT_STEP_TIMEOUT_MS,
                ));
                ("warning_default", "load shed and cool", true)
            }
            Severity::Critical => {
                let _ = steps.push(ShutdownStep::new(
                    0,
                    StepAction::ReducePower { fraction: 0.2 },
                    MS_PER_SECOND,
                ));
                let _ = steps.push(ShutdownStep::new(
                    1,
                    StepAction::GracefulShutdown,
                    3 * MS_PER_SECOND,
                ));
                let _ = steps.push(ShutdownStep::new(
                    2,
                    StepAction::Cool { target_c: 45.0 },
                    DEFAULT_STEP_TIMEOUT_MS,
                ));
                ("critical_default", "graceful shutdown", true)
            }
            Severity::Emergency => {
                let _ = steps.push(ShutdownStep::new(
                    0,
                    StepAction::ImmediateShutdown,
                    MS_PER_SECOND / 2,
                ));
                let _ = steps.push(ShutdownStep::new(1, StepAction::Isolate, MS_PER_SECOND));
                let _ = steps.push(ShutdownStep::new(
                    2,
                    StepAction::Cool { target_c: 40.0 },
                    DEFAULT_STEP_TIMEOUT_MS,
                ));
                ("emergency_default", "emergency cut and isolate", false)
            }
            Severity::Normal => return None,
        };

        Some(Self {
            // The literals above are all under the inline id limit
            id: Id::new(id).unwrap_or_default(),
            name,
            severity,
            steps,
            reversible,
        })
    }
}

/// External actuation collaborator
///
/// The orchestrator issues shutdown commands through this seam; the real
/// implementation talks to the vehicle's power-distribution hardware. An
/// implementation must return quickly - completion is modeled by the step
/// timeout, not by blocking here.
pub trait StepActuator: Send {
    /// Issue a step's action against a zone
    ///
    /// An `Err` marks the step failed; the procedure still advances.
    fn execute(&mut self, zone: Id, step: &ShutdownStep) -> Result<(), ActuationError>;
}

/// Actuator that accepts every command
///
/// Stands in for real hardware in tests and bench setups; completion is
/// simulated by the step timeout alone.
#[derive(Debug, Clone, Default)]
pub struct NullActuator;

impl StepActuator for NullActuator {
    fn execute(&mut self, _zone: Id, _step: &ShutdownStep) -> Result<(), ActuationError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_exist_per_tier() {
        for severity in [Severity::Warning, Severity::Critical, Severity::Emergency] {
            let proc = ShutdownProcedure::default_for(severity).unwrap();
            assert_eq!(proc.severity, severity);
            assert!(!proc.steps.is_empty());
            // Steps numbered in ascending order
            for (i, step) in proc.steps.iter().enumerate() {
                assert_eq!(step.number as usize, i);
            }
        }

        assert!(ShutdownProcedure::default_for(Severity::Normal).is_none());
    }

    #[test]
    fn emergency_default_is_irreversible() {
        let proc = ShutdownProcedure::default_for(Severity::Emergency).unwrap();
        assert!(!proc.reversible);
        assert_eq!(proc.steps[0].action.name(), "immediate_shutdown");
    }

    #[test]
    fn estimate_respects_cap() {
        let proc = ShutdownProcedure::default_for(Severity::Critical).unwrap();
        let uncapped = proc.estimated_duration_ms(u64::MAX);
        let capped = proc.estimated_duration_ms(1_000);

        assert_eq!(uncapped, 1_000 + 3_000 + 5_000);
        assert_eq!(capped, 3_000);
    }
}
