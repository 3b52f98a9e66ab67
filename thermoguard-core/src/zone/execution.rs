//! Ephemeral Shutdown-Execution State
//!
//! One [`ShutdownExecution`] exists per zone while a procedure runs - never
//! more (the orchestrator enforces the invariant) - and is destroyed when
//! the last step finishes or the execution is superseded. It tracks which
//! step is live, each step's sub-status and whether any step failed; the
//! procedure definition itself stays in the zone and is looked up by id.

use heapless::Vec;

use crate::constants::buffers::MAX_PROCEDURE_STEPS;
use crate::events::{Id, Severity};
use crate::time::Timestamp;

use super::procedure::ShutdownProcedure;

/// Sub-status of a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    /// Not reached yet
    Pending,
    /// Command issued, waiting out the bounded step time
    Executing {
        /// When the step started
        started_at: Timestamp,
    },
    /// Finished successfully
    Completed {
        /// When the step finished
        at: Timestamp,
    },
    /// Actuation failed or the overrun policy tripped; procedure advanced
    Failed {
        /// When the step was abandoned
        at: Timestamp,
    },
}

/// Runtime state of one procedure run against one zone
#[derive(Debug, Clone)]
pub struct ShutdownExecution {
    /// Procedure being executed (resolved against the zone's list)
    pub procedure: Id,
    /// Severity tier that triggered it
    pub severity: Severity,
    /// Shutdown-event id this run reports under
    pub event_id: u32,
    /// When the trigger fired
    pub started_at: Timestamp,
    /// When step 0 may begin (trigger time plus configured delay)
    pub begin_at: Timestamp,
    /// Index of the step currently pending or executing
    pub current_step: usize,
    /// Per-step sub-status, same order as the procedure's steps
    pub steps: Vec<StepState, MAX_PROCEDURE_STEPS>,
    /// Whether any step has failed so far
    pub any_failed: bool,
}

impl ShutdownExecution {
    /// Create an execution with every step pending
    pub fn new(
        procedure: &ShutdownProcedure,
        event_id: u32,
        now: Timestamp,
        delay_ms: u64,
    ) -> Self {
        let mut steps = Vec::new();
        for _ in 0..procedure.steps.len() {
            let _ = steps.push(StepState::Pending);
        }

        Self {
            procedure: procedure.id,
            severity: procedure.severity,
            event_id,
            started_at: now,
            begin_at: now + delay_ms,
            current_step: 0,
            steps,
            any_failed: false,
        }
    }

    /// Whether every step has reached a terminal sub-status
    pub fn is_complete(&self) -> bool {
        self.current_step >= self.steps.len()
    }

    /// Sub-status of the step currently in flight, if any
    pub fn current_state(&self) -> Option<StepState> {
        self.steps.get(self.current_step).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_execution_is_all_pending() {
        let proc = ShutdownProcedure::default_for(Severity::Critical).unwrap();
        let exec = ShutdownExecution::new(&proc, 7, 1_000, 250);

        assert_eq!(exec.event_id, 7);
        assert_eq!(exec.started_at, 1_000);
        assert_eq!(exec.begin_at, 1_250);
        assert_eq!(exec.current_step, 0);
        assert_eq!(exec.steps.len(), proc.steps.len());
        assert!(exec.steps.iter().all(|s| *s == StepState::Pending));
        assert!(!exec.is_complete());
        assert!(!exec.any_failed);
    }
}
