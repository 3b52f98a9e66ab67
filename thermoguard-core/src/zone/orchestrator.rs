//! Zone Orchestrator - Violation Evaluation and Staged Shutdown
//!
//! ## Overview
//!
//! The orchestrator owns every [`Zone`], the at-most-one-per-zone
//! [`ShutdownExecution`] table, the bounded shutdown-event history and the
//! listener fan-out. It is poll-driven: every mutating operation takes an
//! explicit `now`, and [`process`](ZoneOrchestrator::process) advances all
//! active executions. `trigger_shutdown` returns immediately - steps
//! complete on later `process` calls, never synchronously.
//!
//! ## Evaluation Order
//!
//! `update_status` evaluates violations in descending severity and triggers
//! at most one procedure per call:
//!
//! ```text
//! emergency:  t >= emergency_c  OR  gradient >= 2 x max_gradient
//! critical:   t >= critical_c   OR  gradient >= max_gradient
//! warning:    t >= warning_c
//! ```
//!
//! Evaluation is skipped while an execution is active, unless the
//! escalation policy preempts for a strictly higher severity.
//!
//! ## Failure Semantics
//!
//! Runtime violations are signals, not errors. Disabled auto-shutdown, an
//! already-active execution and the rolling-hour frequency cap all make
//! `trigger_shutdown` a logged no-op. A step whose actuation fails is
//! logged and the procedure advances - there is no mid-procedure
//! cancellation; only cooldown and reactivation return a zone to service.

#[cfg(not(feature = "std"))]
use alloc::boxed::Box;

#[cfg(feature = "std")]
use std::boxed::Box;

use heapless::FnvIndexMap;

use crate::buffer::History;
use crate::config::{EscalationPolicy, OrchestratorConfig, OverrunPolicy};
use crate::constants::buffers::{MAX_PROCEDURES, MAX_ZONES, SHUTDOWN_HISTORY};
use crate::constants::limits::REACTIVATION_GRADIENT_LIMIT_C_PER_S;
use crate::constants::time::{MS_PER_SECOND, SHUTDOWN_RATE_WINDOW_MS};
use crate::errors::{ReactivationBlock, ZoneError, ZoneResult};
use crate::events::{
    AlertKind, AlertListener, Id, Notifier, PriorityClass, Severity, ShutdownEvent,
    ShutdownListener, ShutdownStatus, SubscriptionId, TriggerReason, ZoneAlert,
};
use crate::time::Timestamp;

use super::execution::{ShutdownExecution, StepState};
use super::procedure::{NullActuator, ShutdownProcedure, StepActuator};
use super::{ThermalLimits, Zone, ZoneBounds, ZoneFault, ZoneState, ZoneStatus};

/// Aggregate counters returned by [`ZoneOrchestrator::statistics`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SystemStatistics {
    /// Total zones
    pub zones: usize,
    /// Zones with no shutdown active
    pub operational_zones: usize,
    /// Zones with a procedure executing
    pub shutting_down_zones: usize,
    /// Zones between procedure completion and reactivation
    pub cooldown_zones: usize,
    /// Executed (non-suppressed) shutdowns in the last rolling hour
    pub shutdowns_last_hour: usize,
    /// Mean temperature over zones that have received an update (°C)
    pub mean_temperature_c: f32,
}

/// Owning table of zones plus the shutdown state machine
pub struct ZoneOrchestrator {
    zones: FnvIndexMap<Id, Zone, MAX_ZONES>,
    executions: FnvIndexMap<Id, ShutdownExecution, MAX_ZONES>,
    history: History<ShutdownEvent, SHUTDOWN_HISTORY>,
    notifier: Notifier,
    config: OrchestratorConfig,
    actuator: Box<dyn StepActuator>,
    next_event_id: u32,
}

impl ZoneOrchestrator {
    /// Create an orchestrator with the bundled simulated actuator
    pub fn new(config: OrchestratorConfig) -> Self {
        Self::with_actuator(config, Box::new(NullActuator))
    }

    /// Create an orchestrator wired to a real actuation collaborator
    pub fn with_actuator(config: OrchestratorConfig, actuator: Box<dyn StepActuator>) -> Self {
        Self {
            zones: FnvIndexMap::new(),
            executions: FnvIndexMap::new(),
            history: History::new(),
            notifier: Notifier::new(),
            config,
            actuator,
            next_event_id: 0,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Configuration-time operations
    // ------------------------------------------------------------------

    /// Create a zone
    ///
    /// Validates tier ordering and the supplied procedure set; generates the
    /// three default procedures (warning/critical/emergency) when none are
    /// supplied.
    pub fn create_zone(
        &mut self,
        id: &str,
        priority: PriorityClass,
        limits: ThermalLimits,
        bounds: ZoneBounds,
        procedures: Option<&[ShutdownProcedure]>,
    ) -> ZoneResult<()> {
        let zid = Id::new(id).ok_or(ZoneError::IdTooLong)?;
        if self.zones.contains_key(&zid) {
            return Err(ZoneError::DuplicateZone);
        }
        limits.validate()?;

        let mut procs: heapless::Vec<ShutdownProcedure, MAX_PROCEDURES> = heapless::Vec::new();
        match procedures {
            Some(list) => {
                for proc in list {
                    if proc.severity == Severity::Normal {
                        return Err(ZoneError::InvalidConfiguration {
                            reason: "procedure severity must be warning, critical or emergency",
                        });
                    }
                    if proc.steps.is_empty() {
                        return Err(ZoneError::InvalidConfiguration {
                            reason: "procedure must have at least one step",
                        });
                    }
                    if procs.iter().any(|p| p.severity == proc.severity) {
                        return Err(ZoneError::InvalidConfiguration {
                            reason: "duplicate procedure severity",
                        });
                    }
                    procs.push(proc.clone()).map_err(|_| {
                        ZoneError::InvalidConfiguration {
                            reason: "too many procedures",
                        }
                    })?;
                }
            }
            None => {
                for severity in [Severity::Warning, Severity::Critical, Severity::Emergency] {
                    if let Some(proc) = ShutdownProcedure::default_for(severity) {
                        let _ = procs.push(proc);
                    }
                }
            }
        }

        let zone = Zone {
            id: zid,
            priority,
            limits,
            bounds,
            sensors: heapless::Vec::new(),
            procedures: procs,
            status: ZoneStatus::default(),
        };
        self.zones
            .insert(zid, zone)
            .map_err(|_| ZoneError::CapacityExceeded)?;
        Ok(())
    }

    /// Attach a sensor id to a zone (weak reference; idempotent)
    pub fn attach_sensor(&mut self, zone: &str, sensor: &str) -> ZoneResult<()> {
        let zid = Id::new(zone).ok_or(ZoneError::NotFound)?;
        let sid = Id::new(sensor).ok_or(ZoneError::IdTooLong)?;
        let z = self.zones.get_mut(&zid).ok_or(ZoneError::NotFound)?;

        if z.sensors.contains(&sid) {
            return Ok(());
        }
        z.sensors
            .push(sid)
            .map_err(|_| ZoneError::CapacityExceeded)?;
        Ok(())
    }

    /// Detach a sensor id from a zone
    pub fn detach_sensor(&mut self, zone: &str, sensor: &str) -> ZoneResult<()> {
        let zid = Id::new(zone).ok_or(ZoneError::NotFound)?;
        let sid = Id::new(sensor).ok_or(ZoneError::NotFound)?;
        let z = self.zones.get_mut(&zid).ok_or(ZoneError::NotFound)?;
        z.sensors.retain(|s| *s != sid);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Runtime operations
    // ------------------------------------------------------------------

    /// Feed a fused zone temperature into the state machine
    ///
    /// Computes the thermal gradient against the previous update, winds
    /// down the cooldown timer and evaluates violations in descending
    /// severity, triggering at most one procedure. Returns the violated
    /// tier, `None` when nothing tripped or evaluation was skipped.
    pub fn update_status(
        &mut self,
        zone: &str,
        temperature_c: f32,
        power_w: Option<f32>,
        now: Timestamp,
    ) -> ZoneResult<Option<Severity>> {
        let id = Id::new(zone).ok_or(ZoneError::NotFound)?;
        let escalation = self.config.escalation;

        let violation = {
            let z = self.zones.get_mut(&id).ok_or(ZoneError::NotFound)?;
            let elapsed_ms = z
                .status
                .last_update
                .map(|t| now.saturating_sub(t))
                .unwrap_or(0);

            let gradient = if elapsed_ms > 0 {
                (temperature_c - z.status.temperature_c) * MS_PER_SECOND as f32
                    / elapsed_ms as f32
            } else {
                0.0
            };

            z.status.gradient_c_per_s = gradient;
            z.status.temperature_c = temperature_c;
            if let Some(power) = power_w {
                z.status.power_w = power;
            }
            z.status.cooldown_remaining_ms =
                z.status.cooldown_remaining_ms.saturating_sub(elapsed_ms);
            z.status.last_update = Some(now);

            evaluate(&z.limits, temperature_c, gradient)
        };

        let Some((severity, reason, limit)) = violation else {
            return Ok(None);
        };

        if let Some(exec) = self.executions.get(&id) {
            match escalation {
                EscalationPolicy::IgnoreWhileActive => return Ok(None),
                EscalationPolicy::PreemptLowerSeverity => {
                    if severity > exec.severity {
                        self.supersede_execution(id, now);
                    } else {
                        return Ok(None);
                    }
                }
            }
        }

        if let Some(z) = self.zones.get_mut(&id) {
            let _ = z.status.faults.push(ZoneFault {
                severity,
                reason,
                at: now,
            });
        }

        let (kind, value) = match reason {
            TriggerReason::OverTemperature { value } => (AlertKind::TemperatureThreshold, value),
            TriggerReason::GradientExceeded { value } => (AlertKind::GradientThreshold, value),
            TriggerReason::Manual => (AlertKind::TemperatureThreshold, temperature_c),
        };
        self.emit_alert(ZoneAlert {
            zone: id,
            severity,
            kind,
            value,
            limit,
            timestamp: now,
        });

        let _ = self.trigger_shutdown_internal(id, severity, reason, now)?;
        Ok(Some(severity))
    }

    /// Request a shutdown procedure for a zone
    ///
    /// Returns `Ok(true)` when a procedure started. Disabled automatic
    /// shutdown, an active execution and the rolling-hour cap all make this
    /// a logged no-op returning `Ok(false)`.
    pub fn trigger_shutdown(
        &mut self,
        zone: &str,
        severity: Severity,
        now: Timestamp,
    ) -> ZoneResult<bool> {
        let id = Id::new(zone).ok_or(ZoneError::NotFound)?;
        if !self.zones.contains_key(&id) {
            return Err(ZoneError::NotFound);
        }
        self.trigger_shutdown_internal(id, severity, TriggerReason::Manual, now)
    }

    fn trigger_shutdown_internal(
        &mut self,
        id: Id,
        severity: Severity,
        reason: TriggerReason,
        now: Timestamp,
    ) -> ZoneResult<bool> {
        if !self.config.automatic_shutdown {
            log_info!("zone {}: automatic shutdown disabled; trigger dropped", id);
            return Ok(false);
        }
        if self.executions.contains_key(&id) {
            log_info!("zone {}: shutdown already active; trigger dropped", id);
            return Ok(false);
        }

        let executed = self.shutdowns_in_window(id, now);
        if executed >= self.config.max_shutdowns_per_hour as usize {
            let event_id = self.next_event_id();
            let procedure = self
                .zones
                .get(&id)
                .and_then(|z| z.procedure_for(severity))
                .map(|p| p.id)
                .unwrap_or_default();
            let event = ShutdownEvent {
                id: event_id,
                zone: id,
                procedure,
                reason,
                severity,
                started_at: now,
                estimated_ms: 0,
                actual_ms: None,
                status: ShutdownStatus::Suppressed,
            };
            self.history.push(event);
            self.notifier.dispatch_shutdown(&event);
            self.emit_alert(ZoneAlert {
                zone: id,
                severity,
                kind: AlertKind::ShutdownSuppressed,
                value: executed as f32,
                limit: self.config.max_shutdowns_per_hour as f32,
                timestamp: now,
            });
            log_warn!(
                "zone {}: shutdown suppressed, {} already in the rolling hour",
                id,
                executed
            );
            return Ok(false);
        }

        let event_id = self.next_event_id();
        let delay_ms = self.config.shutdown_delay_ms;
        let (procedure, estimated_ms, exec) = {
            let z = self.zones.get(&id).ok_or(ZoneError::NotFound)?;
            let proc = z
                .procedure_for(severity)
                .ok_or(ZoneError::ProcedureNotFound { severity })?;
            (
                proc.id,
                proc.estimated_duration_ms(self.config.step_timeout_cap_ms) + delay_ms,
                ShutdownExecution::new(proc, event_id, now, delay_ms),
            )
        };

        let event = ShutdownEvent {
            id: event_id,
            zone: id,
            procedure,
            reason,
            severity,
            started_at: now,
            estimated_ms,
            actual_ms: None,
            status: ShutdownStatus::InProgress,
        };
        self.history.push(event);
        self.notifier.dispatch_shutdown(&event);

        if let Some(z) = self.zones.get_mut(&id) {
            z.status.shutdown_active = true;
            z.status.operational = false;
        }
        if self.executions.insert(id, exec).is_err() {
            // Cannot happen while executions and zones share a capacity,
            // but never leave the zone flagged without an execution.
            if let Some(z) = self.zones.get_mut(&id) {
                z.status.shutdown_active = false;
                z.status.operational = true;
            }
            log_warn!("zone {}: execution table full; shutdown aborted", id);
            return Ok(false);
        }

        log_info!(
            "zone {}: {} shutdown started (procedure {})",
            id,
            severity.name(),
            procedure
        );
        self.advance_zone(id, now);
        Ok(true)
    }

    /// Advance all active executions to `now`
    ///
    /// The caller's scheduler drives this; a coarse tick is fine - steps
    /// complete no earlier than their bounded time, merely later when ticks
    /// are sparse.
    pub fn process(&mut self, now: Timestamp) {
        let ids: heapless::Vec<Id, MAX_ZONES> = self.executions.keys().copied().collect();
        for id in ids {
            self.advance_zone(id, now);
        }
    }

    fn advance_zone(&mut self, id: Id, now: Timestamp) {
        loop {
            let Some(exec) = self.executions.get(&id) else {
                return;
            };
            if now < exec.begin_at {
                return;
            }
            if exec.is_complete() {
                self.finish_execution(id, now);
                return;
            }

            let current = exec.current_step;
            let severity = exec.severity;
            let begin_at = exec.begin_at;
            let state = exec.steps[current];
            // A step starts when its predecessor ended; step 0 at begin_at
            let start_at = if current == 0 {
                begin_at
            } else {
                match exec.steps[current - 1] {
                    StepState::Completed { at } | StepState::Failed { at } => at,
                    _ => now,
                }
            };

            let step = self
                .zones
                .get(&id)
                .and_then(|z| z.procedure_for(severity))
                .and_then(|p| p.steps.get(current).cloned());
            let Some(step) = step else {
                log_warn!("zone {}: procedure or step missing mid-execution", id);
                self.finish_execution(id, now);
                return;
            };

            let effective_ms = step.timeout_ms.min(self.config.step_timeout_cap_ms);
            let overrun_fails = self.config.overrun == OverrunPolicy::FailStep
                && step.timeout_ms > self.config.step_timeout_cap_ms;

            match state {
                StepState::Pending => {
                    let issued = self.actuator.execute(id, &step);
                    let Some(exec) = self.executions.get_mut(&id) else {
                        return;
                    };
                    match issued {
                        Ok(()) => {
                            exec.steps[current] = StepState::Executing { started_at: start_at };
                        }
                        Err(_err) => {
                            // Command never went out; fail and move on
                            exec.steps[current] = StepState::Failed { at: start_at };
                            exec.any_failed = true;
                            exec.current_step += 1;
                            log_warn!(
                                "zone {}: step {} ({}) actuation failed: {}",
                                id,
                                current,
                                step.action.name(),
                                _err
                            );
                            if exec.is_complete() {
                                self.finish_execution(id, start_at);
                                return;
                            }
                        }
                    }
                }
                StepState::Executing { started_at } => {
                    let done_at = started_at + effective_ms;
                    if now < done_at {
                        return;
                    }
                    let Some(exec) = self.executions.get_mut(&id) else {
                        return;
                    };
                    if overrun_fails {
                        exec.steps[current] = StepState::Failed { at: done_at };
                        exec.any_failed = true;
                        log_warn!(
                            "zone {}: step {} ({}) exceeded the {} ms cap; marked failed",
                            id,
                            current,
                            step.action.name(),
                            effective_ms
                        );
                    } else {
                        exec.steps[current] = StepState::Completed { at: done_at };
                    }
                    exec.current_step += 1;
                    if exec.is_complete() {
                        self.finish_execution(id, done_at);
                        return;
                    }
                }
                // Terminal states never sit at current_step
                StepState::Completed { .. } | StepState::Failed { .. } => {
                    let Some(exec) = self.executions.get_mut(&id) else {
                        return;
                    };
                    exec.current_step += 1;
                    if exec.is_complete() {
                        self.finish_execution(id, now);
                        return;
                    }
                }
            }
        }
    }

    /// Destroy the execution and settle the zone into cooldown
    fn finish_execution(&mut self, id: Id, at: Timestamp) {
        let Some(exec) = self.executions.remove(&id) else {
            return;
        };
        let status = if exec.any_failed {
            ShutdownStatus::Failed
        } else {
            ShutdownStatus::Completed
        };
        let actual_ms = at.saturating_sub(exec.started_at);

        if let Some(z) = self.zones.get_mut(&id) {
            z.status.cooldown_remaining_ms = self.config.cooldown_ms;
            z.status.last_shutdown = Some(at);
        }

        let mut finished = None;
        if let Some(event) = self.history.find_mut(|e| e.id == exec.event_id) {
            event.status = status;
            event.actual_ms = Some(actual_ms);
            finished = Some(*event);
        }
        if let Some(event) = finished {
            self.notifier.dispatch_shutdown(&event);
        }
        log_info!(
            "zone {}: procedure {} finished ({:?}) in {} ms",
            id,
            exec.procedure,
            status,
            actual_ms
        );
    }

    /// Abort the running execution in favor of a higher-severity trigger
    fn supersede_execution(&mut self, id: Id, at: Timestamp) {
        let Some(exec) = self.executions.remove(&id) else {
            return;
        };
        let actual_ms = at.saturating_sub(exec.started_at);

        let mut superseded = None;
        if let Some(event) = self.history.find_mut(|e| e.id == exec.event_id) {
            event.status = ShutdownStatus::Superseded;
            event.actual_ms = Some(actual_ms);
            superseded = Some(*event);
        }
        if let Some(event) = superseded {
            self.notifier.dispatch_shutdown(&event);
        }
        log_warn!(
            "zone {}: procedure {} superseded after {} ms",
            id,
            exec.procedure,
            actual_ms
        );
    }

    // ------------------------------------------------------------------
    // Reactivation
    // ------------------------------------------------------------------

    /// Whether all reactivation preconditions currently hold
    pub fn can_reactivate(&self, zone: &str) -> ZoneResult<bool> {
        let id = Id::new(zone).ok_or(ZoneError::NotFound)?;
        Ok(self.reactivation_block(id)?.is_none())
    }

    /// Return a shut-down zone to service
    ///
    /// Fails with the first violated precondition; on success clears the
    /// shutdown flag, restores the operational flag, resets fault
    /// conditions and emits an informational alert.
    pub fn reactivate(&mut self, zone: &str, now: Timestamp) -> ZoneResult<()> {
        let id = Id::new(zone).ok_or(ZoneError::NotFound)?;
        if let Some(reason) = self.reactivation_block(id)? {
            return Err(ZoneError::ReactivationBlocked { reason });
        }

        let (temperature_c, limit) = {
            // Precondition check guarantees presence
            let Some(z) = self.zones.get_mut(&id) else {
                return Err(ZoneError::NotFound);
            };
            z.status.shutdown_active = false;
            z.status.operational = true;
            z.status.faults.clear();
            (
                z.status.temperature_c,
                z.limits.normal_c + self.config.hysteresis_c,
            )
        };

        self.emit_alert(ZoneAlert {
            zone: id,
            severity: Severity::Normal,
            kind: AlertKind::Reactivated,
            value: temperature_c,
            limit,
            timestamp: now,
        });
        log_info!("zone {}: reactivated at {} °C", id, temperature_c);
        Ok(())
    }

    fn reactivation_block(&self, id: Id) -> ZoneResult<Option<ReactivationBlock>> {
        let z = self.zones.get(&id).ok_or(ZoneError::NotFound)?;

        if !z.status.shutdown_active {
            return Ok(Some(ReactivationBlock::NotShutDown));
        }
        if self.executions.contains_key(&id) {
            return Ok(Some(ReactivationBlock::ProcedureRunning));
        }
        if z.status.cooldown_remaining_ms > 0 {
            return Ok(Some(ReactivationBlock::CoolingDown));
        }
        if z.status.temperature_c > z.limits.normal_c + self.config.hysteresis_c {
            return Ok(Some(ReactivationBlock::TemperatureHigh));
        }
        if libm::fabsf(z.status.gradient_c_per_s) > REACTIVATION_GRADIENT_LIMIT_C_PER_S {
            return Ok(Some(ReactivationBlock::GradientUnstable));
        }
        Ok(None)
    }

    // ------------------------------------------------------------------
    // Diagnostics and fan-out
    // ------------------------------------------------------------------

    /// Aggregate zone counts and the rolling shutdown rate
    pub fn statistics(&self, now: Timestamp) -> SystemStatistics {
        let mut operational = 0;
        let mut shutting_down = 0;
        let mut cooldown = 0;
        let mut temperature_sum = 0.0;
        let mut measured = 0;

        for z in self.zones.values() {
            if self.executions.contains_key(&z.id) {
                shutting_down += 1;
            } else if z.status.shutdown_active {
                cooldown += 1;
            } else {
                operational += 1;
            }
            if z.status.last_update.is_some() {
                temperature_sum += z.status.temperature_c;
                measured += 1;
            }
        }

        let shutdowns_last_hour = self
            .history
            .iter()
            .filter(|e| {
                e.status != ShutdownStatus::Suppressed
                    && now.saturating_sub(e.started_at) < SHUTDOWN_RATE_WINDOW_MS
            })
            .count();

        SystemStatistics {
            zones: self.zones.len(),
            operational_zones: operational,
            shutting_down_zones: shutting_down,
            cooldown_zones: cooldown,
            shutdowns_last_hour,
            mean_temperature_c: if measured > 0 {
                temperature_sum / measured as f32
            } else {
                0.0
            },
        }
    }

    /// Shutdown-event history, oldest first, optionally filtered by zone
    pub fn shutdown_history(&self, zone: Option<&str>) -> impl Iterator<Item = &ShutdownEvent> {
        // An unparseable filter id matches nothing rather than everything
        let filter = zone.map(|z| Id::new(z).unwrap_or_default());
        self.history
            .iter()
            .filter(move |e| filter.map_or(true, |z| e.zone == z))
    }

    /// Look up a zone by id
    pub fn get_zone(&self, id: &str) -> Option<&Zone> {
        let id = Id::new(id)?;
        self.zones.get(&id)
    }

    /// Iterate over all zones
    pub fn zones(&self) -> impl Iterator<Item = &Zone> {
        self.zones.values()
    }

    /// Number of zones
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Check whether no zones exist
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Derived state of a zone's shutdown machine
    pub fn zone_state(&self, id: &str) -> Option<ZoneState> {
        let id = Id::new(id)?;
        let z = self.zones.get(&id)?;
        if let Some(exec) = self.executions.get(&id) {
            Some(ZoneState::ShuttingDown {
                step: exec.current_step,
            })
        } else if z.status.shutdown_active {
            Some(ZoneState::Cooldown)
        } else {
            Some(ZoneState::Operational)
        }
    }

    /// The active execution for a zone, if any
    pub fn execution(&self, id: &str) -> Option<&ShutdownExecution> {
        let id = Id::new(id)?;
        self.executions.get(&id)
    }

    /// Register an alert listener; `None` when the table is full
    pub fn subscribe_alerts(&mut self, listener: Box<dyn AlertListener>) -> Option<SubscriptionId> {
        self.notifier.subscribe_alerts(listener)
    }

    /// Remove an alert listener
    pub fn unsubscribe_alerts(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe_alerts(id)
    }

    /// Register a shutdown-event listener; `None` when the table is full
    pub fn subscribe_shutdown_events(
        &mut self,
        listener: Box<dyn ShutdownListener>,
    ) -> Option<SubscriptionId> {
        self.notifier.subscribe_shutdowns(listener)
    }

    /// Remove a shutdown-event listener
    pub fn unsubscribe_shutdown_events(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe_shutdowns(id)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn emit_alert(&mut self, alert: ZoneAlert) {
        if self.config.alerts_enabled {
            self.notifier.dispatch_alert(&alert);
        }
    }

    /// Executed (non-suppressed) shutdowns for a zone within the window
    fn shutdowns_in_window(&self, zone: Id, now: Timestamp) -> usize {
        self.history
            .iter()
            .filter(|e| {
                e.zone == zone
                    && e.status != ShutdownStatus::Suppressed
                    && now.saturating_sub(e.started_at) < SHUTDOWN_RATE_WINDOW_MS
            })
            .count()
    }

    fn next_event_id(&mut self) -> u32 {
        let id = self.next_event_id;
        self.next_event_id = self.next_event_id.wrapping_add(1);
        id
    }
}

/// Violation evaluation, descending severity; returns the tier, the reason
/// and the threshold that was crossed
fn evaluate(
    limits: &ThermalLimits,
    temperature_c: f32,
    gradient_c_per_s: f32,
) -> Option<(Severity, TriggerReason, f32)> {
    if temperature_c >= limits.emergency_c {
        return Some((
            Severity::Emergency,
            TriggerReason::OverTemperature { value: temperature_c },
            limits.emergency_c,
        ));
    }
    if gradient_c_per_s >= 2.0 * limits.max_gradient_c_per_s {
        return Some((
            Severity::Emergency,
            TriggerReason::GradientExceeded { value: gradient_c_per_s },
            2.0 * limits.max_gradient_c_per_s,
        ));
    }
    if temperature_c >= limits.critical_c {
        return Some((
            Severity::Critical,
            TriggerReason::OverTemperature { value: temperature_c },
            limits.critical_c,
        ));
    }
    if gradient_c_per_s >= limits.max_gradient_c_per_s {
        return Some((
            Severity::Critical,
            TriggerReason::GradientExceeded { value: gradient_c_per_s },
            limits.max_gradient_c_per_s,
        ));
    }
    if temperature_c >= limits.warning_c {
        return Some((
            Severity::Warning,
            TriggerReason::OverTemperature { value: temperature_c },
            limits.warning_c,
        ));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> ZoneBounds {
        ZoneBounds {
            min: [0.0; 3],
            max: [1.0; 3],
        }
    }

    fn orchestrator() -> ZoneOrchestrator {
        let mut orch = ZoneOrchestrator::new(OrchestratorConfig::default());
        orch.create_zone(
            "pack_a",
            PriorityClass::Critical,
            ThermalLimits::default(),
            bounds(),
            None,
        )
        .unwrap();
        orch
    }

    #[test]
    fn create_zone_rejects_duplicates_and_bad_tiers() {
        let mut orch = orchestrator();

        assert_eq!(
            orch.create_zone(
                "pack_a",
                PriorityClass::High,
                ThermalLimits::default(),
                bounds(),
                None
            ),
            Err(ZoneError::DuplicateZone)
        );

        let bad = ThermalLimits {
            warning_c: 110.0,
            ..ThermalLimits::default()
        };
        assert!(matches!(
            orch.create_zone("pack_b", PriorityClass::High, bad, bounds(), None),
            Err(ZoneError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn default_procedures_generated() {
        let orch = orchestrator();
        let zone = orch.get_zone("pack_a").unwrap();

        assert_eq!(zone.procedures.len(), 3);
        assert!(zone.procedure_for(Severity::Warning).is_some());
        assert!(zone.procedure_for(Severity::Critical).is_some());
        assert!(zone.procedure_for(Severity::Emergency).is_some());
        assert!(zone.procedure_for(Severity::Normal).is_none());
    }

    #[test]
    fn evaluate_descends_by_severity() {
        let limits = ThermalLimits::default();

        assert!(evaluate(&limits, 50.0, 0.0).is_none());
        assert_eq!(
            evaluate(&limits, 85.0, 0.0).map(|v| v.0),
            Some(Severity::Warning)
        );
        assert_eq!(
            evaluate(&limits, 105.0, 0.0).map(|v| v.0),
            Some(Severity::Critical)
        );
        assert_eq!(
            evaluate(&limits, 125.0, 0.0).map(|v| v.0),
            Some(Severity::Emergency)
        );
        // Gradient triggers: max is 5.0 °C/s
        assert_eq!(
            evaluate(&limits, 50.0, 6.0).map(|v| v.0),
            Some(Severity::Critical)
        );
        assert_eq!(
            evaluate(&limits, 50.0, 11.0).map(|v| v.0),
            Some(Severity::Emergency)
        );
    }

    #[test]
    fn emergency_update_starts_one_execution() {
        let mut orch = orchestrator();

        let triggered = orch.update_status("pack_a", 125.0, None, 1_000).unwrap();
        assert_eq!(triggered, Some(Severity::Emergency));
        assert!(orch.get_zone("pack_a").unwrap().status.shutdown_active);
        assert!(orch.execution("pack_a").is_some());

        // Second violation while active: evaluation skipped
        let triggered = orch.update_status("pack_a", 130.0, None, 2_000).unwrap();
        assert_eq!(triggered, None);
        assert_eq!(orch.shutdown_history(None).count(), 1);
    }

    #[test]
    fn manual_trigger_without_zone_fails() {
        let mut orch = orchestrator();
        assert_eq!(
            orch.trigger_shutdown("ghost", Severity::Warning, 0),
            Err(ZoneError::NotFound)
        );
    }

    #[test]
    fn disabled_automatic_shutdown_drops_triggers() {
        let config = OrchestratorConfig::default().with_automatic_shutdown(false);
        let mut orch = ZoneOrchestrator::new(config);
        orch.create_zone(
            "pack_a",
            PriorityClass::High,
            ThermalLimits::default(),
            bounds(),
            None,
        )
        .unwrap();

        assert_eq!(
            orch.trigger_shutdown("pack_a", Severity::Warning, 0),
            Ok(false)
        );
        assert!(!orch.get_zone("pack_a").unwrap().status.shutdown_active);
        assert_eq!(orch.shutdown_history(None).count(), 0);
    }

    #[test]
    fn steps_advance_with_process() {
        let mut orch = orchestrator();
        orch.update_status("pack_a", 125.0, None, 0).unwrap();

        // Emergency defaults: 500 ms + 1000 ms + 5000 ms
        assert_eq!(
            orch.zone_state("pack_a"),
            Some(ZoneState::ShuttingDown { step: 0 })
        );

        orch.process(600);
        assert_eq!(
            orch.zone_state("pack_a"),
            Some(ZoneState::ShuttingDown { step: 1 })
        );

        orch.process(6_500);
        assert_eq!(orch.zone_state("pack_a"), Some(ZoneState::Cooldown));

        let event = orch.shutdown_history(None).next().unwrap();
        assert_eq!(event.status, ShutdownStatus::Completed);
        assert_eq!(event.actual_ms, Some(6_500));
    }

    #[test]
    fn coarse_tick_completes_whole_procedure() {
        let mut orch = orchestrator();
        orch.update_status("pack_a", 125.0, None, 0).unwrap();
        orch.process(1_000_000);

        assert_eq!(orch.zone_state("pack_a"), Some(ZoneState::Cooldown));
        assert!(orch.execution("pack_a").is_none());
    }

    #[test]
    fn statistics_track_zone_states() {
        let mut orch = orchestrator();
        orch.create_zone(
            "motor_fl",
            PriorityClass::High,
            ThermalLimits::default(),
            bounds(),
            None,
        )
        .unwrap();

        orch.update_status("pack_a", 50.0, Some(120.0), 1_000).unwrap();
        orch.update_status("motor_fl", 70.0, None, 1_000).unwrap();

        let stats = orch.statistics(1_000);
        assert_eq!(stats.zones, 2);
        assert_eq!(stats.operational_zones, 2);
        assert_eq!(stats.shutdowns_last_hour, 0);
        assert!((stats.mean_temperature_c - 60.0).abs() < 1e-6);

        orch.update_status("pack_a", 125.0, None, 2_000).unwrap();
        let stats = orch.statistics(2_000);
        assert_eq!(stats.shutting_down_zones, 1);
        assert_eq!(stats.operational_zones, 1);
        assert_eq!(stats.shutdowns_last_hour, 1);
    }
}
