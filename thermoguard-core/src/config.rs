//! Controller Configuration
//!
//! Explicit configuration structs with named fields and documented defaults.
//! Construction is default-then-override: start from `Default::default()`
//! and adjust individual fields through `with_*` builder methods, so every
//! deviation from the defaults is visible at the call site.
//!
//! ```rust
//! use thermoguard_core::config::{OrchestratorConfig, EscalationPolicy};
//!
//! let config = OrchestratorConfig::default()
//!     .with_cooldown_ms(60_000)
//!     .with_max_shutdowns_per_hour(5)
//!     .with_escalation(EscalationPolicy::PreemptLowerSeverity);
//! ```

use crate::constants::limits::DEFAULT_HYSTERESIS_C;
use crate::constants::time::{
    DEFAULT_CALIBRATION_INTERVAL_HOURS, DEFAULT_COOLDOWN_MS, DEFAULT_SHUTDOWN_DELAY_MS,
    DEFAULT_STEP_TIMEOUT_CAP_MS,
};
use crate::sensor::{CalibrationCoefficients, SensorSpec};

/// What happens when a step's nominal timeout exceeds the backstop cap
///
/// The cap (`step_timeout_cap_ms`) bounds how long any single step may
/// occupy, regardless of its configured timeout. Whether hitting the cap is
/// a silent truncation or a step failure is deployment policy, not a hidden
/// constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OverrunPolicy {
    /// Step completes silently at the cap (legacy behavior)
    Truncate,
    /// Step is marked failed at the cap; the procedure still advances
    FailStep,
}

/// Whether a higher-severity violation preempts a running procedure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EscalationPolicy {
    /// Skip threshold evaluation while an execution is active
    IgnoreWhileActive,
    /// A strictly higher-severity violation supersedes the running
    /// execution and starts the matching procedure
    PreemptLowerSeverity,
}

/// Zone orchestrator configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrchestratorConfig {
    /// Master enable for automatic protective shutdown. When false,
    /// triggers are logged and dropped.
    pub automatic_shutdown: bool,
    /// Delay (ms) between a trigger and the first step.
    pub shutdown_delay_ms: u64,
    /// Mandatory cooldown (ms) after a completed procedure.
    pub cooldown_ms: u64,
    /// Temperature margin (°C) above normal-operating that blocks
    /// reactivation.
    pub hysteresis_c: f32,
    /// Shutdowns permitted per zone per rolling 60-minute window.
    pub max_shutdowns_per_hour: u32,
    /// Backstop cap (ms) on a single step's execution time.
    pub step_timeout_cap_ms: u64,
    /// Behavior when a step's nominal timeout exceeds the cap.
    pub overrun: OverrunPolicy,
    /// Preemption policy for violations during an active execution.
    pub escalation: EscalationPolicy,
    /// Master enable for alert dispatch.
    pub alerts_enabled: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            automatic_shutdown: true,
            shutdown_delay_ms: DEFAULT_SHUTDOWN_DELAY_MS,
            cooldown_ms: DEFAULT_COOLDOWN_MS,
            hysteresis_c: DEFAULT_HYSTERESIS_C,
            max_shutdowns_per_hour: 10,
            step_timeout_cap_ms: DEFAULT_STEP_TIMEOUT_CAP_MS,
            overrun: OverrunPolicy::Truncate,
            escalation: EscalationPolicy::IgnoreWhileActive,
            alerts_enabled: true,
        }
    }
}

impl OrchestratorConfig {
    /// Enable or disable automatic shutdown
    pub fn with_automatic_shutdown(mut self, enabled: bool) -> Self {
        self.automatic_shutdown = enabled;
        self
    }

    /// Set the trigger-to-first-step delay
    pub fn with_shutdown_delay_ms(mut self, delay: u64) -> Self {
        self.shutdown_delay_ms = delay;
        self
    }

    /// Set the post-shutdown cooldown duration
    pub fn with_cooldown_ms(mut self, cooldown: u64) -> Self {
        self.cooldown_ms = cooldown;
        self
    }

    /// Set the reactivation hysteresis margin
    pub fn with_hysteresis_c(mut self, margin: f32) -> Self {
        self.hysteresis_c = margin;
        self
    }

    /// Set the rolling-hour shutdown cap
    pub fn with_max_shutdowns_per_hour(mut self, max: u32) -> Self {
        self.max_shutdowns_per_hour = max;
        self
    }

    /// Set the per-step backstop cap
    pub fn with_step_timeout_cap_ms(mut self, cap: u64) -> Self {
        self.step_timeout_cap_ms = cap;
        self
    }

    /// Set the step-overrun policy
    pub fn with_overrun(mut self, policy: OverrunPolicy) -> Self {
        self.overrun = policy;
        self
    }

    /// Set the escalation policy
    pub fn with_escalation(mut self, policy: EscalationPolicy) -> Self {
        self.escalation = policy;
        self
    }

    /// Enable or disable alert dispatch
    pub fn with_alerts_enabled(mut self, enabled: bool) -> Self {
        self.alerts_enabled = enabled;
        self
    }
}

/// Sensor registry configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegistryConfig {
    /// Consecutive communication errors after which a sensor is marked
    /// non-operational with a communication-failure fault.
    pub comm_error_threshold: u32,
    /// Operating hours between calibrations before calibration-due is set.
    pub calibration_interval_hours: f32,
    /// Specification applied to sensors registered without one.
    pub default_spec: SensorSpec,
    /// Calibration applied to sensors registered without one.
    pub default_calibration: CalibrationCoefficients,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            comm_error_threshold: 5,
            calibration_interval_hours: DEFAULT_CALIBRATION_INTERVAL_HOURS,
            default_spec: SensorSpec::default(),
            default_calibration: CalibrationCoefficients::default(),
        }
    }
}

impl RegistryConfig {
    /// Set the consecutive-communication-error threshold
    pub fn with_comm_error_threshold(mut self, threshold: u32) -> Self {
        self.comm_error_threshold = threshold;
        self
    }

    /// Set the calibration interval
    pub fn with_calibration_interval_hours(mut self, hours: f32) -> Self {
        self.calibration_interval_hours = hours;
        self
    }

    /// Set the default sensor specification
    pub fn with_default_spec(mut self, spec: SensorSpec) -> Self {
        self.default_spec = spec;
        self
    }

    /// Set the default calibration coefficients
    pub fn with_default_calibration(mut self, calibration: CalibrationCoefficients) -> Self {
        self.default_calibration = calibration;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_then_override() {
        let config = OrchestratorConfig::default()
            .with_cooldown_ms(60_000)
            .with_max_shutdowns_per_hour(5);

        assert!(config.automatic_shutdown);
        assert_eq!(config.cooldown_ms, 60_000);
        assert_eq!(config.max_shutdowns_per_hour, 5);
        assert_eq!(config.overrun, OverrunPolicy::Truncate);
        assert_eq!(config.escalation, EscalationPolicy::IgnoreWhileActive);
    }

    #[test]
    fn registry_defaults() {
        let config = RegistryConfig::default();
        assert_eq!(config.comm_error_threshold, 5);
        assert!(config.calibration_interval_hours > 0.0);
    }
}
