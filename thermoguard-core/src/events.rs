//! Alert and Shutdown-Event Vocabulary plus the Listener Fan-Out
//!
//! ## Overview
//!
//! This module defines the identifiers and event records that flow out of the
//! controller: zone alerts (violations, suppressions, reactivations) and
//! shutdown lifecycle events (started, completed, failed, superseded,
//! suppressed). Both are broadcast through the [`Notifier`], a
//! registration-based observer list consumed by external collaborators -
//! vehicle control, logging, operator UI.
//!
//! ## Memory Model
//!
//! Event records are designed for bounded, queue-friendly storage:
//! - **Inline ids**: [`Id`] stores up to [`MAX_INLINE_ID`] bytes inline, is
//!   `Copy`, and doubles as the key type of every entity table in the crate.
//! - **`Copy` records**: [`ZoneAlert`] and [`ShutdownEvent`] are plain value
//!   types that fit in the bounded shutdown history without heap allocation.
//!
//! ## Listener Isolation
//!
//! One failing listener must never break the others or the controller.
//! Dispatch wraps every callback in `catch_unwind` when `std` is available;
//! a panicking listener is logged and skipped, never propagated. On `no_std`
//! targets panics abort anyway, so callbacks are invoked directly.

#[cfg(not(feature = "std"))]
use alloc::boxed::Box;

#[cfg(feature = "std")]
use std::boxed::Box;

use core::fmt;

use heapless::Vec;

use crate::constants::buffers::MAX_LISTENERS;
use crate::time::Timestamp;

/// Maximum length for inline ids
///
/// Sensor, zone, procedure and component ids all use inline storage; longer
/// ids are rejected at registration time.
pub const MAX_INLINE_ID: usize = 23;

/// Inline identifier for sensors, zones, procedures and components
///
/// Avoids heap allocation and gives every entity table a `Copy` key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id {
    len: u8,
    data: [u8; MAX_INLINE_ID],
}

impl Id {
    /// Create from a string slice
    ///
    /// Returns `None` when the id exceeds [`MAX_INLINE_ID`] bytes.
    pub fn new(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() > MAX_INLINE_ID {
            return None;
        }

        let mut data = [0u8; MAX_INLINE_ID];
        data[..bytes.len()].copy_from_slice(bytes);

        Some(Self {
            len: bytes.len() as u8,
            data,
        })
    }

    /// View as a string slice
    pub fn as_str(&self) -> &str {
        // Only valid UTF-8 enters through new(); an empty fallback keeps
        // this total without unwinding.
        core::str::from_utf8(&self.data[..self.len as usize]).unwrap_or("")
    }
}

impl Default for Id {
    /// The empty id
    fn default() -> Self {
        Self {
            len: 0,
            data: [0u8; MAX_INLINE_ID],
        }
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity tier for violations, procedures and alerts
///
/// Ordered: `Normal < Warning < Critical < Emergency`. The orchestrator
/// evaluates violations from the top tier down and the escalation policy
/// compares tiers directly through this ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Severity {
    /// Within normal operating limits
    Normal = 0,
    /// Warning threshold crossed
    Warning = 1,
    /// Critical threshold crossed
    Critical = 2,
    /// Emergency threshold crossed
    Emergency = 3,
}

impl Severity {
    /// Get human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            Severity::Normal => "normal",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
            Severity::Emergency => "emergency",
        }
    }
}

/// Priority class of a sensor or zone
///
/// Determines which subsystems the vehicle-level collaborator protects
/// first; the core carries it as routing metadata only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum PriorityClass {
    /// Comfort / auxiliary subsystems
    Low = 0,
    /// Standard subsystems
    Medium = 1,
    /// Drive-relevant subsystems
    High = 2,
    /// Safety-relevant subsystems (battery pack, drive motor)
    Critical = 3,
}

/// What tripped a shutdown trigger
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TriggerReason {
    /// Temperature at or above a tier threshold
    OverTemperature {
        /// Temperature at trigger time (°C)
        value: f32,
    },
    /// Thermal gradient at or above a tier threshold
    GradientExceeded {
        /// Gradient at trigger time (°C/s)
        value: f32,
    },
    /// Externally requested via `trigger_shutdown`
    Manual,
}

/// Alert category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AlertKind {
    /// A temperature tier threshold was crossed
    TemperatureThreshold = 0,
    /// A gradient tier threshold was crossed
    GradientThreshold = 1,
    /// A genuine violation hit the rolling-hour shutdown cap
    ShutdownSuppressed = 2,
    /// Zone returned to operational state
    Reactivated = 3,
}

/// Zone alert broadcast to alert listeners
///
/// Size: ~48 bytes, `Copy`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneAlert {
    /// Zone the alert concerns
    pub zone: Id,
    /// Severity tier of the alert
    pub severity: Severity,
    /// Alert category
    pub kind: AlertKind,
    /// Measured value (temperature or gradient, per kind)
    pub value: f32,
    /// Threshold the value was compared against
    pub limit: f32,
    /// When the alert was raised
    pub timestamp: Timestamp,
}

/// Terminal status of a shutdown event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ShutdownStatus {
    /// Procedure is still executing
    InProgress = 0,
    /// All steps completed
    Completed = 1,
    /// Finished, but at least one step failed
    Failed = 2,
    /// Replaced mid-procedure by a higher-severity trigger
    Superseded = 3,
    /// Trigger suppressed by the rolling-hour frequency cap
    Suppressed = 4,
}

/// Append-only shutdown lifecycle record
///
/// Stored in the bounded shutdown history; drives the rolling-hour frequency
/// limit (suppressed records are excluded from the count) and external
/// reporting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShutdownEvent {
    /// Monotonic event id, unique within the orchestrator
    pub id: u32,
    /// Zone the procedure ran against
    pub zone: Id,
    /// Procedure that was (or would have been) executed
    pub procedure: Id,
    /// What tripped the trigger
    pub reason: TriggerReason,
    /// Severity tier of the procedure
    pub severity: Severity,
    /// When the trigger fired
    pub started_at: Timestamp,
    /// Estimated duration at trigger time (ms)
    pub estimated_ms: u64,
    /// Actual duration once finished (ms)
    pub actual_ms: Option<u64>,
    /// Lifecycle status
    pub status: ShutdownStatus,
}

/// Receiver of zone alerts
pub trait AlertListener: Send {
    /// Called for every alert; must not block
    fn on_alert(&mut self, alert: &ZoneAlert);
}

/// Receiver of shutdown lifecycle events
pub trait ShutdownListener: Send {
    /// Called when a shutdown starts, finishes, or is suppressed
    fn on_event(&mut self, event: &ShutdownEvent);
}

/// Handle returned by subscription calls; passes to `unsubscribe_*`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u32);

/// Registration-based fan-out of alerts and shutdown events
///
/// Bounded observer list. Subscribing past [`MAX_LISTENERS`] per channel
/// returns `None`; dispatch isolates each listener (see module docs).
pub struct Notifier {
    alerts: Vec<(u32, Box<dyn AlertListener>), MAX_LISTENERS>,
    shutdowns: Vec<(u32, Box<dyn ShutdownListener>), MAX_LISTENERS>,
    next_id: u32,
}

impl Notifier {
    /// Create an empty notifier
    pub fn new() -> Self {
        Self {
            alerts: Vec::new(),
            shutdowns: Vec::new(),
            next_id: 0,
        }
    }

    /// Register an alert listener
    ///
    /// Returns `None` when the listener table is full.
    pub fn subscribe_alerts(&mut self, listener: Box<dyn AlertListener>) -> Option<SubscriptionId> {
        let id = self.next_id;
        self.alerts.push((id, listener)).ok()?;
        self.next_id += 1;
        Some(SubscriptionId(id))
    }

    /// Register a shutdown-event listener
    ///
    /// Returns `None` when the listener table is full.
    pub fn subscribe_shutdowns(
        &mut self,
        listener: Box<dyn ShutdownListener>,
    ) -> Option<SubscriptionId> {
        let id = self.next_id;
        self.shutdowns.push((id, listener)).ok()?;
        self.next_id += 1;
        Some(SubscriptionId(id))
    }

    /// Remove an alert listener; returns whether it was present
    pub fn unsubscribe_alerts(&mut self, id: SubscriptionId) -> bool {
        let before = self.alerts.len();
        self.alerts.retain(|(sub, _)| *sub != id.0);
        self.alerts.len() != before
    }

    /// Remove a shutdown-event listener; returns whether it was present
    pub fn unsubscribe_shutdowns(&mut self, id: SubscriptionId) -> bool {
        let before = self.shutdowns.len();
        self.shutdowns.retain(|(sub, _)| *sub != id.0);
        self.shutdowns.len() != before
    }

    /// Broadcast an alert to all alert listeners
    pub fn dispatch_alert(&mut self, alert: &ZoneAlert) {
        for (id, listener) in self.alerts.iter_mut() {
            Self::guarded(*id, || listener.on_alert(alert));
        }
    }

    /// Broadcast a shutdown event to all shutdown listeners
    pub fn dispatch_shutdown(&mut self, event: &ShutdownEvent) {
        for (id, listener) in self.shutdowns.iter_mut() {
            Self::guarded(*id, || listener.on_event(event));
        }
    }

    #[cfg(feature = "std")]
    fn guarded<F: FnOnce()>(id: u32, call: F) {
        use std::panic::{catch_unwind, AssertUnwindSafe};

        if catch_unwind(AssertUnwindSafe(call)).is_err() {
            log_warn!("listener {} panicked during dispatch; skipped", id);
        }
    }

    #[cfg(not(feature = "std"))]
    fn guarded<F: FnOnce()>(_id: u32, call: F) {
        call();
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::vec::Vec as StdVec;

    struct Recorder(Arc<Mutex<StdVec<AlertKind>>>);

    impl AlertListener for Recorder {
        fn on_alert(&mut self, alert: &ZoneAlert) {
            self.0.lock().unwrap().push(alert.kind);
        }
    }

    struct Panicker;

    impl AlertListener for Panicker {
        fn on_alert(&mut self, _alert: &ZoneAlert) {
            panic!("listener bug");
        }
    }

    fn alert() -> ZoneAlert {
        ZoneAlert {
            zone: Id::new("pack_a").unwrap(),
            severity: Severity::Warning,
            kind: AlertKind::TemperatureThreshold,
            value: 85.0,
            limit: 80.0,
            timestamp: 1_000,
        }
    }

    #[test]
    fn inline_id() {
        let id = Id::new("motor_housing_fl").unwrap();
        assert_eq!(id.as_str(), "motor_housing_fl");

        // Too long
        assert!(Id::new("this_is_a_very_long_sensor_identifier").is_none());
    }

    #[test]
    fn severity_ordering() {
        assert!(Severity::Normal < Severity::Warning);
        assert!(Severity::Warning < Severity::Critical);
        assert!(Severity::Critical < Severity::Emergency);
        assert_eq!(Severity::Emergency.name(), "emergency");
    }

    #[test]
    fn subscribe_dispatch_unsubscribe() {
        let seen = Arc::new(Mutex::new(StdVec::new()));
        let mut notifier = Notifier::new();

        let sub = notifier
            .subscribe_alerts(Box::new(Recorder(seen.clone())))
            .unwrap();

        notifier.dispatch_alert(&alert());
        assert_eq!(seen.lock().unwrap().len(), 1);

        assert!(notifier.unsubscribe_alerts(sub));
        notifier.dispatch_alert(&alert());
        assert_eq!(seen.lock().unwrap().len(), 1);

        // Unknown handle
        assert!(!notifier.unsubscribe_alerts(sub));
    }

    #[test]
    fn panicking_listener_is_isolated() {
        let seen = Arc::new(Mutex::new(StdVec::new()));
        let mut notifier = Notifier::new();

        notifier.subscribe_alerts(Box::new(Panicker)).unwrap();
        notifier
            .subscribe_alerts(Box::new(Recorder(seen.clone())))
            .unwrap();

        // The panicking listener must not prevent the second from running
        notifier.dispatch_alert(&alert());
        assert_eq!(seen.lock().unwrap().len(), 1);
    }
}
