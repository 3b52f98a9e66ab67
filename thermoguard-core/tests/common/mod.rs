//! Common fixtures and recording listeners for integration tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use thermoguard_core::events::{Id, PriorityClass};
use thermoguard_core::{
    AlertListener, OrchestratorConfig, RawSample, SensorLocation, ShutdownEvent, ShutdownListener,
    ThermalLimits, ZoneAlert, ZoneBounds, ZoneOrchestrator,
};

/// Standard sensor placement inside the battery-pack zone
pub fn pack_location() -> SensorLocation {
    SensorLocation {
        zone: Id::new("pack_a").unwrap(),
        position: [0.4, 0.2, 0.1],
        priority: PriorityClass::Critical,
    }
}

/// Raw sample with sane electrical values at the given temperature
pub fn sample(timestamp: u64, temperature_c: f32) -> RawSample {
    RawSample {
        timestamp,
        current_a: 1.2,
        voltage_v: 12.0,
        temperature_c,
        resistance_ohm: 10.0,
        signal_quality: 0.97,
    }
}

/// Raw sample with explicit electrical values
pub fn electrical_sample(timestamp: u64, current_a: f32, voltage_v: f32) -> RawSample {
    RawSample {
        timestamp,
        current_a,
        voltage_v,
        temperature_c: 45.0,
        resistance_ohm: 10.0,
        signal_quality: 0.95,
    }
}

/// Orchestrator with one default-limit zone `pack_a`
pub fn orchestrator_with_pack(config: OrchestratorConfig) -> ZoneOrchestrator {
    let mut orch = ZoneOrchestrator::new(config);
    orch.create_zone(
        "pack_a",
        PriorityClass::Critical,
        ThermalLimits::default(),
        ZoneBounds {
            min: [0.0; 3],
            max: [1.2, 0.8, 0.3],
        },
        None,
    )
    .unwrap();
    orch
}

/// Alert listener that records every alert it sees
pub struct RecordingAlerts(Arc<Mutex<Vec<ZoneAlert>>>);

impl RecordingAlerts {
    /// Listener plus a shared handle to the recorded alerts
    pub fn new() -> (Self, Arc<Mutex<Vec<ZoneAlert>>>) {
        let store = Arc::new(Mutex::new(Vec::new()));
        (Self(store.clone()), store)
    }
}

impl AlertListener for RecordingAlerts {
    fn on_alert(&mut self, alert: &ZoneAlert) {
        self.0.lock().unwrap().push(*alert);
    }
}

/// Shutdown listener that records every lifecycle event
pub struct RecordingShutdowns(Arc<Mutex<Vec<ShutdownEvent>>>);

impl RecordingShutdowns {
    /// Listener plus a shared handle to the recorded events
    pub fn new() -> (Self, Arc<Mutex<Vec<ShutdownEvent>>>) {
        let store = Arc::new(Mutex::new(Vec::new()));
        (Self(store.clone()), store)
    }
}

impl ShutdownListener for RecordingShutdowns {
    fn on_event(&mut self, event: &ShutdownEvent) {
        self.0.lock().unwrap().push(*event);
    }
}
