//! Table and History Capacities
//!
//! All collections in the controller are bounded; these constants set the
//! memory budget. Map capacities must be powers of two (FNV index map
//! requirement); history capacities may be arbitrary.

// ===== ENTITY TABLES =====

/// Maximum registered sensors.
///
/// Sized for a full vehicle fit-out: per-cell-group pack sensing plus
/// motor, inverter and charger modules. Power of two.
///
/// Dominates the registry's footprint: each sensor carries its reading
/// history inline (~12 KB at the default history depth).
pub const MAX_SENSORS: usize = 32;

/// Maximum thermal zones.
///
/// A platform has on the order of a dozen protected regions (pack sections,
/// drive units, power electronics, charge port). Power of two.
pub const MAX_ZONES: usize = 16;

// ===== PER-SENSOR HISTORIES =====

/// Per-sensor reading history depth.
///
/// 256 samples covers ~4 minutes at 1 Hz - enough for variance windows,
/// drift inspection and post-incident review. Oldest readings are evicted
/// beyond this cap. Power of two, and the dominant term of the per-sensor
/// footprint (~12 KB); the full sensor table must stay stack-friendly.
pub const READING_HISTORY: usize = 256;

/// Per-sensor calibration log depth.
///
/// Calibrations are rare (service events); 16 records outlive any realistic
/// maintenance history.
pub const CALIBRATION_LOG: usize = 16;

/// Bounded fault-code set per sensor. Power of two; there are fewer
/// distinct fault codes than this.
pub const MAX_FAULT_CODES: usize = 8;

// ===== ZONES AND PROCEDURES =====

/// Shutdown procedures per zone (one per severity tier plus headroom).
pub const MAX_PROCEDURES: usize = 4;

/// Steps per shutdown procedure.
pub const MAX_PROCEDURE_STEPS: usize = 8;

/// Component ids a single step may address. An empty list addresses the
/// whole zone.
pub const MAX_STEP_COMPONENTS: usize = 4;

/// Sensor ids attachable to one zone (weak references, resolved by the
/// caller's fusion layer).
pub const MAX_ZONE_SENSORS: usize = 16;

/// Active fault conditions tracked per zone.
pub const MAX_ZONE_FAULTS: usize = 4;

// ===== EVENT FAN-OUT AND HISTORY =====

/// Shutdown-event history depth.
///
/// Must comfortably exceed `max_shutdowns_per_hour x zones` within the
/// rolling window, or frequency limiting would forget suppressible events.
pub const SHUTDOWN_HISTORY: usize = 256;

/// Listeners per notification channel (alerts, shutdown events).
pub const MAX_LISTENERS: usize = 8;
