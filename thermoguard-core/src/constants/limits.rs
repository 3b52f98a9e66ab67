//! Validation Envelopes, Fault Fractions and Default Thermal Limits
//!
//! Two groups live here: the tolerances the calibration pipeline validates
//! readings against, and the default thermal-limit tiers used when a zone is
//! created without explicit limits.

// ===== READING VALIDATION =====

/// Headroom factor over spec maxima accepted by validation.
///
/// Readings up to 110% of `max_current`/`max_voltage` are accepted and
/// handled by fault scanning instead; beyond that the sample is rejected as
/// a data fault.
pub const RANGE_TOLERANCE: f32 = 1.1;

/// Margin (°C) beyond the operating range accepted by validation.
pub const TEMP_VALIDATION_MARGIN_C: f32 = 10.0;

/// Smallest current (A) used as a divisor when deriving resistance,
/// avoiding division by zero at open-circuit readings.
pub const MIN_CURRENT_A: f32 = 1e-3;

// ===== FAULT-SCAN FRACTIONS =====

/// Fraction of `max_temperature` above which a high-temperature fault is
/// raised.
pub const HIGH_TEMPERATURE_FRACTION: f32 = 0.9;

/// Fraction of `max_current` above which an overcurrent fault is raised.
pub const OVERCURRENT_FRACTION: f32 = 0.9;

/// Signal quality below which a low-quality fault is raised.
pub const LOW_QUALITY_THRESHOLD: f32 = 0.5;

/// Relative deviation from nominal resistance that raises a drift fault.
///
/// 20% drift indicates junction degradation well before open failure.
pub const RESISTANCE_DRIFT_FRACTION: f32 = 0.2;

// ===== DEFAULT SENSOR SPECIFICATION =====

/// Default maximum continuous current (A) for a thermoelectric module.
pub const DEFAULT_MAX_CURRENT_A: f32 = 5.0;

/// Default maximum voltage (V).
pub const DEFAULT_MAX_VOLTAGE_V: f32 = 48.0;

/// Default maximum element temperature (°C).
pub const DEFAULT_MAX_TEMPERATURE_C: f32 = 150.0;

/// Default operating range (°C) for automotive-grade elements.
pub const DEFAULT_OPERATING_MIN_C: f32 = -40.0;

/// Upper end of the default operating range (°C).
pub const DEFAULT_OPERATING_MAX_C: f32 = 125.0;

/// Default nominal element resistance (Ω).
pub const DEFAULT_NOMINAL_RESISTANCE_OHM: f32 = 10.0;

// ===== DEFAULT THERMAL-LIMIT TIERS =====

/// Default normal-operating ceiling (°C).
pub const DEFAULT_NORMAL_C: f32 = 60.0;

/// Default warning threshold (°C).
pub const DEFAULT_WARNING_C: f32 = 80.0;

/// Default critical threshold (°C).
pub const DEFAULT_CRITICAL_C: f32 = 100.0;

/// Default emergency threshold (°C).
pub const DEFAULT_EMERGENCY_C: f32 = 120.0;

/// Default maximum thermal gradient (°C/s). Twice this value is the
/// emergency gradient trigger.
pub const DEFAULT_MAX_GRADIENT_C_PER_S: f32 = 5.0;

/// Default zone thermal mass (J/°C).
pub const DEFAULT_THERMAL_MASS_J_PER_C: f32 = 500.0;

// ===== REACTIVATION =====

/// |gradient| (°C/s) above which reactivation is refused - the zone must be
/// thermally settled, not merely cool.
pub const REACTIVATION_GRADIENT_LIMIT_C_PER_S: f32 = 1.0;

/// Default hysteresis (°C) above normal-operating that blocks reactivation,
/// preventing rapid on/off cycling.
pub const DEFAULT_HYSTERESIS_C: f32 = 5.0;
