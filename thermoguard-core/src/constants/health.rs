//! Health-Score Weights and Thresholds
//!
//! The sensor health score starts at 1.0 on every update and is multiplied
//! down by the factors below, then clamped to [0, 1]. Constants here define
//! the penalty weights; the scoring function itself lives in
//! `sensor::health` and is pure.

// ===== STABILITY (VARIANCE) PENALTY =====

/// Readings considered by the variance check and diagnostics averages.
///
/// Ten samples is the smallest window that distinguishes sustained
/// instability from a single spike.
pub const VARIANCE_WINDOW: usize = 10;

/// Current variance (A²) above which the stability penalty applies.
///
/// 0.25 A² corresponds to a ±0.5 A swing - beyond normal load modulation
/// for a thermoelectric module.
pub const CURRENT_VARIANCE_LIMIT_A2: f32 = 0.25;

/// Temperature variance (°C²) above which the stability penalty applies.
///
/// 4.0 °C² corresponds to ±2 °C oscillation over ten consecutive samples;
/// thermal mass makes genuine swings that fast implausible.
pub const TEMPERATURE_VARIANCE_LIMIT_C2: f32 = 4.0;

/// Multiplier applied when either variance limit is exceeded.
pub const VARIANCE_PENALTY: f32 = 0.9;

// ===== ERROR-HISTORY PENALTY =====

/// Health multiplier lost per accumulated communication error.
pub const ERROR_PENALTY_PER_ERROR: f32 = 0.1;

/// Floor of the error-history multiplier: `max(0.5, 1 - 0.1 x errors)`.
pub const ERROR_PENALTY_FLOOR: f32 = 0.5;

// ===== AGE DERATING =====

/// Design life of a thermoelectric sensing element: 10 years of operation.
pub const DESIGN_LIFE_HOURS: f32 = 87_600.0;

/// Age multiplier at (and beyond) end of design life. Derating is linear
/// from 1.0 at zero hours down to this floor.
pub const AGE_DERATING_FLOOR: f32 = 0.5;

// ===== STATUS DERIVATION =====

/// Health below this flags the sensor for maintenance.
pub const MAINTENANCE_HEALTH_THRESHOLD: f32 = 0.7;

/// More than this many simultaneous fault codes flags maintenance.
pub const MAINTENANCE_FAULT_COUNT: usize = 2;

/// Health at or below this clears the operational flag.
pub const OPERATIONAL_HEALTH_FLOOR: f32 = 0.3;

/// Signal quality at or below this clears the operational flag.
pub const OPERATIONAL_QUALITY_FLOOR: f32 = 0.5;
