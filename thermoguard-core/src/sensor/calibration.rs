//! Calibration Coefficients and Reference-Point Recalibration
//!
//! Calibration is a pure linear transform applied to every raw sample:
//!
//! ```text
//! current'     = raw.current     x current_multiplier
//! voltage'     = raw.voltage     x voltage_multiplier
//! temperature' = raw.temperature x temperature_multiplier + temperature_offset
//! resistance'  = raw.resistance  + resistance_offset
//! ```
//!
//! Recalibration compares the last accepted reading against reference
//! conditions measured externally and adjusts the coefficients so that the
//! same raw input would have reproduced the reference. Calibrating at the
//! exact values of the last reading is therefore a no-op - the idempotence
//! property the registry tests rely on.

use crate::constants::limits::MIN_CURRENT_A;
use crate::time::Timestamp;

use super::{RawSample, Reading};

/// Linear calibration coefficients for one sensing element
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalibrationCoefficients {
    /// Multiplier applied to raw current
    pub current_multiplier: f32,
    /// Multiplier applied to raw voltage
    pub voltage_multiplier: f32,
    /// Multiplier applied to raw temperature
    pub temperature_multiplier: f32,
    /// Offset (°C) added after the temperature multiplier
    pub temperature_offset: f32,
    /// Offset (Ω) added to raw resistance
    pub resistance_offset: f32,
}

impl Default for CalibrationCoefficients {
    fn default() -> Self {
        Self {
            current_multiplier: 1.0,
            voltage_multiplier: 1.0,
            temperature_multiplier: 1.0,
            temperature_offset: 0.0,
            resistance_offset: 0.0,
        }
    }
}

/// Calibrated electrical quantities, before validation and derivation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibrated {
    /// Calibrated current (A)
    pub current_a: f32,
    /// Calibrated voltage (V)
    pub voltage_v: f32,
    /// Calibrated temperature (°C)
    pub temperature_c: f32,
    /// Calibrated resistance (Ω)
    pub resistance_ohm: f32,
}

impl CalibrationCoefficients {
    /// Apply the linear transform to a raw sample
    pub fn apply(&self, raw: &RawSample) -> Calibrated {
        Calibrated {
            current_a: raw.current_a * self.current_multiplier,
            voltage_v: raw.voltage_v * self.voltage_multiplier,
            temperature_c: raw.temperature_c * self.temperature_multiplier
                + self.temperature_offset,
            resistance_ohm: raw.resistance_ohm + self.resistance_offset,
        }
    }

    /// Derive adjusted coefficients from reference conditions
    ///
    /// `last` is the most recent accepted (already calibrated) reading;
    /// `reference` is what the external reference instrument measured at
    /// that moment. Multipliers scale by `reference / last` (ε-guarded) and
    /// the temperature offset shifts by the residual.
    pub fn adjusted(&self, last: &Reading, reference: ReferencePoint) -> Self {
        let current_ratio = reference.current_a / last.current_a.max(MIN_CURRENT_A);
        let voltage_ratio = reference.voltage_v / last.voltage_v.max(MIN_CURRENT_A);

        Self {
            current_multiplier: self.current_multiplier * current_ratio,
            voltage_multiplier: self.voltage_multiplier * voltage_ratio,
            temperature_multiplier: self.temperature_multiplier,
            temperature_offset: self.temperature_offset
                + (reference.temperature_c - last.temperature_c),
            resistance_offset: self.resistance_offset,
        }
    }
}

/// Externally measured reference conditions for recalibration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferencePoint {
    /// Reference temperature (°C)
    pub temperature_c: f32,
    /// Reference current (A)
    pub current_a: f32,
    /// Reference voltage (V)
    pub voltage_v: f32,
}

/// One entry in a sensor's calibration log
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationRecord {
    /// Timestamp of the reading the adjustment was derived from
    pub timestamp: Timestamp,
    /// Coefficients before the adjustment
    pub before: CalibrationCoefficients,
    /// Coefficients after the adjustment
    pub after: CalibrationCoefficients,
    /// Reference conditions used
    pub reference: ReferencePoint,
}
