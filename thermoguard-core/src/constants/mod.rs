//! Constants for ThermoGuard Core
//!
//! Centralized, documented constants used throughout the controller. All
//! numeric values live here with their purpose and rationale; nothing in the
//! state machines hard-codes a magic number.
//!
//! ## Organization
//!
//! - **Buffers**: table and history capacities (memory budget)
//! - **Health**: health-score weights and thresholds
//! - **Limits**: validation envelopes, fault fractions, default thermal tiers
//! - **Time**: conversions, windows, default durations

/// Table and history capacities.
pub mod buffers;

/// Health-score weights, variance thresholds and derating parameters.
pub mod health;

/// Validation envelopes, fault-scan fractions and default thermal limits.
pub mod limits;

/// Time conversions, rolling windows and default durations.
pub mod time;

// Re-export commonly used constants for convenience
pub use buffers::{MAX_SENSORS, MAX_ZONES, READING_HISTORY, SHUTDOWN_HISTORY};
pub use health::{DESIGN_LIFE_HOURS, VARIANCE_WINDOW};
pub use limits::{MIN_CURRENT_A, RANGE_TOLERANCE, REACTIVATION_GRADIENT_LIMIT_C_PER_S};
pub use time::{MS_PER_HOUR, MS_PER_SECOND, SHUTDOWN_RATE_WINDOW_MS};
