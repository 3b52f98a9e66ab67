//! Time Conversions, Rolling Windows and Default Durations

// ===== CONVERSIONS =====

/// Milliseconds per second.
pub const MS_PER_SECOND: u64 = 1_000;

/// Milliseconds per minute.
pub const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;

/// Milliseconds per hour.
pub const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;

/// Milliseconds per operating hour, as f32 for hour accumulation.
pub const MS_PER_HOUR_F32: f32 = 3_600_000.0;

// ===== ROLLING WINDOWS =====

/// Rolling window for the shutdown-frequency limit: no more than the
/// configured cap of shutdowns per zone within this window.
pub const SHUTDOWN_RATE_WINDOW_MS: u64 = MS_PER_HOUR;

// ===== DEFAULT DURATIONS =====

/// Default mandatory cooldown after a completed shutdown: 5 minutes.
pub const DEFAULT_COOLDOWN_MS: u64 = 5 * MS_PER_MINUTE;

/// Default delay between trigger and the first step. Zero: act immediately.
pub const DEFAULT_SHUTDOWN_DELAY_MS: u64 = 0;

/// Default backstop cap on a single step's execution time. A step whose
/// nominal timeout exceeds this is truncated or failed per the configured
/// overrun policy.
pub const DEFAULT_STEP_TIMEOUT_CAP_MS: u64 = 10 * MS_PER_SECOND;

/// Default per-step timeout used by generated default procedures.
pub const DEFAULT_STEP_TIMEOUT_MS: u64 = 5 * MS_PER_SECOND;

/// Default operating hours between calibrations: one year.
pub const DEFAULT_CALIBRATION_INTERVAL_HOURS: f32 = 8_760.0;
