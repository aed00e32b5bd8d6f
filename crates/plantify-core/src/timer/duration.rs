//! Session length input handling.
//!
//! The duration field accepts anything the user types. Input is never
//! rejected: it is clamped into `[MIN_MINUTES, MAX_MINUTES]`.

pub const MIN_MINUTES: u64 = 1;
pub const MAX_MINUTES: u64 = 120;
pub const DEFAULT_MINUTES: u64 = 25;

/// Parse a minutes value from free-form input.
///
/// Non-numeric, empty, zero and negative input become [`MIN_MINUTES`].
/// Fractions are truncated; values above [`MAX_MINUTES`] are capped.
pub fn parse_minutes(input: &str) -> u64 {
    match input.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => clamp_minutes(value.trunc() as u64),
        Ok(value) if value == f64::INFINITY => MAX_MINUTES,
        _ => MIN_MINUTES,
    }
}

pub fn clamp_minutes(minutes: u64) -> u64 {
    minutes.clamp(MIN_MINUTES, MAX_MINUTES)
}

pub fn minutes_to_secs(minutes: u64) -> u64 {
    clamp_minutes(minutes) * 60
}
