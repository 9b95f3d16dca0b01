//! Rounding rules shared by the table lookups.
//!
//! Everything rounds half-up (toward positive infinity on a tie), so `-0.5`
//! lands on `0` rather than `-1`.

use crate::utils::constants::TENTHS_PER_DEGREE;

/// Round to the nearest integer, ties upward.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Nearest integer as `i32`; `None` for non-finite input.
pub fn round_to_int(value: f64) -> Option<i32> {
    if !value.is_finite() {
        return None;
    }
    let rounded = round_half_up(value);
    if rounded < i32::MIN as f64 || rounded > i32::MAX as f64 {
        return None;
    }
    Some(rounded as i32)
}

/// Absolute difference in tenths of a degree, i.e. `|a - b|` to one decimal.
pub fn difference_in_tenths(a: f64, b: f64) -> Option<u32> {
    let tenths = round_half_up((a - b).abs() * TENTHS_PER_DEGREE);
    if !tenths.is_finite() || tenths > u32::MAX as f64 {
        return None;
    }
    Some(tenths as u32)
}

/// Round to the nearest multiple of `step`.
pub fn round_to_multiple(value: f64, step: f64) -> f64 {
    round_half_up(value / step) * step
}

/// Round to two decimal places for display and payloads.
pub fn round_2dp(value: f64) -> f64 {
    round_half_up(value * 100.0) / 100.0
}

/// Parse a one-decimal difference header like `"2.3"` into tenths.
pub fn parse_tenths(text: &str) -> Option<u32> {
    let value: f64 = text.trim().parse().ok()?;
    if value < 0.0 {
        return None;
    }
    let tenths = round_half_up(value * TENTHS_PER_DEGREE);
    // Reject anything finer than a tenth
    if ((tenths / TENTHS_PER_DEGREE) - value).abs() > 1e-9 {
        return None;
    }
    Some(tenths as u32)
}

pub fn tenths_to_degrees(tenths: u32) -> f64 {
    tenths as f64 / TENTHS_PER_DEGREE
}
