//! Rounding helpers for presented sensor values
//!
//! Presented numbers are rounded half-to-even and are always finite:
//! a non-finite input is reported as missing rather than leaking NaN or
//! infinity into a sensor state.

/// Return the value if it is finite
#[must_use]
pub fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Round to the given number of decimal places, ties to even
///
/// Returns `None` for non-finite input or when scaling overflows.
#[must_use]
pub fn round_to(value: f64, decimals: u32) -> Option<f64> {
    let value = finite(value)?;
    if decimals == 0 {
        return finite(value.round_ties_even());
    }
    let factor = 10f64.powi(i32::try_from(decimals).ok()?);
    let scaled = finite(value * factor)?;
    finite(scaled.round_ties_even() / factor)
}

/// Round to the given number of decimals, falling back to zero
///
/// Used for record fields inside attribute lists, where a missing or
/// unusable number is shown as `0` instead of removing the record.
#[must_use]
pub fn round_or_zero(value: f64, decimals: u32) -> f64 {
    round_to(value, decimals).unwrap_or(0.0)
}
