// src/utils/rounding.rs

/// Rounds to two decimal places, halves going up.
///
/// Every average and percentage in the crate goes through this helper.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    // Nudge values like 0.125 that sit just under the half in binary.
    ((value + f64::EPSILON) * 100.0).round() / 100.0
}

/// `total / count` rounded to two decimals; zero when `count` is zero.
pub fn average(total: f64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    round2(total / count as f64)
}
