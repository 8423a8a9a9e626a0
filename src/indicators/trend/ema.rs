//! EMA (Exponential Moving Average) indicator

use crate::common::math;

/// Calculate the EMA of `closes` for a specific period.
///
/// Returns `None` when the series is shorter than `period`.
pub fn calculate_ema(closes: &[f64], period: usize) -> Option<f64> {
    math::ema(closes, period)
}

