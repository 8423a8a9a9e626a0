//! MACD (Moving Average Convergence Divergence) indicator

use crate::common::math;
use crate::models::indicators::MacdIndicator;

/// Calculate MACD indicator
///
/// MACD = EMA(fast) - EMA(slow)
/// Signal = EMA(signal) of the MACD line
/// Histogram = MACD - Signal
///
/// All EMAs are seeded with the first value of their input, so only `slow`
/// closes are required.
pub fn calculate_macd(
    closes: &[f64],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
) -> Option<MacdIndicator> {
    if fast_period == 0 || signal_period == 0 || slow_period == 0 || closes.len() < slow_period {
        return None;
    }

    let fast = math::ema_series(closes, fast_period);
    let slow = math::ema_series(closes, slow_period);

    let macd_line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
    let signal_line = math::ema_series(&macd_line, signal_period);

    let macd = *macd_line.last()?;
    let signal = *signal_line.last()?;

    Some(MacdIndicator {
        macd,
        signal,
        histogram: macd - signal,
    })
}

/// Calculate MACD with default periods (12, 26, 9)
pub fn calculate_macd_default(closes: &[f64]) -> Option<MacdIndicator> {
    calculate_macd(closes, 12, 26, 9)
}
