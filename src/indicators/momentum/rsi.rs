//! RSI (Relative Strength Index) indicator

pub const DEFAULT_RSI_PERIOD: usize = 14;

/// Calculate RSI over the trailing `period` price differences.
///
/// RSI = 100 - (100 / (1 + RS))
/// RS = Average Gain / Average Loss
///
/// Averages are plain means over the window. Needs `period + 1` closes. A
/// window with gains and no losses reads 100; a completely flat window has no
/// defined RSI and yields `None`.
pub fn calculate_rsi(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period + 1 {
        return None;
    }

    let window = &closes[closes.len() - (period + 1)..];
    let mut gain_sum = 0.0;
    let mut loss_sum = 0.0;

    for pair in window.windows(2) {
        let change = pair[1] - pair[0];
        if change > 0.0 {
            gain_sum += change;
        } else {
            loss_sum += change.abs();
        }
    }

    let avg_gain = gain_sum / period as f64;
    let avg_loss = loss_sum / period as f64;

    if avg_loss == 0.0 {
        return if avg_gain > 0.0 { Some(100.0) } else { None };
    }

    let rs = avg_gain / avg_loss;
    Some(100.0 - (100.0 / (1.0 + rs)))
}

/// Calculate RSI with default period (14)
pub fn calculate_rsi_default(closes: &[f64]) -> Option<f64> {
    calculate_rsi(closes, DEFAULT_RSI_PERIOD)
}
