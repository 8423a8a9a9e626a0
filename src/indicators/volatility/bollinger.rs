//! Bollinger Bands indicator

use crate::common::math;
use crate::models::indicators::BollingerBandsIndicator;

/// Calculate Bollinger Bands
///
/// Middle Band = SMA(period)
/// Upper Band = Middle + (std_dev * standard deviation)
/// Lower Band = Middle - (std_dev * standard deviation)
pub fn calculate_bollinger_bands(
    closes: &[f64],
    period: usize,
    std_dev: f64,
) -> Option<BollingerBandsIndicator> {
    if closes.len() < period {
        return None;
    }

    let middle = math::sma(closes, period)?;
    let std = math::standard_deviation(closes, period)?;

    Some(BollingerBandsIndicator {
        upper: middle + (std_dev * std),
        middle,
        lower: middle - (std_dev * std),
    })
}

/// Calculate Bollinger Bands with default parameters (20 SMA, 2σ)
pub fn calculate_bollinger_bands_default(closes: &[f64]) -> Option<BollingerBandsIndicator> {
    calculate_bollinger_bands(closes, 20, 2.0)
}
