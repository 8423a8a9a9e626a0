//! Assembles an [`IndicatorSet`] from a close series.

use crate::models::indicators::IndicatorSet;
use crate::models::instrument::PriceSeries;

use super::momentum::{calculate_macd_default, calculate_rsi_default};
use super::trend::calculate_ema;
use super::volatility::calculate_bollinger_bands_default;

pub const EMA_FAST_PERIOD: usize = 20;
pub const EMA_SLOW_PERIOD: usize = 50;

/// Compute every series-derived indicator that the history allows.
///
/// Each indicator is independent: a series long enough for RSI but too short
/// for EMA50 reports RSI and leaves both EMAs absent. Market context fields
/// (fear & greed, funding, open interest) are left for the caller to fill in.
pub fn calculate_indicator_set(series: &PriceSeries) -> IndicatorSet {
    let closes = &series.closes;
    let mut set = IndicatorSet::new();

    if let (Some(ema20), Some(ema50)) = (
        calculate_ema(closes, EMA_FAST_PERIOD),
        calculate_ema(closes, EMA_SLOW_PERIOD),
    ) {
        set = set.with_emas(ema20, ema50);
    }

    if let Some(rsi) = calculate_rsi_default(closes) {
        set = set.with_rsi(rsi);
    }

    if let Some(macd) = calculate_macd_default(closes) {
        set = set.with_macd(macd);
    }

    if let (Some(bands), Some(last)) = (calculate_bollinger_bands_default(closes), series.last()) {
        set = set.with_bollinger(bands, last);
    }

    set
}

impl IndicatorSet {
    pub fn from_series(series: &PriceSeries) -> Self {
        calculate_indicator_set(series)
    }
}
