use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdIndicator {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerBandsIndicator {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FearGreed {
    pub value: u32,
    pub classification: String,
}

/// Indicator readings for one instrument in one cycle.
///
/// Every field is optional: a missing value means the indicator could not be
/// computed (short history, provider down) and must not be reported.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ema20: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ema50: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi14: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd_signal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bb_upper: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bb_lower: Option<f64>,
    /// Last close of the series the bands were computed from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bb_close: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fear_greed: Option<FearGreed>,
    /// Last perpetual funding rate, in percent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub funding_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_interest: Option<f64>,
}

impl IndicatorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_emas(mut self, ema20: f64, ema50: f64) -> Self {
        self.ema20 = Some(ema20);
        self.ema50 = Some(ema50);
        self
    }

    pub fn with_rsi(mut self, rsi: f64) -> Self {
        self.rsi14 = Some(rsi);
        self
    }

    pub fn with_macd(mut self, macd: MacdIndicator) -> Self {
        self.macd = Some(macd.macd);
        self.macd_signal = Some(macd.signal);
        self
    }

    /// Bands together with the close they are judged against.
    pub fn with_bollinger(mut self, bands: BollingerBandsIndicator, last_close: f64) -> Self {
        self.bb_upper = Some(bands.upper);
        self.bb_lower = Some(bands.lower);
        self.bb_close = Some(last_close);
        self
    }

    pub fn with_fear_greed(mut self, fear_greed: FearGreed) -> Self {
        self.fear_greed = Some(fear_greed);
        self
    }

    pub fn with_funding_rate(mut self, funding_rate: f64) -> Self {
        self.funding_rate = Some(funding_rate);
        self
    }

    pub fn with_open_interest(mut self, open_interest: f64) -> Self {
        self.open_interest = Some(open_interest);
        self
    }

    /// True when nothing at all was reported.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
