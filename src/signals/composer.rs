//! Turns a ranked snapshot plus optional indicators into a [`TradeSignal`].

use serde::{Deserialize, Serialize};

use crate::models::indicators::IndicatorSet;
use crate::models::instrument::{AssetClass, InstrumentSnapshot};
use crate::models::signal::TradeSignal;

/// Fixed multipliers applied to the entry price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalBands {
    pub target1: f64,
    pub target2: f64,
    pub stop: f64,
}

impl SignalBands {
    pub const EQUITIES: SignalBands = SignalBands {
        target1: 1.03,
        target2: 1.06,
        stop: 0.98,
    };

    pub const CRYPTO: SignalBands = SignalBands {
        target1: 1.05,
        target2: 1.10,
        stop: 0.95,
    };

    pub fn for_asset_class(asset_class: AssetClass) -> Self {
        match asset_class {
            AssetClass::Equities => Self::EQUITIES,
            AssetClass::Crypto => Self::CRYPTO,
        }
    }
}

/// Percent-change tiers used when no indicator could be evaluated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MomentumTiers {
    pub strong: f64,
    pub breakout: f64,
    /// Volume above which a quiet mover still counts as accumulating.
    pub accumulation_volume: Option<u64>,
    pub strong_label: &'static str,
}

impl MomentumTiers {
    pub const EQUITIES: MomentumTiers = MomentumTiers {
        strong: 2.0,
        breakout: 0.5,
        accumulation_volume: Some(1_000_000),
        strong_label: "Strong Momentum",
    };

    pub const CRYPTO: MomentumTiers = MomentumTiers {
        strong: 5.0,
        breakout: 2.0,
        accumulation_volume: None,
        strong_label: "Very Strong Momentum",
    };

    pub fn for_asset_class(asset_class: AssetClass) -> Self {
        match asset_class {
            AssetClass::Equities => Self::EQUITIES,
            AssetClass::Crypto => Self::CRYPTO,
        }
    }

    pub fn label(&self, change_pct: f64, volume: u64) -> &'static str {
        if change_pct > self.strong {
            self.strong_label
        } else if change_pct > self.breakout {
            "Breakout Signal"
        } else if self.accumulation_volume.is_some_and(|min| volume > min) {
            "Volume Accumulation"
        } else {
            "Potential Entry"
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bias {
    Bullish,
    Bearish,
    Neutral,
}

#[derive(Debug, Clone, Copy)]
pub struct SignalComposer {
    bands: SignalBands,
    tiers: MomentumTiers,
}

impl SignalComposer {
    pub fn new(asset_class: AssetClass) -> Self {
        Self {
            bands: SignalBands::for_asset_class(asset_class),
            tiers: MomentumTiers::for_asset_class(asset_class),
        }
    }

    pub fn bands(&self) -> SignalBands {
        self.bands
    }

    pub fn compose(
        &self,
        snapshot: &InstrumentSnapshot,
        indicators: Option<&IndicatorSet>,
    ) -> TradeSignal {
        let entry = snapshot.price;
        let indicators = indicators.filter(|set| !set.is_empty());

        let (label, indicator_labels) = match indicators {
            Some(set) => self.evaluate(set),
            None => (
                self.tiers
                    .label(snapshot.change_pct, snapshot.volume)
                    .to_string(),
                Vec::new(),
            ),
        };

        TradeSignal {
            symbol: snapshot.symbol.clone(),
            name: snapshot.name.clone(),
            label,
            entry,
            target1: entry * self.bands.target1,
            target2: entry * self.bands.target2,
            stop: entry * self.bands.stop,
            change_pct: snapshot.change_pct,
            volume: snapshot.volume,
            market_cap: snapshot.market_cap,
            indicators: indicators.cloned(),
            indicator_labels,
        }
    }

    /// Count the four predicate rows and collect their descriptions.
    ///
    /// Market context (fear & greed, funding) only contributes labels.
    fn evaluate(&self, set: &IndicatorSet) -> (String, Vec<String>) {
        let mut labels = Vec::new();
        let mut bullish = 0;
        let mut bearish = 0;

        let mut tally = |bias: Bias, label: Option<String>| {
            match bias {
                Bias::Bullish => bullish += 1,
                Bias::Bearish => bearish += 1,
                Bias::Neutral => {}
            }
            labels.extend(label);
        };

        if let (Some(fast), Some(slow)) = (set.ema20, set.ema50) {
            let (bias, label) = analyze_ema(fast, slow);
            tally(bias, label);
        }
        if let Some(rsi) = set.rsi14 {
            let (bias, label) = analyze_rsi(rsi);
            tally(bias, label);
        }
        if let (Some(line), Some(signal)) = (set.macd, set.macd_signal) {
            let (bias, label) = analyze_macd(line, signal);
            tally(bias, label);
        }
        if let (Some(upper), Some(lower), Some(close)) = (set.bb_upper, set.bb_lower, set.bb_close) {
            let (bias, label) = analyze_bollinger(close, upper, lower);
            tally(bias, label);
        }

        if let Some(fg) = &set.fear_greed {
            labels.push(format!("Fear & Greed {} ({})", fg.value, fg.classification));
        }
        if let Some(rate) = set.funding_rate {
            labels.push(describe_funding(rate));
        }

        let label = if bullish >= 2 {
            format!("{bullish} Bullish Signals")
        } else if bearish >= 2 {
            format!("{bearish} Bearish Signals")
        } else {
            "Mixed Signals".to_string()
        };

        (label, labels)
    }
}

fn analyze_ema(fast: f64, slow: f64) -> (Bias, Option<String>) {
    if fast > slow {
        (Bias::Bullish, Some("EMA20 > EMA50 (Uptrend)".to_string()))
    } else if fast < slow {
        (Bias::Bearish, Some("EMA20 < EMA50 (Downtrend)".to_string()))
    } else {
        (Bias::Neutral, None)
    }
}

fn analyze_rsi(rsi: f64) -> (Bias, Option<String>) {
    if rsi < 30.0 {
        (Bias::Bullish, Some(format!("RSI Oversold ({rsi:.1})")))
    } else if rsi > 70.0 {
        (Bias::Bearish, Some(format!("RSI Overbought ({rsi:.1})")))
    } else {
        (Bias::Neutral, Some(format!("RSI Neutral ({rsi:.1})")))
    }
}

fn analyze_macd(line: f64, signal: f64) -> (Bias, Option<String>) {
    if line > signal {
        (Bias::Bullish, Some("MACD Bullish Cross".to_string()))
    } else if line < signal {
        (Bias::Bearish, Some("MACD Bearish Cross".to_string()))
    } else {
        (Bias::Neutral, None)
    }
}

fn analyze_bollinger(close: f64, upper: f64, lower: f64) -> (Bias, Option<String>) {
    if close < lower {
        (Bias::Bullish, Some("Below Lower Bollinger Band".to_string()))
    } else if close > upper {
        (Bias::Bearish, Some("Above Upper Bollinger Band".to_string()))
    } else {
        (Bias::Neutral, None)
    }
}

fn describe_funding(rate: f64) -> String {
    let tone = if rate > 0.01 {
        "longs paying"
    } else if rate < -0.01 {
        "shorts paying"
    } else {
        "neutral"
    };
    format!("Funding {rate:.4}% ({tone})")
}
