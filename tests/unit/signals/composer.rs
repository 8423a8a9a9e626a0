//! Unit tests for signal composition

use scalptrix::models::indicators::{FearGreed, IndicatorSet, MacdIndicator};
use scalptrix::models::instrument::{AssetClass, InstrumentSnapshot};
use scalptrix::signals::composer::{SignalBands, SignalComposer};

fn macd(line: f64, signal: f64) -> MacdIndicator {
    MacdIndicator {
        macd: line,
        signal,
        histogram: line - signal,
    }
}

#[test]
fn test_levels_follow_multipliers() {
    for (asset_class, bands) in [
        (AssetClass::Equities, SignalBands::EQUITIES),
        (AssetClass::Crypto, SignalBands::CRYPTO),
    ] {
        let composer = SignalComposer::new(asset_class);
        for price in [0.00001234, 1.0, 3550.0, 45_000.0] {
            let snapshot = InstrumentSnapshot::new("X", price, 1.0, 10);
            let signal = composer.compose(&snapshot, None);

            assert_eq!(signal.entry, price);
            assert_eq!(signal.target1, price * bands.target1);
            assert_eq!(signal.target2, price * bands.target2);
            assert_eq!(signal.stop, price * bands.stop);
            assert!(signal.stop < signal.entry);
            assert!(signal.entry < signal.target1);
            assert!(signal.target1 < signal.target2);
        }
    }
}

#[test]
fn test_three_bullish_signals() {
    let composer = SignalComposer::new(AssetClass::Crypto);
    let snapshot = InstrumentSnapshot::new("BTC", 100.0, 4.0, 1_000);
    let indicators = IndicatorSet::new()
        .with_emas(105.0, 100.0)
        .with_rsi(25.0)
        .with_macd(macd(1.5, 1.0));

    let signal = composer.compose(&snapshot, Some(&indicators));
    assert_eq!(signal.label, "3 Bullish Signals");
    assert_eq!(signal.indicators, Some(indicators));
}

#[test]
fn test_bearish_signals() {
    let composer = SignalComposer::new(AssetClass::Crypto);
    let snapshot = InstrumentSnapshot::new("ETH", 130.0, 4.0, 1_000);
    let indicators = IndicatorSet::new()
        .with_emas(90.0, 100.0)
        .with_rsi(75.0)
        .with_macd(macd(-1.0, 0.0));

    let signal = composer.compose(&snapshot, Some(&indicators));
    assert_eq!(signal.label, "3 Bearish Signals");
}

#[test]
fn test_bollinger_judges_history_close() {
    use scalptrix::models::indicators::BollingerBandsIndicator;

    let composer = SignalComposer::new(AssetClass::Crypto);
    let bands = BollingerBandsIndicator {
        upper: 120.0,
        middle: 110.0,
        lower: 100.0,
    };
    // The snapshot price sits inside the bands every time; only the close counts.
    let snapshot = InstrumentSnapshot::new("X", 110.0, 3.0, 1);

    let below = IndicatorSet::new().with_bollinger(bands, 95.0).with_rsi(20.0);
    let signal = composer.compose(&snapshot, Some(&below));
    assert_eq!(signal.label, "2 Bullish Signals");
    assert!(signal.indicator_labels.contains(&"Below Lower Bollinger Band".to_string()));

    let above = IndicatorSet::new().with_bollinger(bands, 125.0).with_rsi(80.0);
    let signal = composer.compose(&snapshot, Some(&above));
    assert_eq!(signal.label, "2 Bearish Signals");
    assert!(signal.indicator_labels.contains(&"Above Upper Bollinger Band".to_string()));

    let inside = IndicatorSet::new().with_bollinger(bands, 110.0).with_rsi(20.0);
    let signal = composer.compose(&InstrumentSnapshot::new("X", 95.0, 3.0, 1), Some(&inside));
    assert_eq!(signal.label, "Mixed Signals");
}

#[test]
fn test_mixed_when_split() {
    let composer = SignalComposer::new(AssetClass::Crypto);
    let snapshot = InstrumentSnapshot::new("SOL", 50.0, 4.0, 1_000);
    let indicators = IndicatorSet::new()
        .with_emas(105.0, 100.0)
        .with_rsi(80.0)
        .with_macd(macd(1.0, 1.0));

    let signal = composer.compose(&snapshot, Some(&indicators));
    assert_eq!(signal.label, "Mixed Signals");
}

#[test]
fn test_market_context_is_not_counted() {
    let composer = SignalComposer::new(AssetClass::Crypto);
    let snapshot = InstrumentSnapshot::new("BTC", 100.0, 4.0, 1_000);
    let indicators = IndicatorSet::new()
        .with_rsi(25.0)
        .with_fear_greed(FearGreed {
            value: 10,
            classification: "Extreme Fear".to_string(),
        })
        .with_funding_rate(-0.05);

    let signal = composer.compose(&snapshot, Some(&indicators));
    assert_eq!(signal.label, "Mixed Signals");
    assert!(signal
        .indicator_labels
        .iter()
        .any(|l| l.contains("Extreme Fear")));
    assert!(signal.indicator_labels.iter().any(|l| l.contains("shorts paying")));
}

#[test]
fn test_equity_momentum_fallback_tiers() {
    let composer = SignalComposer::new(AssetClass::Equities);
    let label = |change: f64, volume: u64| {
        composer
            .compose(&InstrumentSnapshot::new("BBCA", 9710.0, change, volume), None)
            .label
    };

    assert_eq!(label(2.5, 10), "Strong Momentum");
    assert_eq!(label(1.0, 10), "Breakout Signal");
    assert_eq!(label(0.3, 2_000_000), "Volume Accumulation");
    assert_eq!(label(0.3, 10), "Potential Entry");
}

#[test]
fn test_crypto_momentum_fallback_tiers() {
    let composer = SignalComposer::new(AssetClass::Crypto);
    let label = |change: f64| {
        composer
            .compose(&InstrumentSnapshot::new("DOGE", 0.1, change, 5_000_000), None)
            .label
    };

    assert_eq!(label(6.0), "Very Strong Momentum");
    assert_eq!(label(3.0), "Breakout Signal");
    assert_eq!(label(1.0), "Potential Entry");
}

#[test]
fn test_empty_indicator_set_uses_momentum_label() {
    let composer = SignalComposer::new(AssetClass::Crypto);
    let snapshot = InstrumentSnapshot::new("ADA", 0.5, 6.0, 1_000);
    let signal = composer.compose(&snapshot, Some(&IndicatorSet::new()));

    assert_eq!(signal.label, "Very Strong Momentum");
    assert!(signal.indicators.is_none());
    assert!(signal.indicator_labels.is_empty());
}
