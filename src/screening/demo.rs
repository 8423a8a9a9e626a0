//! Canned signals used when every source is down and demo fallback is on.

use crate::models::instrument::{AssetClass, InstrumentSnapshot};
use crate::models::signal::{ScreeningMethod, ScreeningResult};
use crate::signals::composer::SignalComposer;

fn equity_snapshots() -> Vec<(InstrumentSnapshot, &'static str)> {
    vec![
        (
            InstrumentSnapshot::new("BBCA", 9710.0, 1.2, 5_000_000).with_market_cap(584e12),
            "Demo: Resistance Breakout",
        ),
        (
            InstrumentSnapshot::new("BMRI", 7650.0, 2.4, 8_500_000).with_market_cap(452e12),
            "Demo: Volume Spike",
        ),
        (
            InstrumentSnapshot::new("TLKM", 3550.0, 0.8, 12_000_000).with_market_cap(356e12),
            "Demo: Holding Support",
        ),
    ]
}

fn crypto_snapshots() -> Vec<(InstrumentSnapshot, &'static str)> {
    vec![(
        InstrumentSnapshot::new("BTC", 45_000.0, 5.5, 25_000_000_000)
            .with_name("Bitcoin")
            .with_market_cap(850e9),
        "Demo: Strong Momentum",
    )]
}

/// Demo result built through the regular composer, so targets and stops
/// follow the same multipliers as live signals.
pub fn demo_result(asset_class: AssetClass, composer: &SignalComposer) -> ScreeningResult {
    let snapshots = match asset_class {
        AssetClass::Equities => equity_snapshots(),
        AssetClass::Crypto => crypto_snapshots(),
    };

    let signals = snapshots
        .into_iter()
        .map(|(snapshot, label)| {
            let mut signal = composer.compose(&snapshot, None);
            signal.label = label.to_string();
            signal
        })
        .collect();

    ScreeningResult {
        asset_class,
        method: ScreeningMethod::Demo,
        signals,
    }
}
