//! Unit tests for Telegram message formatting

use chrono::{FixedOffset, TimeZone};
use scalptrix::models::instrument::{AssetClass, InstrumentSnapshot};
use scalptrix::models::signal::{ScreeningMethod, ScreeningResult};
use scalptrix::notify::format::{
    compact, escape_html, format_alert, format_price, group_thousands, parse_price_line,
    zone_label, FxConversion,
};
use scalptrix::signals::composer::SignalComposer;

fn wib_now() -> chrono::DateTime<FixedOffset> {
    let wib = FixedOffset::east_opt(7 * 3600).unwrap();
    wib.with_ymd_and_hms(2024, 3, 5, 8, 55, 0).unwrap()
}

fn result_for(asset_class: AssetClass, snapshots: &[InstrumentSnapshot]) -> ScreeningResult {
    let composer = SignalComposer::new(asset_class);
    ScreeningResult {
        asset_class,
        method: ScreeningMethod::Source {
            id: "stub".to_string(),
            label: "Stub <Source>".to_string(),
        },
        signals: snapshots.iter().map(|s| composer.compose(s, None)).collect(),
    }
}

fn blocks(message: &str) -> Vec<&str> {
    message.split("\n\n").filter(|b| b.contains("Entry:")).collect()
}

#[test]
fn test_equity_prices_round_trip() {
    let snapshots = [
        InstrumentSnapshot::new("BBCA", 9710.0, 1.2, 5_000_000),
        InstrumentSnapshot::new("GOTO", 67.0, 4.5, 900_000_000),
        InstrumentSnapshot::new("AMMN", 12_345.0, 0.7, 10_000),
    ];
    let result = result_for(AssetClass::Equities, &snapshots);
    let message = format_alert("PRE-MARKET", &result, &wib_now(), None);

    let parsed: Vec<_> = blocks(&message)
        .into_iter()
        .map(|b| parse_price_line(b).unwrap())
        .collect();
    assert_eq!(parsed.len(), result.signals.len());

    for (line, signal) in parsed.iter().zip(&result.signals) {
        assert!((line.entry - signal.entry).abs() <= 0.005);
        assert!((line.target1 - signal.target1).abs() <= 0.005);
        assert!((line.target2 - signal.target2).abs() <= 0.005);
        assert!((line.stop - signal.stop).abs() <= 0.005);
    }
}

#[test]
fn test_crypto_prices_round_trip() {
    let snapshots = [
        InstrumentSnapshot::new("BTC", 45_000.0, 5.5, 25_000_000_000).with_name("Bitcoin"),
        InstrumentSnapshot::new("PEPE", 0.00001234, 8.0, 600_000_000).with_name("Pepe"),
    ];
    let result = result_for(AssetClass::Crypto, &snapshots);
    let fx = FxConversion::new(15_800.0, "Rp");
    let message = format_alert("MIDDAY", &result, &wib_now(), Some(&fx));

    let parsed: Vec<_> = blocks(&message)
        .into_iter()
        .map(|b| parse_price_line(b).unwrap())
        .collect();
    assert_eq!(parsed.len(), 2);

    for (line, signal) in parsed.iter().zip(&result.signals) {
        assert!((line.entry - signal.entry).abs() <= 5e-9);
        assert!((line.target1 - signal.target1).abs() <= 5e-9);
        assert!((line.target2 - signal.target2).abs() <= 5e-9);
        assert!((line.stop - signal.stop).abs() <= 5e-9);
    }
    assert!(message.contains("Rp 711,000,000"));
}

#[test]
fn test_header_and_escaping() {
    let result = result_for(
        AssetClass::Equities,
        &[InstrumentSnapshot::new("BBCA", 9710.0, 1.2, 5_000_000)],
    );
    let message = format_alert("SESSION 1", &result, &wib_now(), None);

    assert!(message.starts_with("📊 <b>Update SESSION 1</b>"));
    assert!(message.contains("05-Mar-2024 08:55 WIB"));
    assert!(message.contains("Stub &lt;Source&gt;"));
    assert!(message.contains("Volume: 5,000,000"));
}

#[test]
fn test_empty_result_message() {
    let result = ScreeningResult::no_data(AssetClass::Crypto);
    let message = format_alert("MIDDAY", &result, &wib_now(), None);
    assert!(message.contains("No crypto assets met the screening criteria"));
    assert!(parse_price_line(&message).is_none());
}

#[test]
fn test_format_price_precision() {
    assert_eq!(format_price(9710.0, AssetClass::Equities), "9,710.00");
    assert_eq!(format_price(47_250.000000001, AssetClass::Crypto), "47,250");
    assert_eq!(format_price(0.00001234, AssetClass::Crypto), "0.00001234");
    assert_eq!(format_price(1.5, AssetClass::Crypto), "1.5");
}

#[test]
fn test_helpers() {
    assert_eq!(group_thousands(0), "0");
    assert_eq!(group_thousands(1_234_567), "1,234,567");
    assert_eq!(compact(1_250_000.0), "1.25M");
    assert_eq!(compact(850e9), "850.00B");
    assert_eq!(compact(584e12), "584.00T");
    assert_eq!(compact(999.0), "999");
    assert_eq!(escape_html("a & <b>"), "a &amp; &lt;b&gt;");
    assert_eq!(zone_label(&FixedOffset::east_opt(7 * 3600).unwrap()), "WIB");
    assert_eq!(zone_label(&FixedOffset::east_opt(3600).unwrap()), "UTC+01:00");
}
