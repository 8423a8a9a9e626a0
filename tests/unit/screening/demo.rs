//! Unit tests for demo fallback data

use scalptrix::models::instrument::AssetClass;
use scalptrix::models::signal::ScreeningMethod;
use scalptrix::screening::demo::demo_result;
use scalptrix::signals::composer::SignalComposer;

#[test]
fn test_demo_equities_follow_composer_levels() {
    let composer = SignalComposer::new(AssetClass::Equities);
    let result = demo_result(AssetClass::Equities, &composer);

    assert_eq!(result.method, ScreeningMethod::Demo);
    let symbols: Vec<&str> = result.signals.iter().map(|s| s.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["BBCA", "BMRI", "TLKM"]);
    for signal in &result.signals {
        assert!(signal.stop < signal.entry && signal.entry < signal.target1);
        assert!(signal.label.starts_with("Demo"));
    }
}

#[test]
fn test_demo_crypto() {
    let composer = SignalComposer::new(AssetClass::Crypto);
    let result = demo_result(AssetClass::Crypto, &composer);

    assert_eq!(result.signals.len(), 1);
    assert_eq!(result.signals[0].entry, 45_000.0);
    assert_eq!(result.signals[0].target1, 45_000.0 * 1.05);
}
