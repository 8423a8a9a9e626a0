//! Unit tests for threshold filtering and ranking

use scalptrix::models::instrument::InstrumentSnapshot;
use scalptrix::screening::filter::{rank, ScreeningRules};

fn snapshot(symbol: &str, change_pct: f64, volume: u64) -> InstrumentSnapshot {
    InstrumentSnapshot::new(symbol, 100.0, change_pct, volume)
}

#[test]
fn test_rank_breaks_ties_by_volume() {
    let candidates = vec![
        snapshot("A", 10.0, 100),
        snapshot("B", -5.0, 200),
        snapshot("C", 10.0, 300),
        snapshot("D", 3.0, 50),
    ];
    let rules = ScreeningRules::permissive().with_change_band(0.0, 15.0);

    let ranked = rank(candidates, &rules);
    let order: Vec<(&str, f64, u64)> = ranked
        .iter()
        .map(|c| (c.symbol.as_str(), c.change_pct, c.volume))
        .collect();
    assert_eq!(order, vec![("C", 10.0, 300), ("A", 10.0, 100), ("D", 3.0, 50)]);
}

#[test]
fn test_rank_is_stable_for_exact_ties() {
    let candidates = vec![snapshot("FIRST", 4.0, 10), snapshot("SECOND", 4.0, 10)];
    let ranked = rank(candidates, &ScreeningRules::permissive());
    assert_eq!(ranked[0].symbol, "FIRST");
    assert_eq!(ranked[1].symbol, "SECOND");
}

#[test]
fn test_change_band_is_inclusive() {
    let rules = ScreeningRules::permissive().with_change_band(3.0, 15.0);
    assert!(rules.accepts(&snapshot("LOW", 3.0, 1)));
    assert!(rules.accepts(&snapshot("HIGH", 15.0, 1)));
    assert!(!rules.accepts(&snapshot("ABOVE", 15.01, 1)));
    assert!(!rules.accepts(&snapshot("BELOW", 2.99, 1)));
}

#[test]
fn test_min_volume() {
    let rules = ScreeningRules::permissive().with_min_volume(100_000);
    assert!(rules.accepts(&snapshot("OK", 1.0, 100_000)));
    assert!(!rules.accepts(&snapshot("THIN", 1.0, 99_999)));
}

#[test]
fn test_missing_market_cap_only_passes_without_minimum() {
    let no_cap = snapshot("NOCAP", 5.0, 1_000_000);
    assert!(ScreeningRules::permissive().accepts(&no_cap));
    assert!(!ScreeningRules::crypto_professional().accepts(&no_cap));

    let with_cap = no_cap.clone().with_market_cap(60_000_000.0);
    assert!(ScreeningRules::crypto_professional().accepts(&with_cap));
}

#[test]
fn test_invalid_price_or_change_is_dropped() {
    let rules = ScreeningRules::permissive();
    assert!(!rules.accepts(&InstrumentSnapshot::new("ZERO", 0.0, 1.0, 1)));
    assert!(!rules.accepts(&InstrumentSnapshot::new("NAN", 1.0, f64::NAN, 1)));
}

#[test]
fn test_rank_truncates_to_max_results() {
    let candidates: Vec<_> = (0..20).map(|i| snapshot(&format!("S{i}"), i as f64, 1)).collect();
    let ranked = rank(candidates, &ScreeningRules::permissive().with_max_results(5));
    assert_eq!(ranked.len(), 5);
    assert_eq!(ranked[0].symbol, "S19");
}

#[test]
fn test_no_survivors_is_empty_not_error() {
    let rules = ScreeningRules::permissive().with_min_volume(u64::MAX);
    assert!(rank(vec![snapshot("A", 1.0, 5)], &rules).is_empty());
}
