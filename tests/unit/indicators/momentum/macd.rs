//! Unit tests for MACD indicator

use scalptrix::indicators::momentum::{calculate_macd, calculate_macd_default};

#[test]
fn test_macd_insufficient_data() {
    let closes: Vec<f64> = (0..25).map(|i| 100.0 + i as f64).collect();
    assert!(calculate_macd_default(&closes).is_none());
}

#[test]
fn test_macd_constant_series_is_flat() {
    let closes = vec![50.0; 40];
    let macd = calculate_macd_default(&closes).unwrap();
    assert_eq!(macd.macd, 0.0);
    assert_eq!(macd.signal, 0.0);
    assert_eq!(macd.histogram, 0.0);
}

#[test]
fn test_macd_uptrend_is_positive() {
    let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
    let macd = calculate_macd_default(&closes).unwrap();
    assert!(macd.macd > 0.0);
    assert!(macd.macd > macd.signal);
    assert!((macd.histogram - (macd.macd - macd.signal)).abs() < 1e-12);
}

#[test]
fn test_macd_downtrend_is_negative() {
    let closes: Vec<f64> = (0..60).map(|i| 200.0 - i as f64).collect();
    let macd = calculate_macd(&closes, 12, 26, 9).unwrap();
    assert!(macd.macd < 0.0);
    assert!(macd.macd < macd.signal);
}

#[test]
fn test_macd_exactly_slow_period_points() {
    let closes: Vec<f64> = (0..26).map(|i| 100.0 + (i % 3) as f64).collect();
    assert!(calculate_macd_default(&closes).is_some());
}
