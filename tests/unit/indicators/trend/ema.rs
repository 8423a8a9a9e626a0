//! Unit tests for EMA indicator

use scalptrix::indicators::trend::calculate_ema;

fn rising_closes(count: usize, base_price: f64) -> Vec<f64> {
    (0..count).map(|i| base_price + i as f64 * 0.1).collect()
}

#[test]
fn test_ema_insufficient_data() {
    let closes = rising_closes(19, 100.0);
    assert!(calculate_ema(&closes, 20).is_none());
}

#[test]
fn test_ema_sufficient_data() {
    let closes = rising_closes(50, 100.0);
    let ema = calculate_ema(&closes, 20).unwrap();
    assert!(ema.is_finite());
    assert!(ema > 100.0 && ema < closes[49]);
}

#[test]
fn test_ema_of_constant_series() {
    let closes = vec![42.0; 30];
    assert_eq!(calculate_ema(&closes, 20), Some(42.0));
}
