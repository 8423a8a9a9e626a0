/// Full exponential moving average series.
///
/// Uses α = 2 / (period + 1) and seeds the recursion with the first value, so
/// the output has the same length as the input.
pub fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    if values.is_empty() || period == 0 {
        return Vec::new();
    }

    let alpha = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut prev = values[0];
    out.push(prev);
    for &value in &values[1..] {
        prev = ema_from_previous(value, prev, alpha);
        out.push(prev);
    }
    out
}

/// Final EMA value, or `None` when fewer than `period` values are available.
pub fn ema(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    ema_series(values, period).last().copied()
}

pub fn ema_from_previous(value: f64, previous: f64, alpha: f64) -> f64 {
    alpha * value + (1.0 - alpha) * previous
}

/// Simple moving average over the trailing `period` values.
pub fn sma(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    let window = &values[values.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}

/// Sample standard deviation (n - 1) over the trailing `period` values.
pub fn standard_deviation(values: &[f64], period: usize) -> Option<f64> {
    if period < 2 || values.len() < period {
        return None;
    }
    let mean = sma(values, period)?;
    let window = &values[values.len() - period..];
    let variance =
        window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (period as f64 - 1.0);
    Some(variance.sqrt())
}
