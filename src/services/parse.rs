//! Lenient numeric coercion for provider payloads.
//!
//! Providers disagree on whether numbers arrive as JSON numbers or strings,
//! and some append a `%` to percentages. Everything is normalised to `f64`
//! here so the rest of the crate only ever sees numeric values.

use serde::de::{self, Deserializer};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Number(f64),
    Text(String),
}

/// Parse `"1,234.5"`, `" 3.2% "` or `"-0.75"` into a number.
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .trim_end_matches('%')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    let value: f64 = cleaned.trim().parse().ok()?;
    value.is_finite().then_some(value)
}

pub fn loose_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Loose::deserialize(deserializer)? {
        Loose::Number(n) => Ok(n),
        Loose::Text(s) => {
            parse_number(&s).ok_or_else(|| de::Error::custom(format!("not a number: {s:?}")))
        }
    }
}

/// Like [`loose_f64`] but `null`, empty strings and missing fields become `None`.
pub fn loose_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Loose>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Loose::Number(n)) => Ok(Some(n)),
        Some(Loose::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Loose::Text(s)) => parse_number(&s)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("not a number: {s:?}"))),
    }
}

/// Volumes are reported as floats by several providers.
pub fn to_volume(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    }
}
