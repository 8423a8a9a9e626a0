//! Unit tests for lenient numeric parsing

use scalptrix::services::parse::{loose_f64, loose_opt_f64, parse_number, to_volume};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Row {
    #[serde(deserialize_with = "loose_f64")]
    price: f64,
    #[serde(default, deserialize_with = "loose_opt_f64")]
    change: Option<f64>,
}

#[test]
fn test_parse_number_strips_percent_and_commas() {
    assert_eq!(parse_number("1.23%"), Some(1.23));
    assert_eq!(parse_number(" -0.75 "), Some(-0.75));
    assert_eq!(parse_number("1,234.5"), Some(1234.5));
    assert_eq!(parse_number("abc"), None);
    assert_eq!(parse_number("NaN"), None);
}

#[test]
fn test_numbers_and_strings_deserialize_alike() {
    let a: Row = serde_json::from_str(r#"{"price": 10.5, "change": 2}"#).unwrap();
    let b: Row = serde_json::from_str(r#"{"price": "10.5", "change": "2%"}"#).unwrap();
    assert_eq!(a.price, b.price);
    assert_eq!(a.change, b.change);
}

#[test]
fn test_missing_null_and_blank_are_none() {
    let missing: Row = serde_json::from_str(r#"{"price": 1}"#).unwrap();
    let null: Row = serde_json::from_str(r#"{"price": 1, "change": null}"#).unwrap();
    let blank: Row = serde_json::from_str(r#"{"price": 1, "change": ""}"#).unwrap();
    assert!(missing.change.is_none());
    assert!(null.change.is_none());
    assert!(blank.change.is_none());
}

#[test]
fn test_garbage_is_an_error() {
    assert!(serde_json::from_str::<Row>(r#"{"price": "n/a"}"#).is_err());
    assert!(serde_json::from_str::<Row>(r#"{"price": 1, "change": "up"}"#).is_err());
}

#[test]
fn test_to_volume() {
    assert_eq!(to_volume(1234.6), 1235);
    assert_eq!(to_volume(-5.0), 0);
    assert_eq!(to_volume(f64::NAN), 0);
}
