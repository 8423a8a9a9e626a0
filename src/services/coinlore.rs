//! Coinlore public ticker list.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::models::instrument::{AssetClass, InstrumentSnapshot};
use crate::screening::filter::ScreeningRules;

use super::error::SourceError;
use super::http::fetch_json;
use super::market_data::SourceAdapter;
use super::parse::{loose_f64, loose_opt_f64, to_volume};

pub const DEFAULT_BASE_URL: &str = "https://api.coinlore.net";
const SOURCE_ID: &str = "coinlore";

#[derive(Debug, Deserialize)]
struct TickerList {
    data: Vec<Ticker>,
}

#[derive(Debug, Deserialize)]
struct Ticker {
    symbol: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(deserialize_with = "loose_f64")]
    price_usd: f64,
    #[serde(default, deserialize_with = "loose_opt_f64")]
    percent_change_24h: Option<f64>,
    #[serde(default, deserialize_with = "loose_opt_f64")]
    volume24: Option<f64>,
    #[serde(default, deserialize_with = "loose_opt_f64")]
    market_cap_usd: Option<f64>,
}

impl From<Ticker> for InstrumentSnapshot {
    fn from(t: Ticker) -> Self {
        let mut snapshot = InstrumentSnapshot::new(
            t.symbol,
            t.price_usd,
            t.percent_change_24h.unwrap_or(0.0),
            t.volume24.map(to_volume).unwrap_or(0),
        );
        if let Some(name) = t.name {
            snapshot = snapshot.with_name(name);
        }
        if let Some(cap) = t.market_cap_usd {
            snapshot = snapshot.with_market_cap(cap);
        }
        snapshot
    }
}

pub struct CoinloreAdapter {
    http: Client,
    base_url: String,
    rules: ScreeningRules,
}

impl CoinloreAdapter {
    pub fn new(http: Client) -> Self {
        Self::with_base_url(http, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            rules: ScreeningRules::crypto_professional(),
        }
    }

    pub fn with_rules(mut self, rules: ScreeningRules) -> Self {
        self.rules = rules;
        self
    }
}

#[async_trait]
impl SourceAdapter for CoinloreAdapter {
    fn id(&self) -> &'static str {
        SOURCE_ID
    }

    fn label(&self) -> &'static str {
        "Coinlore API (Professional Filter)"
    }

    fn asset_class(&self) -> AssetClass {
        AssetClass::Crypto
    }

    fn rules(&self) -> &ScreeningRules {
        &self.rules
    }

    async fn fetch_snapshots(&self) -> Result<Vec<InstrumentSnapshot>, SourceError> {
        let url = format!("{}/api/tickers/", self.base_url);
        let request = self
            .http
            .get(&url)
            .query(&[("start", "0"), ("limit", "100")]);

        let list: TickerList = fetch_json(SOURCE_ID, request).await?;
        Ok(list.data.into_iter().map(InstrumentSnapshot::from).collect())
    }
}
