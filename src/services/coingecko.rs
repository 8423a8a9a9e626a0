//! CoinGecko `coins/markets`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::models::instrument::{AssetClass, InstrumentSnapshot};
use crate::screening::filter::ScreeningRules;

use super::error::SourceError;
use super::http::fetch_json;
use super::market_data::SourceAdapter;
use super::parse::{loose_opt_f64, to_volume};

pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com";
const SOURCE_ID: &str = "coingecko";

#[derive(Debug, Deserialize)]
struct MarketRow {
    symbol: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, deserialize_with = "loose_opt_f64")]
    current_price: Option<f64>,
    #[serde(default, deserialize_with = "loose_opt_f64")]
    price_change_percentage_24h: Option<f64>,
    #[serde(default, deserialize_with = "loose_opt_f64")]
    total_volume: Option<f64>,
    #[serde(default, deserialize_with = "loose_opt_f64")]
    market_cap: Option<f64>,
}

impl MarketRow {
    fn into_snapshot(self) -> Option<InstrumentSnapshot> {
        let price = self.current_price?;
        let mut snapshot = InstrumentSnapshot::new(
            self.symbol.to_uppercase(),
            price,
            self.price_change_percentage_24h.unwrap_or(0.0),
            self.total_volume.map(to_volume).unwrap_or(0),
        );
        if let Some(name) = self.name {
            snapshot = snapshot.with_name(name);
        }
        if let Some(cap) = self.market_cap {
            snapshot = snapshot.with_market_cap(cap);
        }
        Some(snapshot)
    }
}

pub struct CoinGeckoAdapter {
    http: Client,
    base_url: String,
    rules: ScreeningRules,
}

impl CoinGeckoAdapter {
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
impl SourceAdapter for CoinGeckoAdapter {
    fn id(&self) -> &'static str {
        SOURCE_ID
    }

    fn label(&self) -> &'static str {
        "CoinGecko API (Professional Filter)"
    }

    fn asset_class(&self) -> AssetClass {
        AssetClass::Crypto
    }

    fn rules(&self) -> &ScreeningRules {
        &self.rules
    }

    async fn fetch_snapshots(&self) -> Result<Vec<InstrumentSnapshot>, SourceError> {
        let url = format!("{}/api/v3/coins/markets", self.base_url);
        let request = self.http.get(&url).query(&[
            ("vs_currency", "usd"),
            ("order", "market_cap_desc"),
            ("per_page", "100"),
            ("page", "1"),
            ("price_change_percentage", "24h"),
        ]);

        let rows: Vec<MarketRow> = fetch_json(SOURCE_ID, request).await?;
        Ok(rows.into_iter().filter_map(MarketRow::into_snapshot).collect())
    }
}
