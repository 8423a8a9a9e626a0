//! IDX official website gainer list.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::models::instrument::{AssetClass, InstrumentSnapshot};
use crate::screening::filter::ScreeningRules;

use super::error::SourceError;
use super::http::fetch_json;
use super::market_data::SourceAdapter;
use super::parse::{loose_opt_f64, to_volume};

pub const DEFAULT_BASE_URL: &str = "https://www.idx.co.id";
const SOURCE_ID: &str = "idx_official";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Deserialize)]
struct GainerLoser {
    #[serde(rename = "Gainer", default)]
    gainer: Vec<GainerRow>,
}

#[derive(Debug, Deserialize)]
struct GainerRow {
    #[serde(rename = "StockCode", default)]
    stock_code: String,
    #[serde(rename = "Price", default, deserialize_with = "loose_opt_f64")]
    price: Option<f64>,
    #[serde(rename = "Change", default, deserialize_with = "loose_opt_f64")]
    change: Option<f64>,
    #[serde(rename = "Volume", default, deserialize_with = "loose_opt_f64")]
    volume: Option<f64>,
    #[serde(rename = "MarketCap", default, deserialize_with = "loose_opt_f64")]
    market_cap: Option<f64>,
}

impl GainerRow {
    /// Rows without a price or change are skipped rather than guessed.
    fn into_snapshot(self) -> Option<InstrumentSnapshot> {
        let symbol = self.stock_code.trim();
        let price = self.price?;
        let change = self.change?;
        if symbol.is_empty() || price <= 0.0 {
            return None;
        }

        let previous = price - change;
        let change_pct = if previous > 0.0 {
            change / previous * 100.0
        } else {
            0.0
        };

        let mut snapshot = InstrumentSnapshot::new(
            symbol,
            price,
            change_pct,
            self.volume.map(to_volume).unwrap_or(0),
        );
        if let Some(cap) = self.market_cap.filter(|c| *c > 0.0) {
            snapshot = snapshot.with_market_cap(cap);
        }
        Some(snapshot)
    }
}

pub struct IdxGainersAdapter {
    http: Client,
    base_url: String,
    rules: ScreeningRules,
}

impl IdxGainersAdapter {
    pub fn new(http: Client) -> Self {
        Self::with_base_url(http, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            rules: ScreeningRules::permissive(),
        }
    }

    pub fn with_rules(mut self, rules: ScreeningRules) -> Self {
        self.rules = rules;
        self
    }
}

#[async_trait]
impl SourceAdapter for IdxGainersAdapter {
    fn id(&self) -> &'static str {
        SOURCE_ID
    }

    fn label(&self) -> &'static str {
        "IDX Official Scraper (Top Gainers)"
    }

    fn asset_class(&self) -> AssetClass {
        AssetClass::Equities
    }

    fn rules(&self) -> &ScreeningRules {
        &self.rules
    }

    async fn fetch_snapshots(&self) -> Result<Vec<InstrumentSnapshot>, SourceError> {
        let url = format!(
            "{}/umbraco/Surface/ListedCompany/GetStockGainerLoser",
            self.base_url
        );
        let request = self
            .http
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(REQUEST_TIMEOUT);

        let body: GainerLoser = fetch_json(SOURCE_ID, request).await?;
        Ok(body
            .gainer
            .into_iter()
            .filter_map(GainerRow::into_snapshot)
            .collect())
    }
}
