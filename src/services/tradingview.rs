//! TradingView scanner for IDX listings.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::models::instrument::{AssetClass, InstrumentSnapshot};
use crate::screening::filter::ScreeningRules;

use super::error::SourceError;
use super::http::fetch_json;
use super::market_data::SourceAdapter;
use super::parse::to_volume;

pub const DEFAULT_BASE_URL: &str = "https://scanner.tradingview.com";
const SOURCE_ID: &str = "tradingview";
const COLUMNS: [&str; 5] = ["name", "close", "change", "volume", "market_cap_basic"];

#[derive(Debug, Deserialize)]
struct ScanResponse {
    #[serde(rename = "totalCount", default)]
    total_count: u64,
    #[serde(default)]
    data: Vec<ScanRow>,
}

#[derive(Debug, Deserialize)]
struct ScanRow {
    /// `EXCHANGE:TICKER`
    s: String,
    d: Vec<Value>,
}

impl ScanRow {
    fn into_snapshot(self) -> Result<Option<InstrumentSnapshot>, SourceError> {
        if self.d.len() < COLUMNS.len() {
            return Err(SourceError::invalid(
                SOURCE_ID,
                format!("row {} has {} columns", self.s, self.d.len()),
            ));
        }

        let (exchange, ticker) = match self.s.split_once(':') {
            Some((exchange, ticker)) => (Some(exchange), ticker),
            None => (None, self.s.as_str()),
        };
        if ticker.is_empty() || exchange.is_some_and(|e| e != "IDX") {
            return Ok(None);
        }

        let price = self.d[1].as_f64().unwrap_or(0.0);
        if price <= 0.0 {
            return Ok(None);
        }
        let Some(change_pct) = self.d[2].as_f64() else {
            return Ok(None);
        };
        let volume = self.d[3].as_f64().map(to_volume).unwrap_or(0);

        let mut snapshot = InstrumentSnapshot::new(ticker, price, change_pct, volume);
        if let Some(cap) = self.d[4].as_f64().filter(|c| *c > 0.0) {
            snapshot = snapshot.with_market_cap(cap);
        }
        Ok(Some(snapshot))
    }
}

pub struct TradingViewAdapter {
    http: Client,
    base_url: String,
    rules: ScreeningRules,
}

impl TradingViewAdapter {
    pub fn new(http: Client) -> Self {
        Self::with_base_url(http, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            rules: ScreeningRules::permissive()
                .with_min_volume(100_000)
                .with_change_band(0.5, f64::INFINITY),
        }
    }

    fn scan_body(&self) -> Value {
        json!({
            "markets": ["indonesia"],
            "columns": COLUMNS,
            "filter": [
                { "left": "exchange", "operation": "equal", "right": "IDX" },
                { "left": "change", "operation": "greater", "right": self.rules.min_change_pct },
                { "left": "volume", "operation": "greater", "right": self.rules.min_volume },
            ],
            "sort": { "sortBy": "change", "sortOrder": "desc" },
            "range": [0, self.rules.max_results],
        })
    }
}

#[async_trait]
impl SourceAdapter for TradingViewAdapter {
    fn id(&self) -> &'static str {
        SOURCE_ID
    }

    fn label(&self) -> &'static str {
        "TradingView Screener (Top Gainers IDX)"
    }

    fn asset_class(&self) -> AssetClass {
        AssetClass::Equities
    }

    fn rules(&self) -> &ScreeningRules {
        &self.rules
    }

    async fn fetch_snapshots(&self) -> Result<Vec<InstrumentSnapshot>, SourceError> {
        let url = format!("{}/indonesia/scan", self.base_url);
        let request = self.http.post(&url).json(&self.scan_body());

        let body: ScanResponse = fetch_json(SOURCE_ID, request).await?;
        debug!(
            total = body.total_count,
            rows = body.data.len(),
            "tradingview: scan returned"
        );

        let mut snapshots = Vec::with_capacity(body.data.len());
        for row in body.data {
            if let Some(snapshot) = row.into_snapshot()? {
                snapshots.push(snapshot);
            }
        }
        Ok(snapshots)
    }
}
