//! Alpha Vantage GLOBAL_QUOTE over a fixed watchlist.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::models::instrument::{AssetClass, InstrumentSnapshot};
use crate::screening::filter::ScreeningRules;

use super::error::SourceError;
use super::http::fetch_json;
use super::market_data::SourceAdapter;
use super::parse::{loose_opt_f64, to_volume};

pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co";
pub const DEFAULT_WATCHLIST: [&str; 5] = ["BBCA", "BMRI", "TLKM", "ASII", "BBNI"];
/// Free tier allows 5 requests per minute.
pub const DEFAULT_REQUEST_SPACING: Duration = Duration::from_secs(12);
const SOURCE_ID: &str = "alpha_vantage";

#[derive(Debug, Deserialize)]
struct QuoteEnvelope {
    #[serde(rename = "Global Quote", default)]
    quote: Option<GlobalQuote>,
}

#[derive(Debug, Deserialize)]
struct GlobalQuote {
    #[serde(rename = "05. price", default, deserialize_with = "loose_opt_f64")]
    price: Option<f64>,
    #[serde(rename = "06. volume", default, deserialize_with = "loose_opt_f64")]
    volume: Option<f64>,
    #[serde(rename = "10. change percent", default, deserialize_with = "loose_opt_f64")]
    change_percent: Option<f64>,
}

pub struct AlphaVantageAdapter {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    watchlist: Vec<String>,
    spacing: Duration,
    rules: ScreeningRules,
}

impl AlphaVantageAdapter {
    pub fn new(http: Client, api_key: Option<String>) -> Self {
        Self::with_base_url(http, api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(http: Client, api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key,
            watchlist: DEFAULT_WATCHLIST.iter().map(|s| s.to_string()).collect(),
            spacing: DEFAULT_REQUEST_SPACING,
            rules: ScreeningRules::permissive(),
        }
    }

    pub fn with_watchlist(mut self, watchlist: Vec<String>) -> Self {
        self.watchlist = watchlist;
        self
    }

    pub fn with_spacing(mut self, spacing: Duration) -> Self {
        self.spacing = spacing;
        self
    }

    async fn quote(&self, api_key: &str, symbol: &str) -> Result<Option<InstrumentSnapshot>, SourceError> {
        let url = format!("{}/query", self.base_url);
        let ticker = format!("{symbol}.JK");
        let request = self.http.get(&url).query(&[
            ("function", "GLOBAL_QUOTE"),
            ("symbol", ticker.as_str()),
            ("apikey", api_key),
        ]);

        let envelope: QuoteEnvelope = fetch_json(SOURCE_ID, request).await?;
        let Some(quote) = envelope.quote else {
            return Ok(None);
        };
        let Some(price) = quote.price.filter(|p| *p > 0.0) else {
            return Ok(None);
        };

        Ok(Some(InstrumentSnapshot::new(
            symbol,
            price,
            quote.change_percent.unwrap_or(0.0),
            quote.volume.map(to_volume).unwrap_or(0),
        )))
    }
}

#[async_trait]
impl SourceAdapter for AlphaVantageAdapter {
    fn id(&self) -> &'static str {
        SOURCE_ID
    }

    fn label(&self) -> &'static str {
        "Watchlist Manual (Alpha Vantage)"
    }

    fn asset_class(&self) -> AssetClass {
        AssetClass::Equities
    }

    fn rules(&self) -> &ScreeningRules {
        &self.rules
    }

    async fn fetch_snapshots(&self) -> Result<Vec<InstrumentSnapshot>, SourceError> {
        let Some(api_key) = self.api_key.as_deref() else {
            debug!("alpha_vantage: no API key configured, skipping");
            return Ok(Vec::new());
        };

        let mut snapshots = Vec::new();
        let mut last_error = None;
        let mut any_ok = false;

        for (i, symbol) in self.watchlist.iter().enumerate() {
            if i > 0 && !self.spacing.is_zero() {
                tokio::time::sleep(self.spacing).await;
            }
            match self.quote(api_key, symbol).await {
                Ok(quote) => {
                    any_ok = true;
                    snapshots.extend(quote);
                }
                Err(e) => {
                    debug!(symbol = %symbol, error = %e, "alpha_vantage: quote failed");
                    last_error = Some(e);
                }
            }
        }

        match (any_ok, last_error) {
            (false, Some(e)) => Err(e),
            _ => Ok(snapshots),
        }
    }
}
