//! Binance USDⓈ-M futures: funding rate and open interest.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::error::SourceError;
use super::http::fetch_json;
use super::market_data::DerivativesProvider;
use super::parse::loose_f64;

pub const DEFAULT_BASE_URL: &str = "https://fapi.binance.com";
const SOURCE_ID: &str = "binance";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PremiumIndex {
    #[serde(deserialize_with = "loose_f64")]
    last_funding_rate: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OpenInterest {
    #[serde(deserialize_with = "loose_f64")]
    open_interest: f64,
}

pub struct BinanceFuturesClient {
    http: Client,
    base_url: String,
}

impl BinanceFuturesClient {
    pub fn new(http: Client) -> Self {
        Self::with_base_url(http, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    fn perpetual(symbol: &str) -> String {
        format!("{}USDT", symbol.to_uppercase())
    }
}

#[async_trait]
impl DerivativesProvider for BinanceFuturesClient {
    async fn funding_rate(&self, symbol: &str) -> Result<f64, SourceError> {
        let url = format!("{}/fapi/v1/premiumIndex", self.base_url);
        let request = self
            .http
            .get(&url)
            .query(&[("symbol", Self::perpetual(symbol))]);

        let index: PremiumIndex = fetch_json(SOURCE_ID, request).await?;
        Ok(index.last_funding_rate * 100.0)
    }

    async fn open_interest(&self, symbol: &str) -> Result<f64, SourceError> {
        let url = format!("{}/fapi/v1/openInterest", self.base_url);
        let request = self
            .http
            .get(&url)
            .query(&[("symbol", Self::perpetual(symbol))]);

        let oi: OpenInterest = fetch_json(SOURCE_ID, request).await?;
        Ok(oi.open_interest)
    }
}
