//! Yahoo Finance chart API: IDX equities, major crypto pairs and price history.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::models::instrument::{AssetClass, InstrumentSnapshot, PriceSeries};
use crate::screening::filter::ScreeningRules;

use super::error::SourceError;
use super::http::fetch_json;
use super::market_data::{HistoryProvider, Lookback, SourceAdapter};
use super::parse::to_volume;

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
const SOURCE_ID: &str = "yahoo";

/// Liquid IDX names scanned for daily gainers.
pub const IDX_TICKERS: [&str; 50] = [
    "BBCA.JK", "BBRI.JK", "BMRI.JK", "TLKM.JK", "ASII.JK", "BBNI.JK", "UNVR.JK", "GOTO.JK",
    "AMMN.JK", "ADRO.JK", "ANTM.JK", "INDF.JK", "ICBP.JK", "KLBF.JK", "SMGR.JK", "CPIN.JK",
    "PTBA.JK", "INCO.JK", "ITMG.JK", "PGAS.JK", "MDKA.JK", "MEDC.JK", "GGRM.JK", "TOWR.JK",
    "EMTK.JK", "EXCL.JK", "TBIG.JK", "BRPT.JK", "BYAN.JK", "ESSA.JK", "INKP.JK", "TPIA.JK",
    "BRIS.JK", "TKIM.JK", "BUKA.JK", "PGEO.JK", "SIDO.JK", "MNCN.JK", "ERAA.JK", "SRTG.JK",
    "DMAS.JK", "TINS.JK", "AKRA.JK", "UNTR.JK", "MAPI.JK", "PWON.JK", "SMSM.JK", "JPFA.JK",
    "ACES.JK", "MYOR.JK",
];

pub const CRYPTO_PAIRS: [&str; 20] = [
    "BTC-USD", "ETH-USD", "BNB-USD", "XRP-USD", "ADA-USD", "SOL-USD", "DOT-USD", "DOGE-USD",
    "AVAX-USD", "MATIC-USD", "LINK-USD", "UNI-USD", "ATOM-USD", "LTC-USD", "ETC-USD", "XLM-USD",
    "ALGO-USD", "VET-USD", "ICP-USD", "FIL-USD",
];

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartResult {
    pub meta: ChartMeta,
    #[serde(default)]
    pub indicators: ChartIndicators,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    pub symbol: String,
    pub regular_market_price: Option<f64>,
    pub regular_market_volume: Option<f64>,
    pub short_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChartIndicators {
    #[serde(default)]
    pub quote: Vec<ChartQuote>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChartQuote {
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<f64>>,
}

impl ChartResult {
    /// Non-null closes, oldest first.
    pub fn closes(&self) -> Vec<f64> {
        self.indicators
            .quote
            .first()
            .map(|q| q.close.iter().flatten().copied().collect())
            .unwrap_or_default()
    }

    fn last_volume(&self) -> Option<f64> {
        self.indicators
            .quote
            .first()
            .and_then(|q| q.volume.iter().rev().flatten().next().copied())
    }

    /// Daily snapshot from the last two closes.
    ///
    /// `None` when there are fewer than two closes or the previous close is
    /// not positive.
    fn daily_snapshot(&self, symbol: &str) -> Option<InstrumentSnapshot> {
        let closes = self.closes();
        if closes.len() < 2 {
            return None;
        }
        let latest = closes[closes.len() - 1];
        let previous = closes[closes.len() - 2];
        if previous <= 0.0 {
            return None;
        }

        let price = self.meta.regular_market_price.unwrap_or(latest);
        let change_pct = (latest - previous) / previous * 100.0;
        let volume = self
            .last_volume()
            .or(self.meta.regular_market_volume)
            .map(to_volume)
            .unwrap_or(0);

        let mut snapshot = InstrumentSnapshot::new(symbol, price, change_pct, volume);
        if let Some(name) = &self.meta.short_name {
            snapshot = snapshot.with_name(name.clone());
        }
        Some(snapshot)
    }
}

/// Thin client for `/v8/finance/chart/{ticker}`.
#[derive(Clone)]
pub struct YahooChartClient {
    http: Client,
    base_url: String,
}

impl YahooChartClient {
    pub fn new(http: Client) -> Self {
        Self::with_base_url(http, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    pub async fn chart(
        &self,
        ticker: &str,
        range: &str,
        interval: &str,
    ) -> Result<ChartResult, SourceError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, ticker);
        let request = self
            .http
            .get(&url)
            .query(&[("range", range), ("interval", interval)]);

        let envelope: ChartEnvelope = fetch_json(SOURCE_ID, request).await?;
        envelope
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| SourceError::invalid(SOURCE_ID, format!("empty chart for {ticker}")))
    }

    /// Fetch daily snapshots for `tickers` one after another.
    ///
    /// A failing ticker is skipped. Only when every request failed is the
    /// last error returned, since that means the provider itself is down.
    async fn scan(
        &self,
        tickers: &[&str],
        suffix: &str,
    ) -> Result<Vec<InstrumentSnapshot>, SourceError> {
        let mut snapshots = Vec::new();
        let mut last_error = None;
        let mut any_ok = false;

        for ticker in tickers {
            match self.chart(ticker, "5d", "1d").await {
                Ok(chart) => {
                    any_ok = true;
                    let symbol = ticker.trim_end_matches(suffix);
                    if let Some(snapshot) = chart.daily_snapshot(symbol) {
                        snapshots.push(snapshot);
                    }
                }
                Err(e) => {
                    debug!(ticker = %ticker, error = %e, "yahoo: skipping ticker");
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

#[async_trait]
impl HistoryProvider for YahooChartClient {
    async fn history(&self, symbol: &str, lookback: &Lookback) -> Result<PriceSeries, SourceError> {
        let ticker = format!("{symbol}-USD");
        let chart = self.chart(&ticker, &lookback.range, &lookback.interval).await?;
        Ok(PriceSeries::new(symbol, chart.closes()))
    }
}

pub struct YahooEquitiesAdapter {
    client: YahooChartClient,
    rules: ScreeningRules,
}

impl YahooEquitiesAdapter {
    pub fn new(client: YahooChartClient) -> Self {
        Self {
            client,
            rules: ScreeningRules::permissive()
                .with_min_volume(100_000)
                .with_change_band(0.5, f64::INFINITY),
        }
    }

    pub fn with_rules(mut self, rules: ScreeningRules) -> Self {
        self.rules = rules;
        self
    }
}

#[async_trait]
impl SourceAdapter for YahooEquitiesAdapter {
    fn id(&self) -> &'static str {
        "yahoo_equities"
    }

    fn label(&self) -> &'static str {
        "YFinance Screener (Top Gainers IDX)"
    }

    fn asset_class(&self) -> AssetClass {
        AssetClass::Equities
    }

    fn rules(&self) -> &ScreeningRules {
        &self.rules
    }

    async fn fetch_snapshots(&self) -> Result<Vec<InstrumentSnapshot>, SourceError> {
        info!(tickers = IDX_TICKERS.len(), "yahoo: scanning IDX tickers");
        self.client.scan(&IDX_TICKERS, ".JK").await
    }
}

pub struct YahooCryptoAdapter {
    client: YahooChartClient,
    rules: ScreeningRules,
}

impl YahooCryptoAdapter {
    pub fn new(client: YahooChartClient) -> Self {
        Self {
            client,
            rules: ScreeningRules::permissive()
                .with_min_volume(100_000)
                .with_change_band(0.0, f64::INFINITY),
        }
    }

    pub fn with_rules(mut self, rules: ScreeningRules) -> Self {
        self.rules = rules;
        self
    }
}

#[async_trait]
impl SourceAdapter for YahooCryptoAdapter {
    fn id(&self) -> &'static str {
        "yahoo_crypto"
    }

    fn label(&self) -> &'static str {
        "YFinance (Major Crypto Pairs)"
    }

    fn asset_class(&self) -> AssetClass {
        AssetClass::Crypto
    }

    fn rules(&self) -> &ScreeningRules {
        &self.rules
    }

    async fn fetch_snapshots(&self) -> Result<Vec<InstrumentSnapshot>, SourceError> {
        info!(pairs = CRYPTO_PAIRS.len(), "yahoo: scanning crypto pairs");
        self.client.scan(&CRYPTO_PAIRS, "-USD").await
    }
}
