//! Sectors.app top movers (paid, needs an API key).

use std::collections::HashMap;

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

pub const DEFAULT_BASE_URL: &str = "https://api.sectors.app";
const SOURCE_ID: &str = "sectors";

/// The endpoint has answered both as a bare list and nested by period.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TopChanges {
    List(Vec<MoverRow>),
    Nested {
        top_gainers: HashMap<String, Vec<MoverRow>>,
    },
}

impl TopChanges {
    fn into_rows(self) -> Vec<MoverRow> {
        match self {
            TopChanges::List(rows) => rows,
            TopChanges::Nested { mut top_gainers } => {
                top_gainers.remove("1d").unwrap_or_default()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct MoverRow {
    #[serde(default)]
    symbol: String,
    #[serde(default, deserialize_with = "loose_opt_f64")]
    close_price: Option<f64>,
    #[serde(default, deserialize_with = "loose_opt_f64")]
    change_1d: Option<f64>,
    #[serde(default, deserialize_with = "loose_opt_f64")]
    volume: Option<f64>,
    #[serde(default, deserialize_with = "loose_opt_f64")]
    market_cap: Option<f64>,
}

pub struct SectorsAdapter {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    rules: ScreeningRules,
}

impl SectorsAdapter {
    pub fn new(http: Client, api_key: Option<String>) -> Self {
        Self::with_base_url(http, api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(http: Client, api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key,
            rules: ScreeningRules::permissive(),
        }
    }
}

#[async_trait]
impl SourceAdapter for SectorsAdapter {
    fn id(&self) -> &'static str {
        SOURCE_ID
    }

    fn label(&self) -> &'static str {
        "Sectors.app (Top Gainers)"
    }

    fn asset_class(&self) -> AssetClass {
        AssetClass::Equities
    }

    fn rules(&self) -> &ScreeningRules {
        &self.rules
    }

    async fn fetch_snapshots(&self) -> Result<Vec<InstrumentSnapshot>, SourceError> {
        let Some(api_key) = self.api_key.as_deref() else {
            debug!("sectors: no API key configured, skipping");
            return Ok(Vec::new());
        };

        let url = format!("{}/v1/ranking/top-changes", self.base_url);
        let request = self
            .http
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, api_key)
            .query(&[
                ("classification", "top_gainers"),
                ("period", "1d"),
                ("n_stock", "10"),
                ("min_market_cap", "1"),
            ]);

        let body: TopChanges = fetch_json(SOURCE_ID, request).await?;
        Ok(body
            .into_rows()
            .into_iter()
            .filter_map(|row| {
                let price = row.close_price.filter(|p| *p > 0.0)?;
                if row.symbol.is_empty() {
                    return None;
                }
                let mut snapshot = InstrumentSnapshot::new(
                    row.symbol,
                    price,
                    row.change_1d.unwrap_or(0.0),
                    row.volume.map(to_volume).unwrap_or(0),
                );
                if let Some(cap) = row.market_cap.filter(|c| *c > 0.0) {
                    snapshot = snapshot.with_market_cap(cap);
                }
                Some(snapshot)
            })
            .collect())
    }
}
