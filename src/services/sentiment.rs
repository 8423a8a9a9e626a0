//! Crypto fear & greed index from alternative.me.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::models::indicators::FearGreed;

use super::error::SourceError;
use super::http::fetch_json;
use super::market_data::SentimentProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.alternative.me";
const SOURCE_ID: &str = "alternative_me";

#[derive(Debug, Deserialize)]
struct FngEnvelope {
    #[serde(default)]
    data: Vec<FngEntry>,
}

#[derive(Debug, Deserialize)]
struct FngEntry {
    value: String,
    value_classification: String,
}

pub struct FearGreedClient {
    http: Client,
    base_url: String,
}

impl FearGreedClient {
    pub fn new(http: Client) -> Self {
        Self::with_base_url(http, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl SentimentProvider for FearGreedClient {
    async fn fear_greed(&self) -> Result<Option<FearGreed>, SourceError> {
        let url = format!("{}/fng/", self.base_url);
        let envelope: FngEnvelope = fetch_json(SOURCE_ID, self.http.get(&url)).await?;

        let Some(entry) = envelope.data.into_iter().next() else {
            return Ok(None);
        };
        let value = entry.value.trim().parse::<u32>().map_err(|_| {
            SourceError::invalid(SOURCE_ID, format!("fear & greed value {:?}", entry.value))
        })?;

        Ok(Some(FearGreed {
            value,
            classification: entry.value_classification,
        }))
    }
}
