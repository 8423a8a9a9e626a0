//! Indicator enrichment for ranked candidates.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::indicators::calculate_indicator_set;
use crate::models::indicators::IndicatorSet;
use crate::models::instrument::InstrumentSnapshot;
use crate::services::market_data::{
    DerivativesProvider, HistoryProvider, Lookback, SentimentProvider,
};

/// Produces one optional [`IndicatorSet`] per candidate, in order.
#[async_trait]
pub trait Enricher: Send + Sync {
    async fn enrich(&self, candidates: &[InstrumentSnapshot]) -> Vec<Option<IndicatorSet>>;
}

/// History-derived indicators plus fear & greed, funding rate and open interest.
///
/// Every provider failure is logged and the affected values are left out.
pub struct MarketContextEnricher {
    history: Arc<dyn HistoryProvider>,
    sentiment: Option<Arc<dyn SentimentProvider>>,
    derivatives: Option<Arc<dyn DerivativesProvider>>,
    lookback: Lookback,
}

impl MarketContextEnricher {
    pub fn new(history: Arc<dyn HistoryProvider>) -> Self {
        Self {
            history,
            sentiment: None,
            derivatives: None,
            lookback: Lookback::default(),
        }
    }

    pub fn with_sentiment(mut self, sentiment: Arc<dyn SentimentProvider>) -> Self {
        self.sentiment = Some(sentiment);
        self
    }

    pub fn with_derivatives(mut self, derivatives: Arc<dyn DerivativesProvider>) -> Self {
        self.derivatives = Some(derivatives);
        self
    }

    async fn indicators_for(&self, symbol: &str) -> IndicatorSet {
        let mut set = match self.history.history(symbol, &self.lookback).await {
            Ok(series) => {
                debug!(symbol = %symbol, closes = series.len(), "history loaded");
                calculate_indicator_set(&series)
            }
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "history unavailable, skipping indicators");
                IndicatorSet::new()
            }
        };

        if let Some(derivatives) = &self.derivatives {
            match derivatives.funding_rate(symbol).await {
                Ok(rate) => set = set.with_funding_rate(rate),
                Err(e) => debug!(symbol = %symbol, error = %e, "funding rate unavailable"),
            }
            match derivatives.open_interest(symbol).await {
                Ok(oi) => set = set.with_open_interest(oi),
                Err(e) => debug!(symbol = %symbol, error = %e, "open interest unavailable"),
            }
        }

        set
    }
}

#[async_trait]
impl Enricher for MarketContextEnricher {
    async fn enrich(&self, candidates: &[InstrumentSnapshot]) -> Vec<Option<IndicatorSet>> {
        // One sentiment reading per cycle.
        let fear_greed = match &self.sentiment {
            Some(sentiment) => match sentiment.fear_greed().await {
                Ok(value) => value,
                Err(e) => {
                    warn!(error = %e, "fear & greed unavailable");
                    None
                }
            },
            None => None,
        };

        let mut out = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let mut set = self.indicators_for(&candidate.symbol).await;
            if let Some(fg) = &fear_greed {
                set = set.with_fear_greed(fg.clone());
            }
            out.push((!set.is_empty()).then_some(set));
        }
        out
    }
}
