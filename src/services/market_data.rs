//! Provider interfaces consumed by the screening core.

use async_trait::async_trait;

use crate::models::indicators::FearGreed;
use crate::models::instrument::{AssetClass, InstrumentSnapshot, PriceSeries};
use crate::screening::filter::{rank, ScreeningRules};

use super::error::SourceError;

/// One market-data provider producing candidate instruments.
///
/// Implementations validate provider payloads into [`InstrumentSnapshot`] and
/// keep no mutable state, so one instance can serve concurrent screenings.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Stable machine identifier, e.g. `coinlore`.
    fn id(&self) -> &'static str;

    /// Human readable description used in messages.
    fn label(&self) -> &'static str;

    fn asset_class(&self) -> AssetClass;

    /// Quality thresholds specific to this provider.
    fn rules(&self) -> &ScreeningRules;

    /// Raw, validated snapshots before thresholds are applied.
    async fn fetch_snapshots(&self) -> Result<Vec<InstrumentSnapshot>, SourceError>;

    /// Snapshots passing this adapter's rules, ranked by momentum.
    ///
    /// An empty vector means "nothing qualified", never a failure. Asking an
    /// adapter for a class it does not serve also yields an empty vector.
    async fn fetch_candidates(
        &self,
        asset_class: AssetClass,
    ) -> Result<Vec<InstrumentSnapshot>, SourceError> {
        if asset_class != self.asset_class() {
            return Ok(Vec::new());
        }
        let snapshots = self.fetch_snapshots().await?;
        Ok(rank(snapshots, self.rules()))
    }
}

/// How much history to request for indicator computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookback {
    pub range: String,
    pub interval: String,
}

impl Default for Lookback {
    fn default() -> Self {
        Self {
            range: "1mo".to_string(),
            interval: "1h".to_string(),
        }
    }
}

#[async_trait]
pub trait HistoryProvider: Send + Sync {
    async fn history(&self, symbol: &str, lookback: &Lookback) -> Result<PriceSeries, SourceError>;
}

#[async_trait]
pub trait SentimentProvider: Send + Sync {
    async fn fear_greed(&self) -> Result<Option<FearGreed>, SourceError>;
}

#[async_trait]
pub trait DerivativesProvider: Send + Sync {
    /// Latest perpetual funding rate, in percent.
    async fn funding_rate(&self, symbol: &str) -> Result<f64, SourceError>;

    async fn open_interest(&self, symbol: &str) -> Result<f64, SourceError>;
}
