use serde::{Deserialize, Serialize};
use std::fmt;

/// Market segment a screening run targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    Equities,
    Crypto,
}

impl AssetClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetClass::Equities => "equities",
            AssetClass::Crypto => "crypto",
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One candidate instrument as reported by a source adapter.
///
/// Prices and market caps are kept in the provider's quote currency; any
/// rescaling for display happens in the formatting layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentSnapshot {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub price: f64,
    pub change_pct: f64,
    pub volume: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
}

impl InstrumentSnapshot {
    pub fn new(symbol: impl Into<String>, price: f64, change_pct: f64, volume: u64) -> Self {
        Self {
            symbol: symbol.into(),
            name: None,
            price,
            change_pct,
            volume,
            market_cap: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_market_cap(mut self, market_cap: f64) -> Self {
        self.market_cap = Some(market_cap);
        self
    }
}

/// Chronological close prices, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: String,
    pub closes: Vec<f64>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, closes: Vec<f64>) -> Self {
        Self {
            symbol: symbol.into(),
            closes,
        }
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    pub fn last(&self) -> Option<f64> {
        self.closes.last().copied()
    }
}
