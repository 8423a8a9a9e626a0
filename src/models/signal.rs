use serde::{Deserialize, Serialize};

use super::indicators::IndicatorSet;
use super::instrument::AssetClass;

/// Decision record for one qualifying instrument in one cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeSignal {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub label: String,
    pub entry: f64,
    pub target1: f64,
    pub target2: f64,
    pub stop: f64,
    pub change_pct: f64,
    pub volume: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indicators: Option<IndicatorSet>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub indicator_labels: Vec<String>,
}

/// Where the signals of a screening run came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScreeningMethod {
    Source { id: String, label: String },
    NoDataAvailable,
    Demo,
}

impl ScreeningMethod {
    pub fn id(&self) -> &str {
        match self {
            ScreeningMethod::Source { id, .. } => id,
            ScreeningMethod::NoDataAvailable => "no_data",
            ScreeningMethod::Demo => "demo",
        }
    }

    pub fn describe(&self) -> &str {
        match self {
            ScreeningMethod::Source { label, .. } => label,
            ScreeningMethod::NoDataAvailable => "No data available",
            ScreeningMethod::Demo => "Demo Data",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningResult {
    pub asset_class: AssetClass,
    pub method: ScreeningMethod,
    pub signals: Vec<TradeSignal>,
}

impl ScreeningResult {
    pub fn no_data(asset_class: AssetClass) -> Self {
        Self {
            asset_class,
            method: ScreeningMethod::NoDataAvailable,
            signals: Vec::new(),
        }
    }

    pub fn is_no_data(&self) -> bool {
        self.method == ScreeningMethod::NoDataAvailable
    }
}
