//! Shared data models spanning the screening layers.

pub mod indicators;
pub mod instrument;
pub mod signal;

pub use indicators::{BollingerBandsIndicator, FearGreed, IndicatorSet, MacdIndicator};
pub use instrument::{AssetClass, InstrumentSnapshot, PriceSeries};
pub use signal::{ScreeningMethod, ScreeningResult, TradeSignal};
