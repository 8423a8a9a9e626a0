//! External data source integrations

pub mod alpha_vantage;
pub mod binance;
pub mod coingecko;
pub mod coinlore;
pub mod error;
pub mod http;
pub mod idx;
pub mod market_data;
pub mod parse;
pub mod sectors;
pub mod sentiment;
pub mod tradingview;
pub mod yahoo;

pub use error::SourceError;
pub use market_data::{
    DerivativesProvider, HistoryProvider, Lookback, SentimentProvider, SourceAdapter,
};
