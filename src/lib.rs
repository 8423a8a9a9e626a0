//! IDX equity and crypto momentum screener with Telegram alerts.

pub mod common;
pub mod config;
pub mod core;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod notify;
pub mod screening;
pub mod services;
pub mod signals;
