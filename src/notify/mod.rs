//! Outbound alert delivery.

pub mod format;
pub mod telegram;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use telegram::{ChatSummary, TelegramNotifier};

/// Outcome of one delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReport {
    pub delivered: bool,
    pub detail: String,
}

impl DeliveryReport {
    pub fn delivered(detail: impl Into<String>) -> Self {
        Self {
            delivered: true,
            detail: detail.into(),
        }
    }

    pub fn failed(detail: impl Into<String>) -> Self {
        Self {
            delivered: false,
            detail: detail.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("notifier is not configured: {0}")]
    NotConfigured(&'static str),

    #[error("transport error: {0}")]
    Transport(reqwest::Error),

    #[error("telegram rejected the request: {0}")]
    Rejected(String),
}

/// Bot API URLs embed the token, so they are dropped.
impl From<reqwest::Error> for NotifyError {
    fn from(e: reqwest::Error) -> Self {
        NotifyError::Transport(e.without_url())
    }
}

/// Sends a formatted message to the configured destination.
///
/// Failures are reported in the [`DeliveryReport`], never raised, and a
/// failed send is not retried.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> DeliveryReport;
}
