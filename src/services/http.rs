//! Shared outbound HTTP plumbing for every provider client.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::SourceError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko)";

/// One client per process; every request is bounded by `timeout`.
pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .pool_idle_timeout(Duration::from_secs(30))
        .build()
}

/// Send `request` and decode a JSON body into `T`.
///
/// Non-success statuses and bodies that do not match `T` both surface as
/// [`SourceError`], so malformed payloads never leave the adapter.
pub async fn fetch_json<T: DeserializeOwned>(
    source_id: &'static str,
    request: RequestBuilder,
) -> Result<T, SourceError> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Status {
            source_id,
            status: status.as_u16(),
        });
    }

    let body = response.bytes().await?;
    debug!(source = source_id, bytes = body.len(), "provider response received");

    serde_json::from_slice(&body).map_err(|e| SourceError::invalid(source_id, e.to_string()))
}
