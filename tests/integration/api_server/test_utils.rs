//! Test utilities for API server integration tests

use axum_test::TestServer;
use scalptrix::config::AppConfig;
use scalptrix::core::http::{create_router, AppState, HealthStatus};
use scalptrix::core::pipeline::ScreeningPipeline;
use scalptrix::core::scheduler::AlertScheduler;
use scalptrix::metrics::Metrics;
use scalptrix::models::instrument::AssetClass;
use scalptrix::notify::TelegramNotifier;
use scalptrix::screening::orchestrator::FallbackOrchestrator;
use scalptrix::services::coinlore::CoinloreAdapter;
use scalptrix::services::idx::IdxGainersAdapter;
use scalptrix::services::market_data::SourceAdapter;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const BOT_TOKEN: &str = "test-token";
pub const CHAT_ID: &str = "42";

/// API server whose providers and Telegram all live on one mock upstream.
#[allow(dead_code)]
pub struct TestApiServer {
    pub server: TestServer,
    pub metrics: Arc<Metrics>,
    pub upstream: MockServer,
}

#[allow(dead_code)]
impl TestApiServer {
    pub async fn new() -> Self {
        Self::with_env(&[("TELEGRAM_BOT_TOKEN", BOT_TOKEN), ("TELEGRAM_CHAT_ID", CHAT_ID)]).await
    }

    pub async fn without_telegram_credentials() -> Self {
        Self::with_env(&[]).await
    }

    pub async fn with_env(pairs: &[(&str, &str)]) -> Self {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let config = Arc::new(
            AppConfig::from_lookup(|key| vars.get(key).cloned()).expect("test configuration"),
        );

        let upstream = MockServer::start().await;
        let http = reqwest::Client::new();
        let metrics = Arc::new(Metrics::new().expect("metrics initialization"));

        let equity_chain: Vec<Arc<dyn SourceAdapter>> =
            vec![Arc::new(IdxGainersAdapter::with_base_url(http.clone(), upstream.uri()))];
        let crypto_chain: Vec<Arc<dyn SourceAdapter>> =
            vec![Arc::new(CoinloreAdapter::with_base_url(http.clone(), upstream.uri()))];

        let equities = FallbackOrchestrator::new(AssetClass::Equities, equity_chain)
            .with_metrics(metrics.clone());
        let crypto =
            FallbackOrchestrator::new(AssetClass::Crypto, crypto_chain).with_metrics(metrics.clone());

        let telegram = Arc::new(TelegramNotifier::with_base_url(
            http,
            config.telegram_bot_token.clone(),
            config.telegram_chat_id.clone(),
            upstream.uri(),
        ));

        let pipeline = ScreeningPipeline::new(equities, crypto, telegram.clone(), config.utc_offset)
            .with_fx(config.crypto_fx.clone())
            .with_demo_fallback(config.demo_fallback)
            .with_metrics(metrics.clone());

        let scheduler = Arc::new(
            AlertScheduler::new(config.schedule(), config.utc_offset).expect("scheduler"),
        );

        let state = AppState {
            health: Arc::new(RwLock::new(HealthStatus::default())),
            metrics: metrics.clone(),
            start_time: Arc::new(Instant::now()),
            config,
            pipeline: Arc::new(pipeline),
            telegram: Some(telegram),
            scheduler,
        };

        let app = create_router(state);
        let server = TestServer::new(app).expect("start test server");

        Self {
            server,
            metrics,
            upstream,
        }
    }

    pub async fn mount_idx_gainers(&self, rows: Value) {
        Mock::given(method("GET"))
            .and(path("/umbraco/Surface/ListedCompany/GetStockGainerLoser"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Gainer": rows })))
            .mount(&self.upstream)
            .await;
    }

    pub async fn mount_coinlore(&self, tickers: Value) {
        Mock::given(method("GET"))
            .and(path("/api/tickers/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": tickers })))
            .mount(&self.upstream)
            .await;
    }

    pub fn send_message_path() -> String {
        format!("/bot{BOT_TOKEN}/sendMessage")
    }

    pub async fn mount_send_message(&self, status: u16, body: Value, expected_calls: u64) {
        Mock::given(method("POST"))
            .and(path(Self::send_message_path()))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .expect(expected_calls)
            .mount(&self.upstream)
            .await;
    }
}

pub fn idx_row(code: &str, price: f64, change: f64, volume: f64) -> Value {
    json!({
        "StockCode": code,
        "Price": price,
        "Change": change,
        "Volume": volume,
    })
}

pub fn coinlore_ticker(symbol: &str, name: &str, price: &str, change: &str) -> Value {
    json!({
        "symbol": symbol,
        "name": name,
        "price_usd": price,
        "percent_change_24h": change,
        "volume24": 2_500_000_000.0,
        "market_cap_usd": "850000000000",
    })
}
