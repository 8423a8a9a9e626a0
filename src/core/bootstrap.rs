//! Builds the live adapter chains and pipeline from configuration.

use std::sync::Arc;

use tracing::info;

use crate::config::AppConfig;
use crate::metrics::Metrics;
use crate::models::instrument::AssetClass;
use crate::notify::TelegramNotifier;
use crate::screening::enrichment::MarketContextEnricher;
use crate::screening::orchestrator::FallbackOrchestrator;
use crate::services::alpha_vantage::AlphaVantageAdapter;
use crate::services::binance::BinanceFuturesClient;
use crate::services::coingecko::CoinGeckoAdapter;
use crate::services::coinlore::CoinloreAdapter;
use crate::services::http::build_client;
use crate::services::idx::IdxGainersAdapter;
use crate::services::market_data::SourceAdapter;
use crate::services::sectors::SectorsAdapter;
use crate::services::sentiment::FearGreedClient;
use crate::services::tradingview::TradingViewAdapter;
use crate::services::yahoo::{YahooChartClient, YahooCryptoAdapter, YahooEquitiesAdapter};

use super::pipeline::ScreeningPipeline;

pub struct Components {
    pub pipeline: Arc<ScreeningPipeline>,
    pub telegram: Arc<TelegramNotifier>,
}

pub fn build(config: &AppConfig, metrics: Arc<Metrics>) -> Result<Components, reqwest::Error> {
    let http = build_client(config.http_timeout)?;
    let yahoo = YahooChartClient::new(http.clone());

    let equity_chain: Vec<Arc<dyn SourceAdapter>> = vec![
        Arc::new(YahooEquitiesAdapter::new(yahoo.clone())),
        Arc::new(IdxGainersAdapter::new(http.clone())),
        Arc::new(SectorsAdapter::new(http.clone(), config.sectors_api_key.clone())),
        Arc::new(TradingViewAdapter::new(http.clone())),
        Arc::new(
            AlphaVantageAdapter::new(http.clone(), config.alpha_vantage_api_key.clone())
                .with_spacing(config.alpha_vantage_spacing),
        ),
    ];
    let crypto_chain: Vec<Arc<dyn SourceAdapter>> = vec![
        Arc::new(CoinloreAdapter::new(http.clone())),
        Arc::new(CoinGeckoAdapter::new(http.clone())),
        Arc::new(YahooCryptoAdapter::new(yahoo.clone())),
    ];

    let enricher = MarketContextEnricher::new(Arc::new(yahoo))
        .with_sentiment(Arc::new(FearGreedClient::new(http.clone())))
        .with_derivatives(Arc::new(BinanceFuturesClient::new(http.clone())));

    let equities = FallbackOrchestrator::new(AssetClass::Equities, equity_chain)
        .with_signals_per_cycle(config.signals_per_cycle)
        .with_metrics(metrics.clone());
    let crypto = FallbackOrchestrator::new(AssetClass::Crypto, crypto_chain)
        .with_signals_per_cycle(config.signals_per_cycle)
        .with_enricher(Arc::new(enricher))
        .with_metrics(metrics.clone());

    info!(
        equities = ?equities.chain(),
        crypto = ?crypto.chain(),
        "source chains configured"
    );

    let telegram = Arc::new(TelegramNotifier::new(
        http,
        config.telegram_bot_token.clone(),
        config.telegram_chat_id.clone(),
    ));

    let pipeline = ScreeningPipeline::new(equities, crypto, telegram.clone(), config.utc_offset)
        .with_fx(config.crypto_fx.clone())
        .with_demo_fallback(config.demo_fallback)
        .with_metrics(metrics);

    Ok(Components {
        pipeline: Arc::new(pipeline),
        telegram,
    })
}
