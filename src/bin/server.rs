//! scalptrix server
//!
//! HTTP control plane plus the daily alert scheduler.

use dotenvy::dotenv;
use scalptrix::config::AppConfig;
use scalptrix::core::bootstrap;
use scalptrix::core::http::{start_server, AppState, HealthStatus};
use scalptrix::core::scheduler::{self, AlertScheduler};
use scalptrix::logging;
use scalptrix::metrics::Metrics;
use std::sync::Arc;
use std::time::Instant;
use tokio::signal;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let config = Arc::new(AppConfig::from_env()?);
    info!("Starting scalptrix server");
    info!(environment = %config.environment, "Environment");
    info!(port = config.port, "HTTP Server: http://0.0.0.0:{}", config.port);

    if config.telegram_bot_token.is_none() || config.telegram_chat_id.is_none() {
        warn!("TELEGRAM_BOT_TOKEN or TELEGRAM_CHAT_ID missing, alerts will not be delivered");
    }

    let metrics = Arc::new(Metrics::new()?);
    let components = bootstrap::build(&config, metrics.clone())?;

    let alert_scheduler = if config.scheduler_enabled {
        scheduler::init(
            config.schedule(),
            config.utc_offset,
            components.pipeline.clone(),
        )
        .await?
    } else {
        info!("Scheduler disabled (SCHEDULER_ENABLED=false)");
        Arc::new(AlertScheduler::new(config.schedule(), config.utc_offset)?)
    };

    for entry in alert_scheduler.status().entries {
        info!(
            asset_class = %entry.asset_class,
            session = %entry.session,
            next_run = ?entry.next_run,
            "scheduled {}",
            entry.time
        );
    }

    let state = AppState {
        health: Arc::new(RwLock::new(HealthStatus::default())),
        metrics,
        start_time: Arc::new(Instant::now()),
        config: config.clone(),
        pipeline: components.pipeline,
        telegram: Some(components.telegram),
        scheduler: alert_scheduler.clone(),
    };

    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(state).await {
            error!(error = %e, "HTTP server error");
        }
    });

    info!("Server started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down...");
            alert_scheduler.stop().await;
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}
