//! HTTP endpoint server using Axum

use axum::{
    body::Bytes,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, warn, Level};

use crate::config::AppConfig;
use crate::metrics::Metrics;
use crate::models::instrument::AssetClass;
use crate::models::signal::ScreeningResult;
use crate::notify::format::{format_test_message, format_webhook_alert};
use crate::notify::{NotifyError, TelegramNotifier};

use super::pipeline::ScreeningPipeline;
use super::scheduler::AlertScheduler;

pub const SERVICE_NAME: &str = "scalptrix";

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub config: Arc<AppConfig>,
    pub pipeline: Arc<ScreeningPipeline>,
    pub telegram: Option<Arc<TelegramNotifier>>,
    pub scheduler: Arc<AlertScheduler>,
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

type ApiResponse = (StatusCode, Json<Value>);

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "service": SERVICE_NAME
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();
    state.metrics.http_requests_in_flight.dec();

    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

/// Service summary: what is configured and when alerts fire.
async fn home(State(state): State<AppState>) -> Json<Value> {
    let config = &state.config;
    Json(json!({
        "service": SERVICE_NAME,
        "environment": config.environment,
        "telegram": {
            "bot_token_configured": config.telegram_bot_token.is_some(),
            "chat_id_configured": config.telegram_chat_id.is_some(),
        },
        "sources": {
            "equities": state.pipeline.orchestrator(AssetClass::Equities).chain(),
            "crypto": state.pipeline.orchestrator(AssetClass::Crypto).chain(),
        },
        "api_keys": {
            "sectors": config.sectors_api_key.is_some(),
            "alpha_vantage": config.alpha_vantage_api_key.is_some(),
        },
        "demo_fallback": state.pipeline.demo_fallback(),
        "scheduler": state.scheduler.status(),
    }))
}

#[derive(Debug, Serialize)]
struct ScreeningResponse {
    #[serde(flatten)]
    result: ScreeningResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    preview: Option<String>,
}

async fn screen_equities(State(state): State<AppState>) -> Json<ScreeningResponse> {
    let result = state.pipeline.screen_equities().await;
    Json(ScreeningResponse {
        result,
        preview: None,
    })
}

async fn screen_crypto(State(state): State<AppState>) -> Json<ScreeningResponse> {
    let result = state.pipeline.screen_crypto().await;
    let preview = state.pipeline.render("PREVIEW", &result);
    Json(ScreeningResponse {
        result,
        preview: Some(preview),
    })
}

#[derive(Debug, Default, Deserialize)]
struct AlertRequest {
    session: Option<String>,
}

fn parse_optional_body<T: Default + serde::de::DeserializeOwned>(body: &Bytes) -> Result<T, ApiResponse> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "status": "error", "message": e.to_string() })),
        )
    })
}

async fn run_alert(state: &AppState, asset_class: AssetClass, body: Bytes) -> ApiResponse {
    let request: AlertRequest = match parse_optional_body(&body) {
        Ok(request) => request,
        Err(rejection) => return rejection,
    };
    let session = request.session.unwrap_or_else(|| "MANUAL".to_string());

    let outcome = state.pipeline.run_alert(asset_class, &session).await;
    let status = if outcome.delivery.delivered {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(json!(outcome)))
}

async fn alert_equities(State(state): State<AppState>, body: Bytes) -> ApiResponse {
    run_alert(&state, AssetClass::Equities, body).await
}

async fn alert_crypto(State(state): State<AppState>, body: Bytes) -> ApiResponse {
    run_alert(&state, AssetClass::Crypto, body).await
}

async fn test_notification(State(state): State<AppState>) -> ApiResponse {
    let message = format_test_message(&state.pipeline.now());
    let report = state.pipeline.notify(&message).await;
    let status = if report.delivered {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(json!(report)))
}

async fn telegram_chats(State(state): State<AppState>) -> ApiResponse {
    let Some(telegram) = &state.telegram else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "error", "message": "telegram is not configured" })),
        );
    };

    match telegram.recent_chats().await {
        Ok(chats) if chats.is_empty() => (
            StatusCode::OK,
            Json(json!({
                "status": "no_messages",
                "message": "No chats yet. Send /start to the bot, then retry.",
                "chats": chats,
            })),
        ),
        Ok(chats) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "chats": chats })),
        ),
        Err(e @ NotifyError::NotConfigured(_)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "status": "error", "message": e.to_string() })),
        ),
        Err(e) => {
            warn!(error = %e, "getUpdates failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "status": "error", "message": e.to_string() })),
            )
        }
    }
}

async fn scheduler_status(State(state): State<AppState>) -> Json<Value> {
    Json(json!(state.scheduler.status()))
}

#[derive(Debug, Default, Deserialize)]
struct WebhookPayload {
    symbol: Option<String>,
    signal: Option<String>,
}

/// Relay a TradingView alert to Telegram.
async fn tradingview_webhook(State(state): State<AppState>, body: Bytes) -> ApiResponse {
    let payload: WebhookPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "malformed webhook body");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "status": "error", "message": e.to_string() })),
            );
        }
    };

    let symbol = payload.symbol.unwrap_or_else(|| "Unknown".to_string());
    let signal = payload.signal.unwrap_or_else(|| "No signal info".to_string());
    let message = format_webhook_alert(&symbol, &signal, &state.pipeline.now());

    let report = state.pipeline.notify(&message).await;
    if report.delivered {
        (
            StatusCode::OK,
            Json(json!({ "status": "ok", "message": "alert relayed to telegram" })),
        )
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "status": "partial",
                "message": "alert received but telegram delivery failed",
                "error": report.detail,
            })),
        )
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/screening/equities", get(screen_equities))
        .route("/api/screening/crypto", get(screen_crypto))
        .route("/api/alerts/equities", post(alert_equities))
        .route("/api/alerts/crypto", post(alert_crypto))
        .route("/api/notifications/test", post(test_notification))
        .route("/api/telegram/chats", get(telegram_chats))
        .route("/api/scheduler", get(scheduler_status))
        .route("/webhook/tradingview", post(tradingview_webhook))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(state: AppState) -> Result<(), Box<dyn std::error::Error>> {
    let port = state.config.port;
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    info!(
        "Metrics endpoint available at http://0.0.0.0:{}/metrics",
        port
    );
    axum::serve(listener, app).await?;

    Ok(())
}
