//! Screening, formatting and delivery wired together.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::metrics::Metrics;
use crate::models::instrument::AssetClass;
use crate::models::signal::{ScreeningMethod, ScreeningResult};
use crate::notify::format::{format_alert, FxConversion};
use crate::notify::{DeliveryReport, Notifier};
use crate::screening::demo::demo_result;
use crate::screening::orchestrator::FallbackOrchestrator;

use super::scheduler::{AlertJob, ScheduleEntry};

/// Summary of one alert run.
#[derive(Debug, Clone, Serialize)]
pub struct AlertOutcome {
    pub asset_class: AssetClass,
    pub session: String,
    pub method: ScreeningMethod,
    pub signals: usize,
    pub delivery: DeliveryReport,
}

/// Read-only after construction, shared between the scheduler and HTTP handlers.
pub struct ScreeningPipeline {
    equities: FallbackOrchestrator,
    crypto: FallbackOrchestrator,
    notifier: Arc<dyn Notifier>,
    offset: FixedOffset,
    fx: Option<FxConversion>,
    demo_fallback: bool,
    metrics: Option<Arc<Metrics>>,
}

impl ScreeningPipeline {
    pub fn new(
        equities: FallbackOrchestrator,
        crypto: FallbackOrchestrator,
        notifier: Arc<dyn Notifier>,
        offset: FixedOffset,
    ) -> Self {
        Self {
            equities,
            crypto,
            notifier,
            offset,
            fx: None,
            demo_fallback: false,
            metrics: None,
        }
    }

    pub fn with_fx(mut self, fx: Option<FxConversion>) -> Self {
        self.fx = fx;
        self
    }

    pub fn with_demo_fallback(mut self, enabled: bool) -> Self {
        self.demo_fallback = enabled;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn demo_fallback(&self) -> bool {
        self.demo_fallback
    }

    pub fn orchestrator(&self, asset_class: AssetClass) -> &FallbackOrchestrator {
        match asset_class {
            AssetClass::Equities => &self.equities,
            AssetClass::Crypto => &self.crypto,
        }
    }

    /// Run the fallback chain, substituting demo data when enabled and
    /// every source came back empty.
    pub async fn screen(&self, asset_class: AssetClass) -> ScreeningResult {
        let orchestrator = self.orchestrator(asset_class);
        let result = orchestrator.screen().await;

        if result.is_no_data() && self.demo_fallback {
            warn!(asset_class = %asset_class, "no live data, using demo signals");
            return demo_result(asset_class, orchestrator.composer());
        }
        result
    }

    pub async fn screen_equities(&self) -> ScreeningResult {
        self.screen(AssetClass::Equities).await
    }

    pub async fn screen_crypto(&self) -> ScreeningResult {
        self.screen(AssetClass::Crypto).await
    }

    pub fn render(&self, session: &str, result: &ScreeningResult) -> String {
        format_alert(session, result, &self.now(), self.fx.as_ref())
    }

    pub async fn notify(&self, text: &str) -> DeliveryReport {
        let report = self.notifier.send(text).await;
        if let Some(metrics) = &self.metrics {
            let outcome = if report.delivered { "delivered" } else { "failed" };
            metrics.notifications_total.with_label_values(&[outcome]).inc();
        }
        report
    }

    /// Screen, format and deliver one alert.
    pub async fn run_alert(&self, asset_class: AssetClass, session: &str) -> AlertOutcome {
        let result = self.screen(asset_class).await;
        let message = self.render(session, &result);
        let delivery = self.notify(&message).await;

        info!(
            asset_class = %asset_class,
            session = %session,
            method = result.method.id(),
            signals = result.signals.len(),
            delivered = delivery.delivered,
            "alert run finished"
        );

        AlertOutcome {
            asset_class,
            session: session.to_string(),
            method: result.method,
            signals: result.signals.len(),
            delivery,
        }
    }
}

#[async_trait]
impl AlertJob for ScreeningPipeline {
    async fn run(&self, entry: &ScheduleEntry) {
        self.run_alert(entry.asset_class, &entry.session).await;
    }
}
