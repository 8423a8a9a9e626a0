//! Priority-ordered fallback across source adapters.

use std::sync::Arc;

use tracing::{info, warn};

use crate::metrics::Metrics;
use crate::models::instrument::AssetClass;
use crate::models::signal::{ScreeningMethod, ScreeningResult};
use crate::services::market_data::SourceAdapter;
use crate::signals::composer::SignalComposer;

use super::enrichment::Enricher;

pub const DEFAULT_SIGNALS_PER_CYCLE: usize = 5;

/// Tries adapters in order and stops at the first one with qualifying data.
///
/// Adapters are queried one at a time and never retried within a run. An
/// adapter error is logged and treated like an empty answer.
pub struct FallbackOrchestrator {
    asset_class: AssetClass,
    adapters: Vec<Arc<dyn SourceAdapter>>,
    composer: SignalComposer,
    signals_per_cycle: usize,
    enricher: Option<Arc<dyn Enricher>>,
    metrics: Option<Arc<Metrics>>,
}

impl FallbackOrchestrator {
    pub fn new(asset_class: AssetClass, adapters: Vec<Arc<dyn SourceAdapter>>) -> Self {
        Self {
            asset_class,
            adapters,
            composer: SignalComposer::new(asset_class),
            signals_per_cycle: DEFAULT_SIGNALS_PER_CYCLE,
            enricher: None,
            metrics: None,
        }
    }

    pub fn with_signals_per_cycle(mut self, n: usize) -> Self {
        self.signals_per_cycle = n;
        self
    }

    pub fn with_enricher(mut self, enricher: Arc<dyn Enricher>) -> Self {
        self.enricher = Some(enricher);
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn asset_class(&self) -> AssetClass {
        self.asset_class
    }

    pub fn composer(&self) -> &SignalComposer {
        &self.composer
    }

    /// Adapter ids in priority order.
    pub fn chain(&self) -> Vec<&'static str> {
        self.adapters.iter().map(|a| a.id()).collect()
    }

    pub async fn screen(&self) -> ScreeningResult {
        for adapter in &self.adapters {
            let candidates = match adapter.fetch_candidates(self.asset_class).await {
                Ok(candidates) => candidates,
                Err(e) => {
                    warn!(
                        asset_class = %self.asset_class,
                        source = adapter.id(),
                        error = %e,
                        "source failed, trying next"
                    );
                    if let Some(metrics) = &self.metrics {
                        metrics
                            .source_failures_total
                            .with_label_values(&[adapter.id()])
                            .inc();
                    }
                    continue;
                }
            };

            if candidates.is_empty() {
                info!(
                    asset_class = %self.asset_class,
                    source = adapter.id(),
                    "source returned no qualifying candidates"
                );
                continue;
            }

            let top: Vec<_> = candidates.into_iter().take(self.signals_per_cycle).collect();
            let indicators = match &self.enricher {
                Some(enricher) => enricher.enrich(&top).await,
                None => Vec::new(),
            };

            let signals = top
                .iter()
                .enumerate()
                .map(|(i, snapshot)| {
                    let set = indicators.get(i).and_then(|s| s.as_ref());
                    self.composer.compose(snapshot, set)
                })
                .collect::<Vec<_>>();

            info!(
                asset_class = %self.asset_class,
                source = adapter.id(),
                signals = signals.len(),
                "screening complete"
            );
            let method = ScreeningMethod::Source {
                id: adapter.id().to_string(),
                label: adapter.label().to_string(),
            };
            self.record(&method);
            return ScreeningResult {
                asset_class: self.asset_class,
                method,
                signals,
            };
        }

        warn!(asset_class = %self.asset_class, "all sources exhausted");
        let result = ScreeningResult::no_data(self.asset_class);
        self.record(&result.method);
        result
    }

    fn record(&self, method: &ScreeningMethod) {
        if let Some(metrics) = &self.metrics {
            metrics
                .screening_runs_total
                .with_label_values(&[self.asset_class.as_str(), method.id()])
                .inc();
        }
    }
}
