//! Prometheus metrics exported on `/metrics`.

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

pub struct Metrics {
    registry: Registry,
    pub http_requests_total: IntCounter,
    pub http_request_duration_seconds: Histogram,
    pub http_requests_in_flight: IntGauge,
    /// Labelled by `asset_class` and the screening method id.
    pub screening_runs_total: IntCounterVec,
    pub source_failures_total: IntCounterVec,
    /// `delivered` or `failed`.
    pub notifications_total: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total =
            IntCounter::new("http_requests_total", "Total HTTP requests served")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        ))?;
        let http_requests_in_flight =
            IntGauge::new("http_requests_in_flight", "HTTP requests currently in flight")?;
        let screening_runs_total = IntCounterVec::new(
            Opts::new("screening_runs_total", "Completed screening runs"),
            &["asset_class", "method"],
        )?;
        let source_failures_total = IntCounterVec::new(
            Opts::new("source_failures_total", "Data source failures"),
            &["source"],
        )?;
        let notifications_total = IntCounterVec::new(
            Opts::new("notifications_total", "Notification delivery attempts"),
            &["outcome"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(screening_runs_total.clone()))?;
        registry.register(Box::new(source_failures_total.clone()))?;
        registry.register(Box::new(notifications_total.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            http_requests_in_flight,
            screening_runs_total,
            source_failures_total,
            notifications_total,
        })
    }

    /// Render every registered metric in the text exposition format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
