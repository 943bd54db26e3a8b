use std::time::Duration;

use prometheus::{
    Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry,
};
use telemetry::metrics::TelemetryMetrics;

const ANALYSIS_DURATION_BUCKETS: &[f64] =
    &[0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0];

#[derive(Clone, Debug)]
pub struct ServerMetrics {
    pub registry: Registry,

    pub request_errors: IntCounterVec,
    pub analyses: IntCounter,
    pub readings_processed: IntCounter,
    pub readings_dropped: IntCounter,
    pub analysis_duration: Histogram,
}

impl TelemetryMetrics for ServerMetrics {
    fn registry(&self) -> &Registry {
        &self.registry
    }

    fn metrics(&self) -> Option<Self> {
        Some(self.clone())
    }
}

impl ServerMetrics {
    pub fn new_with_random_prefix() -> anyhow::Result<Self> {
        ServerMetrics::new(Some(ServerMetrics::generate_random_prefix()))
    }

    pub fn new(prefix: Option<String>) -> anyhow::Result<Self> {
        let request_errors = IntCounterVec::new(
            Opts::new(
                "request_errors",
                "A metric counting request errors by handler and error code",
            ),
            &["handler", "error_code"],
        )?;
        let analyses = IntCounter::new(
            "analyses_total",
            "Number of completed fleet analyses",
        )?;
        let readings_processed = IntCounter::new(
            "readings_processed_total",
            "Readings attributed to a known machine",
        )?;
        let readings_dropped = IntCounter::new(
            "readings_dropped_total",
            "Readings discarded because their machine is unknown",
        )?;
        let analysis_duration = Histogram::with_opts(
            HistogramOpts::new(
                "analysis_duration_seconds",
                "Wall time spent in the analysis engine",
            )
            .buckets(ANALYSIS_DURATION_BUCKETS.to_vec()),
        )?;

        let registry = Registry::new_custom(prefix, None)?;
        registry.register(Box::new(request_errors.clone()))?;
        registry.register(Box::new(analyses.clone()))?;
        registry.register(Box::new(readings_processed.clone()))?;
        registry.register(Box::new(readings_dropped.clone()))?;
        registry.register(Box::new(analysis_duration.clone()))?;

        Ok(Self {
            registry,
            request_errors,
            analyses,
            readings_processed,
            readings_dropped,
            analysis_duration,
        })
    }

    pub fn record_error(&self, handler: &str, error_code: &str) {
        self.request_errors
            .with_label_values(&[handler, error_code])
            .inc();
    }

    pub fn record_analysis(
        &self,
        accepted: usize,
        dropped: usize,
        elapsed: Duration,
    ) {
        self.analyses.inc();
        self.readings_processed.inc_by(accepted as u64);
        self.readings_dropped.inc_by(dropped as u64);
        self.analysis_duration.observe(elapsed.as_secs_f64());
    }
}
