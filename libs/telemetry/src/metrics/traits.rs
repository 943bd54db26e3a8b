use prometheus::{Encoder, Registry, TextEncoder};
use rand::Rng;

const RANDOM_PREFIX_LEN: usize = 8;

/// Service-specific metrics exposed next to the system metrics.
pub trait TelemetryMetrics: Clone + Send + Sync + 'static {
    fn registry(&self) -> &Registry;

    fn metrics(&self) -> Option<Self>;

    /// Renders the registry in the Prometheus text format.
    fn gather_metrics(&self) -> String {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        if let Err(e) = encoder.encode(&self.registry().gather(), &mut buffer) {
            tracing::error!("could not encode service metrics: {}", e);
            return String::default();
        }

        String::from_utf8(buffer).unwrap_or_else(|e| {
            tracing::error!("service metrics could not be from_utf8'd: {}", e);
            String::default()
        })
    }

    /// Lowercase prefix that keeps metric names unique when several
    /// registries live in one process (tests).
    fn generate_random_prefix() -> String {
        let mut rng = rand::rng();
        (0..RANDOM_PREFIX_LEN)
            .map(|_| char::from(rng.random_range(b'a'..=b'z')))
            .collect()
    }
}
