use thiserror::Error;

/// Errors raised while wiring up or rendering the metrics registry.
///
/// Upstream API failures never surface here; collectors log them and
/// degrade their output instead.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Descriptor rejected by the Prometheus client (bad name or label).
    #[error("invalid metric descriptor {name}: {source}")]
    InvalidDescriptor {
        name: &'static str,
        #[source]
        source: prometheus::Error,
    },

    /// Two collectors (or a collector and a static metric) share a name.
    #[error("metric {name} is already registered")]
    DuplicateMetric { name: String },

    /// Registering or encoding through the Prometheus client failed.
    #[error("prometheus client error: {0}")]
    Prometheus(#[from] prometheus::Error),
}
