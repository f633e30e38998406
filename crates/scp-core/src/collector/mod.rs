// ── Collectors ──
//
// A collector describes the gauge families it can produce and, per scrape,
// queries the upstream API and maps the responses into samples. Upstream
// failures are logged and degrade the output; they never fail the scrape.

mod api;
mod legacy;
mod rest;

use futures_util::future::BoxFuture;

use crate::metrics::{MetricDesc, Sample};

pub use api::{LegacyServerControlApi, ServerControlApi};
pub use legacy::LegacyCollector;
pub use rest::ScpCollector;

/// A source of samples registered on the [`MetricsRegistry`](crate::MetricsRegistry).
pub trait Collector: Send + Sync {
    /// Static descriptor set. Never performs I/O.
    fn describe(&self) -> &'static [&'static MetricDesc];

    /// Run one scrape.
    fn collect(&self) -> BoxFuture<'_, Vec<Sample>>;
}
