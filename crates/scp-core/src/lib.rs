//! Metric mapping layer of the Server Control Panel exporter.
//!
//! Converts responses of the REST and legacy SOAP APIs into labeled gauge
//! samples and renders them through an injected [`MetricsRegistry`].
//!
//! ```text
//! scp_api client --(ServerControlApi)--> ScpCollector ----\
//!                                                          +--> MetricsRegistry --> text exposition
//! SoapClient --(LegacyServerControlApi)--> LegacyCollector /
//! ```

pub mod collector;
pub mod convert;
pub mod error;
pub mod metrics;
pub mod model;
pub mod registry;
pub mod uptime;

pub use collector::{
    Collector, LegacyCollector, LegacyServerControlApi, ScpCollector, ServerControlApi,
};
pub use error::CoreError;
pub use metrics::{MetricDesc, Sample};
pub use registry::MetricsRegistry;
pub use uptime::{UptimeError, parse_uptime};
