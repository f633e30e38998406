// ── Metrics registry ──
//
// Owns the static process metrics and the registered collectors. Each
// scrape builds fresh gauge families in a scratch `prometheus::Registry`,
// so nothing from an earlier scrape leaks into the next one.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use prometheus::core::Desc;
use prometheus::proto::MetricFamily;
use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};
use tracing::{debug, warn};

use crate::collector::Collector;
use crate::error::CoreError;
use crate::metrics::{MetricDesc, Sample};

const BUILD_INFO: &str = "scp_build_info";

/// Injected registry shared by the HTTP layer.
pub struct MetricsRegistry {
    static_registry: Registry,
    collectors: Vec<Box<dyn Collector>>,
    names: HashSet<String>,
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self {
            static_registry: Registry::new(),
            collectors: Vec::new(),
            names: HashSet::new(),
        }
    }

    /// Register the constant `scp_build_info{version}` gauge.
    pub fn register_build_info(&mut self, version: &str) -> Result<(), CoreError> {
        self.claim(BUILD_INFO)?;
        let gauge = GaugeVec::new(
            Opts::new(
                BUILD_INFO,
                "A metric with a constant '1' value labeled by the exporter version",
            ),
            &["version"],
        )?;
        gauge.with_label_values(&[version]).set(1.0);
        self.static_registry.register(Box::new(gauge))?;
        Ok(())
    }

    /// Validate a collector's descriptors and add it to the scrape set.
    pub fn register<C: Collector + 'static>(&mut self, collector: C) -> Result<(), CoreError> {
        let descs = collector.describe();
        for desc in descs {
            validate(desc)?;
        }

        let mut batch = HashSet::new();
        for desc in descs {
            if self.names.contains(desc.name) || !batch.insert(desc.name) {
                return Err(CoreError::DuplicateMetric {
                    name: desc.name.to_owned(),
                });
            }
        }
        self.names.extend(batch.into_iter().map(str::to_owned));

        debug!(metrics = descs.len(), "collector registered");
        self.collectors.push(Box::new(collector));
        Ok(())
    }

    fn claim(&mut self, name: &str) -> Result<(), CoreError> {
        if self.names.insert(name.to_owned()) {
            Ok(())
        } else {
            Err(CoreError::DuplicateMetric {
                name: name.to_owned(),
            })
        }
    }

    /// Run every collector once and return the resulting families.
    pub async fn gather(&self) -> Vec<MetricFamily> {
        let mut families = self.static_registry.gather();

        let scratch = Registry::new();
        for collector in &self.collectors {
            let samples = collector.collect().await;
            record(&scratch, samples);
        }
        families.extend(scratch.gather());
        families
    }

    /// Scrape and encode in the text exposition format.
    pub async fn render(&self) -> Result<String, CoreError> {
        let families = self.gather().await;
        let mut buf = Vec::new();
        TextEncoder::new().encode(&families, &mut buf)?;
        String::from_utf8(buf)
            .map_err(|e| CoreError::Prometheus(prometheus::Error::Msg(e.to_string())))
    }

    /// Content type of [`render`](Self::render) output.
    pub fn content_type() -> String {
        TextEncoder::new().format_type().to_owned()
    }
}

fn validate(desc: &MetricDesc) -> Result<(), CoreError> {
    Desc::new(
        desc.name.to_owned(),
        desc.help.to_owned(),
        desc.labels.iter().map(|l| (*l).to_owned()).collect(),
        HashMap::new(),
    )
    .map(|_| ())
    .map_err(|source| CoreError::InvalidDescriptor {
        name: desc.name,
        source,
    })
}

/// Fold samples into per-family gauges on `scratch`.
///
/// Repeated label sets collapse onto one series; the last value wins.
fn record(scratch: &Registry, samples: Vec<Sample>) {
    let mut families: HashMap<&'static str, GaugeVec> = HashMap::new();

    for sample in samples {
        let gauge = match families.entry(sample.desc.name) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => {
                let created = GaugeVec::new(
                    Opts::new(sample.desc.name, sample.desc.help),
                    sample.desc.labels,
                )
                .and_then(|g| scratch.register(Box::new(g.clone())).map(|()| g));
                match created {
                    Ok(g) => e.insert(g),
                    Err(err) => {
                        warn!(metric = sample.desc.name, error = %err, "unable to create gauge");
                        continue;
                    }
                }
            }
        };

        let labels: Vec<&str> = sample.labels.iter().map(String::as_str).collect();
        match gauge.get_metric_with_label_values(labels.as_slice()) {
            Ok(g) => g.set(sample.value),
            Err(err) => warn!(metric = sample.desc.name, error = %err, "dropping sample"),
        }
    }
}
