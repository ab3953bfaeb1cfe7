//! Prometheus collector over [`StatCollector`].
//!
//! Registered once in a [`prometheus::Registry`]; every `gather()` runs a
//! fresh read-parse-map pass and converts each sample into its own gauge
//! family. No descriptors are announced up front because the set of
//! families depends on what the source contains at scrape time.

use std::collections::HashMap;
use std::sync::Arc;

use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;
use prometheus::{Gauge, Opts};
use tracing::warn;

use crate::collector::{FileSystem, StatCollector};
use crate::metrics::Sample;

/// Exposes `/proc/stat` samples as Prometheus gauges.
pub struct StatExporter<F: FileSystem> {
    collector: Arc<StatCollector<F>>,
    const_labels: HashMap<String, String>,
}

impl<F: FileSystem> StatExporter<F> {
    pub fn new(collector: Arc<StatCollector<F>>) -> Self {
        Self {
            collector,
            const_labels: HashMap::new(),
        }
    }

    /// Attaches a constant label to every exported gauge.
    pub fn with_const_label(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.const_labels.insert(name.into(), value.into());
        self
    }

    fn gauge_family(&self, sample: &Sample) -> prometheus::Result<Vec<MetricFamily>> {
        let opts = Opts::new(sample.name.as_str(), sample.help.as_str())
            .const_labels(self.const_labels.clone());
        let gauge = Gauge::with_opts(opts)?;
        gauge.set(sample.value);
        Ok(gauge.collect())
    }
}

impl<F: FileSystem + 'static> Collector for StatExporter<F> {
    fn desc(&self) -> Vec<&Desc> {
        Vec::new()
    }

    fn collect(&self) -> Vec<MetricFamily> {
        let samples = self.collector.collect_samples();
        let mut families = Vec::with_capacity(samples.len());

        for sample in &samples {
            match self.gauge_family(sample) {
                Ok(family) => families.extend(family),
                Err(e) => warn!(metric = %sample.name, error = %e, "skipping invalid metric"),
            }
        }

        families
    }
}
