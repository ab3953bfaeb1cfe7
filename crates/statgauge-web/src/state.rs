//! Shared application state: the collector and the two registries.
//!
//! Stat gauges live in their own registry so a slow source can be bounded
//! by the scrape timeout without losing the handler's own metrics.

use std::sync::Arc;
use std::time::Duration;

use prometheus::{IntCounterVec, IntGauge, Opts, Registry};
use tokio::sync::Semaphore;

use statgauge_core::collector::{FileSystem, StatCollector};
use statgauge_core::metrics::exporter::StatExporter;

pub(crate) type HostCollector = StatCollector<Box<dyn FileSystem>>;

/// Metrics about the metrics endpoint itself.
pub(crate) struct HandlerMetrics {
    pub(crate) requests: IntCounterVec,
    pub(crate) in_flight: IntGauge,
}

impl HandlerMetrics {
    fn register(registry: &Registry) -> prometheus::Result<Self> {
        let requests = IntCounterVec::new(
            Opts::new(
                "promhttp_metric_handler_requests_total",
                "Total number of scrapes by HTTP status code.",
            ),
            &["code"],
        )?;
        let in_flight = IntGauge::new(
            "promhttp_metric_handler_requests_in_flight",
            "Current number of scrapes being served.",
        )?;
        registry.register(Box::new(requests.clone()))?;
        registry.register(Box::new(in_flight.clone()))?;
        Ok(Self {
            requests,
            in_flight,
        })
    }
}

pub(crate) struct AppState {
    pub(crate) collector: Arc<HostCollector>,
    pub(crate) stat_registry: Registry,
    pub(crate) telemetry_registry: Registry,
    pub(crate) handler_metrics: HandlerMetrics,
    /// Upper bound for one read-parse pass of the stat source.
    pub(crate) scrape_timeout: Duration,
    /// Single permit held by the blocking task reading the stat source,
    /// including after its scrape timed out.
    pub(crate) source_permit: Arc<Semaphore>,
}

impl AppState {
    /// Wires the collector into fresh registries.
    ///
    /// `domain`, when set, becomes a constant `domain` label on every stat gauge.
    pub(crate) fn new(
        collector: Arc<HostCollector>,
        domain: Option<&str>,
        scrape_timeout: Duration,
    ) -> prometheus::Result<Self> {
        let mut exporter = StatExporter::new(Arc::clone(&collector));
        if let Some(domain) = domain {
            exporter = exporter.with_const_label("domain", domain);
        }

        let stat_registry = Registry::new();
        stat_registry.register(Box::new(exporter))?;

        let telemetry_registry = Registry::new();
        let handler_metrics = HandlerMetrics::register(&telemetry_registry)?;

        Ok(Self {
            collector,
            stat_registry,
            telemetry_registry,
            handler_metrics,
            scrape_timeout,
            source_permit: Arc::new(Semaphore::new(1)),
        })
    }
}

pub(crate) type SharedState = Arc<AppState>;
