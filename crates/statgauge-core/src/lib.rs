//! statgauge-core: `/proc/stat` collection for the statgauge exporter.
//!
//! Provides:
//! - `collector`: filesystem abstraction, `/proc/stat` reader and parser,
//!   and the per-scrape [`collector::StatCollector`]
//! - `model`: snapshot types (per-core counters, scalar counters)
//! - `metrics`: snapshot to gauge sample mapping
//! - `util`: field name case helpers
//!
//! With `exporter` feature (default):
//! - `metrics::exporter`: Prometheus collector wrapping `StatCollector`

pub mod collector;
pub mod metrics;
pub mod model;
pub mod util;

/// Crate version with the git SHA it was built from.
pub const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("STATGAUGE_GIT_SHA"),
    ")"
);
