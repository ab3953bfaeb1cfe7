//! Data models for one read of `/proc/stat`.
//!
//! - [`CoreCounters`]: cumulative CPU time of one core
//! - [`ScalarCounters`]: system-wide `name value` counters
//! - [`SystemSnapshot`]: both of the above, built fresh per scrape
//!
//! Each record exposes its own ordered field list, so the metrics mapper
//! never names a field itself.

mod system;

pub use system::{CoreCounters, ScalarCounters, ScalarField, SystemSnapshot, scalar_field};
