//! `/proc/stat` collector.
//!
//! Reads the kernel's CPU/scheduler counter file, parses it into a
//! [`SystemSnapshot`](crate::model::SystemSnapshot) and hands the snapshot
//! to the metrics mapper. Filesystem access goes through the [`FileSystem`]
//! trait so the whole pipeline runs against an in-memory [`MockFs`] in tests
//! and on non-Linux hosts.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │                 StatCollector                 │
//! │  ┌──────────────┐  ┌──────────┐  ┌─────────┐  │
//! │  │  read_stat   │─▶│parse_stat│─▶│ mapper  │  │
//! │  │ <proc>/stat  │  │ snapshot │  │ samples │  │
//! │  └──────┬───────┘  └──────────┘  └─────────┘  │
//! │         │                                     │
//! │  ┌──────▼──────┐                              │
//! │  │  FileSystem │ (trait)                      │
//! │  └──────┬──────┘                              │
//! └─────────┼─────────────────────────────────────┘
//!           │
//!    ┌──────┴───────┐
//!    │              │
//! ┌──▼─────┐  ┌─────▼─────┐
//! │ RealFs │  │  MockFs   │
//! │(Linux) │  │ (Testing) │
//! └────────┘  └───────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use statgauge_core::collector::{MockFs, StatCollector};
//!
//! let collector = StatCollector::new(MockFs::typical_system(), "/proc");
//! let snapshot = collector.collect_snapshot();
//! assert_eq!(snapshot.cores.len(), 4);
//! ```

#[allow(clippy::module_inception)]
mod collector;
pub mod mock;
pub mod procfs;
pub mod traits;

pub use collector::StatCollector;
pub use mock::MockFs;
pub use procfs::{CollectError, ParseOutcome, ParseWarning};
pub use traits::{FileSystem, RealFs};
