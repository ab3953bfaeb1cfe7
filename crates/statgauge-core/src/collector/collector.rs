//! Per-scrape collector for `/proc/stat`.
//!
//! `StatCollector` holds nothing but the filesystem handle and the source
//! path. Every call reads the source again and builds its own snapshot, so
//! one instance can serve concurrent scrapes through a shared reference.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, error, warn};

use crate::collector::procfs::{ParseOutcome, ParseWarning, parse_stat, read_stat};
use crate::collector::traits::FileSystem;
use crate::metrics::{Sample, map_snapshot};
use crate::model::SystemSnapshot;

/// Collects CPU and scheduler counters from `<proc_path>/stat`.
pub struct StatCollector<F: FileSystem> {
    fs: F,
    stat_path: PathBuf,
}

impl<F: FileSystem> StatCollector<F> {
    /// Creates a new collector.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `proc_path` - Base path to proc filesystem (usually "/proc")
    pub fn new(fs: F, proc_path: impl AsRef<Path>) -> Self {
        Self {
            fs,
            stat_path: proc_path.as_ref().join("stat"),
        }
    }

    /// Path of the statistics source this collector reads.
    pub fn stat_path(&self) -> &Path {
        &self.stat_path
    }

    /// Returns `true` if the statistics source currently exists.
    pub fn source_exists(&self) -> bool {
        self.fs.exists(&self.stat_path)
    }

    /// Reads and parses the source once.
    ///
    /// Never fails: an unreadable source is logged and yields an empty
    /// outcome, parse problems are logged and returned as warnings.
    pub fn collect(&self) -> ParseOutcome {
        let start = Instant::now();

        let content = match read_stat(&self.fs, &self.stat_path) {
            Ok(content) => content,
            Err(e) => {
                error!(error = %e, "failed to read stat source");
                return ParseOutcome::default();
            }
        };

        let outcome = parse_stat(&content);
        log_warnings(&self.stat_path, &outcome);

        debug!(
            cores = outcome.snapshot.cores.len(),
            scalars = outcome.snapshot.scalars.len(),
            duration_us = start.elapsed().as_micros() as u64,
            "stat collected"
        );

        outcome
    }

    /// Fresh snapshot of the source, see [`StatCollector::collect`].
    pub fn collect_snapshot(&self) -> SystemSnapshot {
        self.collect().snapshot
    }

    /// Current gauge samples, one per snapshot field.
    pub fn collect_samples(&self) -> Vec<Sample> {
        map_snapshot(&self.collect_snapshot())
    }
}

/// Logs parse problems once per scrape; unknown names only at debug level.
fn log_warnings(path: &Path, outcome: &ParseOutcome) {
    for warning in &outcome.warnings {
        if let ParseWarning::UnknownScalar { line, name } = warning {
            debug!(line, name = %name, "ignoring unknown stat counter");
        }
    }

    let mut malformed = outcome.malformed();
    if let Some(first) = malformed.next() {
        warn!(
            path = %path.display(),
            count = malformed.count() + 1,
            first = %first,
            "malformed lines in stat source, affected fields read as zero"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::MockFs;
    use crate::collector::traits::RealFs;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_collect_typical() {
        let collector = StatCollector::new(MockFs::typical_system(), "/proc");
        assert_eq!(collector.stat_path(), Path::new("/proc/stat"));
        assert!(collector.source_exists());

        let snapshot = collector.collect_snapshot();
        assert_eq!(snapshot.cores.len(), 4);
        assert_eq!(snapshot.scalars.btime, Some(1700000000));
        assert_eq!(snapshot.scalars.len(), 6);
    }

    #[test]
    fn test_collect_samples_count() {
        let collector = StatCollector::new(MockFs::typical_system(), "/proc");
        let samples = collector.collect_samples();
        assert_eq!(samples.len(), 4 * 8 + 6);
    }

    #[test]
    fn test_collect_missing_source() {
        let collector = StatCollector::new(MockFs::new(), "/proc");
        assert!(!collector.source_exists());

        let outcome = collector.collect();
        assert!(outcome.snapshot.is_empty());
        assert!(outcome.warnings.is_empty());
        assert!(collector.collect_samples().is_empty());
    }

    #[test]
    fn test_collect_custom_proc_path() {
        let mut fs = MockFs::new();
        fs.add_file("/host/proc/stat", "cpu\ncpu0 1 2 3 4 5 6 7\n");
        let collector = StatCollector::new(fs, "/host/proc");

        let snapshot = collector.collect_snapshot();
        assert_eq!(snapshot.cores.len(), 1);
        assert_eq!(snapshot.cores[0].idle, 4);
    }

    #[test]
    fn test_collect_malformed_is_partial() {
        let collector = StatCollector::new(MockFs::malformed_system(), "/proc");
        let outcome = collector.collect();
        assert_eq!(outcome.snapshot.cores.len(), 3);
        assert_eq!(outcome.snapshot.scalars.processes, Some(99));
        assert_eq!(outcome.warnings.len(), 5);
    }

    #[test]
    fn test_collect_survives_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("stat"),
            b"cpu  1 1 1 1 1 1 1\ncpu0 100 5 30 800 2 0 1\nbtime 1690000000\nweird\xff 1\n",
        )
        .unwrap();
        let collector = StatCollector::new(RealFs::new(), dir.path());

        let outcome = collector.collect();
        assert_eq!(outcome.snapshot.cores.len(), 1);
        assert_eq!(outcome.snapshot.cores[0].idle, 800);
        assert_eq!(outcome.snapshot.scalars.btime, Some(1690000000));
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.malformed().count(), 0);
    }

    #[test]
    fn test_concurrent_collect_identical() {
        let collector = Arc::new(StatCollector::new(MockFs::typical_system(), "/proc"));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let collector = Arc::clone(&collector);
                thread::spawn(move || collector.collect_snapshot())
            })
            .collect();

        let snapshots: Vec<SystemSnapshot> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();
        for snapshot in &snapshots[1..] {
            assert_eq!(snapshot, &snapshots[0]);
        }
        assert_eq!(snapshots[0].cores.len(), 4);
    }
}
