//! Pre-built `/proc/stat` scenarios for testing.
//!
//! Contents mirror what real kernels print: an aggregate `cpu` row, one row
//! per core with the trailing steal/guest columns, then the scalar section
//! including the multi-column `intr` and `softirq` lines.

use super::filesystem::MockFs;

/// `/proc/stat` of a healthy four-core machine.
pub const TYPICAL_STAT: &str = "\
cpu  10000 500 3000 80000 1000 200 100 0 0 0
cpu0 2500 125 750 20000 250 50 25 0 0 0
cpu1 2600 130 760 19900 240 52 26 0 0 0
cpu2 2400 120 740 20100 260 48 24 0 0 0
cpu3 2500 125 750 20000 250 50 25 0 0 0
intr 1000000 50 0 0 0 0 0 0 0 1 0 0 0 100 0 0 1000
ctxt 500000
btime 1700000000
processes 10000
procs_running 2
procs_blocked 1
softirq 200000 10 50000 20 3000 4000 0 500 60000 0 82470
";

/// `/proc/stat` with a bad counter, a short row and an unknown scalar.
pub const MALFORMED_STAT: &str = "\
cpu  10000 500 3000 80000 1000 200 100 0 0 0
cpu0 100 5 30 800 2 0 1
cpu1 abc 5 30 800 2 0 1
cpu2 7 8
ctxt 42
unknownfield 42
btime oops
procs_running
processes 99
";

impl MockFs {
    /// Creates a filesystem whose `/proc/stat` holds `content`.
    pub fn with_stat(content: impl Into<Vec<u8>>) -> Self {
        let mut fs = Self::new();
        fs.add_file("/proc/stat", content);
        fs
    }

    /// Creates a typical four-core system, see [`TYPICAL_STAT`].
    pub fn typical_system() -> Self {
        Self::with_stat(TYPICAL_STAT)
    }

    /// Creates a system whose `/proc/stat` exercises every degraded path,
    /// see [`MALFORMED_STAT`].
    pub fn malformed_system() -> Self {
        Self::with_stat(MALFORMED_STAT)
    }
}
