//! CPU and scheduler counters from `/proc/stat`.
//!
//! Values are cumulative since boot and are kept as the kernel reports them;
//! no rates or unit conversion happen here.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::Serialize;

/// CPU time counters of a single core.
///
/// Source: `/proc/stat` line `cpuN user nice system idle iowait irq softirq ...`
///
/// All counters are clock ticks (USER_HZ) since boot.
#[derive(Clone, Serialize, Debug, PartialEq, Eq, Default)]
pub struct CoreCounters {
    /// Core identifier: `None` for the aggregate `cpu` row, `Some(n)` for `cpuN`.
    pub id: Option<u32>,

    /// Time spent in user mode.
    pub user: u64,

    /// Time spent in user mode with low priority (nice).
    pub nice: u64,

    /// Time spent in kernel mode.
    pub system: u64,

    /// Time spent idle.
    pub idle: u64,

    /// Time waiting for I/O to complete.
    pub iowait: u64,

    /// Time servicing hardware interrupts.
    pub irq: u64,

    /// Time servicing software interrupts.
    pub softirq: u64,
}

impl CoreCounters {
    /// Field names in the order [`CoreCounters::fields`] yields them.
    pub const FIELD_NAMES: [&'static str; 8] = [
        "Id", "User", "Nice", "System", "Idle", "Iowait", "Irq", "Softirq",
    ];

    /// Exported value of the aggregate sentinel id.
    pub const AGGREGATE_ID: u64 = u32::MAX as u64;

    /// Iterates `(field name, value)` pairs, id first.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, u64)> {
        let values = [
            self.id.map_or(Self::AGGREGATE_ID, u64::from),
            self.user,
            self.nice,
            self.system,
            self.idle,
            self.iowait,
            self.irq,
            self.softirq,
        ];
        Self::FIELD_NAMES.into_iter().zip(values)
    }
}

/// System-wide counters from the `name value` section of `/proc/stat`.
///
/// A field is `None` until its line has been seen.
#[derive(Clone, Serialize, Debug, PartialEq, Eq, Default)]
pub struct ScalarCounters {
    /// Interrupts serviced since boot.
    pub intr: Option<u64>,

    /// Context switches across all CPUs.
    pub ctxt: Option<u64>,

    /// Boot time, seconds since the Unix epoch.
    pub btime: Option<u64>,

    /// Processes and threads created (forks).
    pub processes: Option<u64>,

    /// Processes currently runnable.
    pub procs_running: Option<u64>,

    /// Processes currently blocked on I/O.
    pub procs_blocked: Option<u64>,
}

/// Accessor pair for one [`ScalarCounters`] field.
pub struct ScalarField {
    name: &'static str,
    get: fn(&ScalarCounters) -> Option<u64>,
    set: fn(&mut ScalarCounters, u64),
}

impl ScalarField {
    /// Field name with its first character upper-cased (`Procs_running`).
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn get(&self, counters: &ScalarCounters) -> Option<u64> {
        (self.get)(counters)
    }

    pub fn set(&self, counters: &mut ScalarCounters, value: u64) {
        (self.set)(counters, value)
    }
}

impl std::fmt::Debug for ScalarField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScalarField").field("name", &self.name).finish()
    }
}

static SCALAR_FIELDS: [ScalarField; 6] = [
    ScalarField {
        name: "Intr",
        get: |c| c.intr,
        set: |c, v| c.intr = Some(v),
    },
    ScalarField {
        name: "Ctxt",
        get: |c| c.ctxt,
        set: |c, v| c.ctxt = Some(v),
    },
    ScalarField {
        name: "Btime",
        get: |c| c.btime,
        set: |c, v| c.btime = Some(v),
    },
    ScalarField {
        name: "Processes",
        get: |c| c.processes,
        set: |c, v| c.processes = Some(v),
    },
    ScalarField {
        name: "Procs_running",
        get: |c| c.procs_running,
        set: |c, v| c.procs_running = Some(v),
    },
    ScalarField {
        name: "Procs_blocked",
        get: |c| c.procs_blocked,
        set: |c, v| c.procs_blocked = Some(v),
    },
];

static SCALAR_LOOKUP: LazyLock<HashMap<&'static str, &'static ScalarField>> =
    LazyLock::new(|| SCALAR_FIELDS.iter().map(|f| (f.name, f)).collect());

/// Resolves a normalized scalar name (`Btime`, `Procs_running`) to its field.
///
/// Lookup is exact; callers upper-case the first character beforehand.
pub fn scalar_field(name: &str) -> Option<&'static ScalarField> {
    SCALAR_LOOKUP.get(name).copied()
}

impl ScalarCounters {
    /// Value of a field by normalized name; absent and unknown read as zero.
    pub fn value(&self, name: &str) -> u64 {
        scalar_field(name).and_then(|f| f.get(self)).unwrap_or(0)
    }

    /// Iterates `(field name, value)` pairs of the fields that were set.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ {
        SCALAR_FIELDS
            .iter()
            .filter_map(move |f| f.get(self).map(|v| (f.name, v)))
    }

    /// Number of fields that were set.
    pub fn len(&self) -> usize {
        self.fields().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Result of parsing one read of `/proc/stat`.
///
/// Cores keep the kernel's reporting order. A snapshot is created per
/// scrape and dropped once its samples are emitted.
#[derive(Clone, Serialize, Debug, PartialEq, Eq, Default)]
pub struct SystemSnapshot {
    pub cores: Vec<CoreCounters>,
    pub scalars: ScalarCounters,
}

impl SystemSnapshot {
    /// Number of exported fields: eight per core plus every set scalar.
    pub fn field_count(&self) -> usize {
        self.cores.len() * CoreCounters::FIELD_NAMES.len() + self.scalars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cores.is_empty() && self.scalars.is_empty()
    }
}
