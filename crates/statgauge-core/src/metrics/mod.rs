//! Mapping of snapshots to gauge samples.
//!
//! Names come from the snapshot records themselves: each field name is
//! lower-cased in its first character and prefixed with its namespace,
//! `core<i>` for the i-th core record and `fs` for scalar counters.
//! Adding a field to a record adds a sample without touching this module.
//!
//! ```text
//! cores[0].user        -> core0_user
//! cores[3].softirq     -> core3_softirq
//! scalars.procs_running -> fs_procs_running
//! ```

#[cfg(feature = "exporter")]
pub mod exporter;

use crate::model::SystemSnapshot;
use crate::util::lower_first;

/// Namespace of the scalar counter samples.
pub const SCALAR_NAMESPACE: &str = "fs";

/// Namespace of the samples of the core at `index` in the snapshot.
pub fn core_namespace(index: usize) -> String {
    format!("core{index}")
}

/// One unlabeled gauge value.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// `core<i>` or `fs`.
    pub namespace: String,
    /// Full metric name, `<namespace>_<field>`.
    pub name: String,
    pub help: String,
    pub value: f64,
}

impl Sample {
    fn gauge(namespace: &str, field: &str, value: u64) -> Self {
        let field = lower_first(field);
        Self {
            namespace: namespace.to_string(),
            name: format!("{namespace}_{field}"),
            help: format!("{field} info"),
            value: value as f64,
        }
    }
}

/// Emits one sample per field present in `snapshot`: cores first, in
/// snapshot order, then the scalar counters that were set.
pub fn map_snapshot(snapshot: &SystemSnapshot) -> Vec<Sample> {
    let mut samples = Vec::with_capacity(snapshot.field_count());

    for (index, core) in snapshot.cores.iter().enumerate() {
        let namespace = core_namespace(index);
        samples.extend(
            core.fields()
                .map(|(field, value)| Sample::gauge(&namespace, field, value)),
        );
    }

    samples.extend(
        snapshot
            .scalars
            .fields()
            .map(|(field, value)| Sample::gauge(SCALAR_NAMESPACE, field, value)),
    );

    samples
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::scenarios::{MALFORMED_STAT, TYPICAL_STAT};
    use crate::collector::procfs::parse_stat;
    use crate::model::CoreCounters;

    fn find<'a>(samples: &'a [Sample], name: &str) -> Option<&'a Sample> {
        samples.iter().find(|s| s.name == name)
    }

    #[test]
    fn test_map_core_sample() {
        let snapshot = parse_stat("cpu  0 0 0 0 0 0 0\ncpu0 100 5 30 800 2 0 1\n").snapshot;
        let samples = map_snapshot(&snapshot);

        assert_eq!(samples.len(), 8);
        let user = find(&samples, "core0_user").unwrap();
        assert_eq!(user.value, 100.0);
        assert_eq!(user.namespace, "core0");
        assert_eq!(user.help, "user info");

        let names: Vec<&str> = samples.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "core0_id",
                "core0_user",
                "core0_nice",
                "core0_system",
                "core0_idle",
                "core0_iowait",
                "core0_irq",
                "core0_softirq",
            ]
        );
    }

    #[test]
    fn test_map_scalar_sample() {
        let snapshot = parse_stat("cpu\nbtime 1690000000\n").snapshot;
        let samples = map_snapshot(&snapshot);

        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].name, "fs_btime");
        assert_eq!(samples[0].namespace, SCALAR_NAMESPACE);
        assert_eq!(samples[0].value, 1690000000.0);
    }

    #[test]
    fn test_map_scalar_name_keeps_rest_of_case() {
        let snapshot = parse_stat("cpu\nprocs_running 4\nprocs_blocked 1\n").snapshot;
        let samples = map_snapshot(&snapshot);

        assert_eq!(find(&samples, "fs_procs_running").unwrap().value, 4.0);
        assert_eq!(find(&samples, "fs_procs_blocked").unwrap().value, 1.0);
    }

    #[test]
    fn test_map_sample_count() {
        for content in [TYPICAL_STAT, MALFORMED_STAT, "", "cpu\n"] {
            let snapshot = parse_stat(content).snapshot;
            let samples = map_snapshot(&snapshot);
            assert_eq!(
                samples.len(),
                8 * snapshot.cores.len() + snapshot.scalars.len()
            );
            assert_eq!(samples.len(), snapshot.field_count());
        }
    }

    #[test]
    fn test_map_namespaces_by_position() {
        let snapshot = parse_stat(TYPICAL_STAT).snapshot;
        let samples = map_snapshot(&snapshot);

        for index in 0..4 {
            let namespace = core_namespace(index);
            assert_eq!(samples.iter().filter(|s| s.namespace == namespace).count(), 8);
        }
        assert_eq!(find(&samples, "core1_user").unwrap().value, 2600.0);
        assert_eq!(find(&samples, "core3_id").unwrap().value, 3.0);
        assert_eq!(find(&samples, "fs_intr").unwrap().value, 1000000.0);
        assert!(find(&samples, "fs_softirq").is_none());
    }

    #[test]
    fn test_map_unknown_scalar_no_sample() {
        let snapshot = parse_stat("cpu\nctxt 5\nunknownfield 42\n").snapshot;
        let samples = map_snapshot(&snapshot);

        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].name, "fs_ctxt");
        assert_eq!(samples[0].value, 5.0);
    }

    #[test]
    fn test_map_empty() {
        assert!(map_snapshot(&SystemSnapshot::default()).is_empty());
    }

    #[test]
    fn test_map_position_not_core_id() {
        let mut snapshot = SystemSnapshot::default();
        snapshot.cores.push(CoreCounters {
            id: Some(7),
            user: 1,
            ..Default::default()
        });
        let samples = map_snapshot(&snapshot);
        assert_eq!(find(&samples, "core0_id").unwrap().value, 7.0);
        assert_eq!(find(&samples, "core0_user").unwrap().value, 1.0);
    }
}
