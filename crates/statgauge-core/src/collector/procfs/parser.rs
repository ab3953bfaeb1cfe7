//! Parser for `/proc/stat` content.
//!
//! Parsing is best-effort: a malformed line degrades the affected fields to
//! zero (or is skipped) and is reported as a [`ParseWarning`], but never
//! stops the rest of the file from being read.
//!
//! Layout handled:
//!
//! ```text
//! cpu  10000 500 3000 80000 1000 200 100 0 0 0      <- skipped
//! cpu0 2500 125 750 20000 250 50 25 0 0 0           <- per-core rows
//! cpu1 2500 125 750 20000 250 50 25 0 0 0
//! intr 1000000 50 0 0 ...                           <- scalar rows
//! ctxt 500000
//! btime 1700000000
//! ```

use serde::Serialize;

use crate::model::{CoreCounters, ScalarCounters, SystemSnapshot, scalar_field};
use crate::util::upper_first;

/// Prefix of the first token on a per-core row (`cpu0`, `cpu1`, ...).
pub const CORE_ROW_PREFIX: &str = "cpu";

/// Counters expected after the tag on a per-core row.
const CORE_COUNTERS: usize = 7;

/// Non-fatal problem found while parsing.
///
/// Line numbers are 1-based positions in the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseWarning {
    /// A line had fewer tokens than its section requires.
    MalformedLine {
        line: usize,
        expected: usize,
        found: usize,
    },
    /// A token that should be an unsigned integer was not; zero was used.
    InvalidNumber {
        line: usize,
        field: &'static str,
        token: String,
    },
    /// A scalar line names a counter outside the recognized set.
    UnknownScalar { line: usize, name: String },
}

impl ParseWarning {
    /// Unknown scalar names are expected on newer kernels.
    pub fn is_unknown_scalar(&self) -> bool {
        matches!(self, ParseWarning::UnknownScalar { .. })
    }
}

impl std::fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseWarning::MalformedLine {
                line,
                expected,
                found,
            } => write!(
                f,
                "line {}: expected at least {} tokens, got {}",
                line, expected, found
            ),
            ParseWarning::InvalidNumber { line, field, token } => {
                write!(f, "line {}: invalid {} value {:?}", line, field, token)
            }
            ParseWarning::UnknownScalar { line, name } => {
                write!(f, "line {}: unknown counter {:?}", line, name)
            }
        }
    }
}

/// Snapshot assembled from the input together with everything that had to
/// be degraded on the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOutcome {
    pub snapshot: SystemSnapshot,
    pub warnings: Vec<ParseWarning>,
}

impl ParseOutcome {
    /// Warnings other than unknown scalar names.
    pub fn malformed(&self) -> impl Iterator<Item = &ParseWarning> {
        self.warnings.iter().filter(|w| !w.is_unknown_scalar())
    }
}

/// Parses `/proc/stat` content.
///
/// The first line (the aggregate `cpu` row) is always skipped. Following
/// lines whose first token starts with `cpu` are per-core rows; the first
/// line that does not ends that section, and every line after it is read as
/// a `name value` scalar.
pub fn parse_stat(content: &str) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();

    let mut lines = content
        .lines()
        .enumerate()
        .skip(1)
        .map(|(idx, line)| (idx + 1, line))
        .peekable();

    while let Some((line_no, line)) = lines.next_if(|(_, line)| is_core_row(line)) {
        let core = parse_core_row(line_no, line, &mut outcome.warnings);
        outcome.snapshot.cores.push(core);
    }

    for (line_no, line) in lines {
        parse_scalar_row(
            line_no,
            line,
            &mut outcome.snapshot.scalars,
            &mut outcome.warnings,
        );
    }

    outcome
}

fn is_core_row(line: &str) -> bool {
    line.split_whitespace()
        .next()
        .is_some_and(|tag| tag.starts_with(CORE_ROW_PREFIX))
}

/// Parses `cpuN user nice system idle iowait irq softirq [steal guest ...]`.
///
/// Missing or invalid counters read as zero; the row is always kept.
fn parse_core_row(line_no: usize, line: &str, warnings: &mut Vec<ParseWarning>) -> CoreCounters {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < CORE_COUNTERS + 1 {
        warnings.push(ParseWarning::MalformedLine {
            line: line_no,
            expected: CORE_COUNTERS + 1,
            found: tokens.len(),
        });
    }

    let tag = tokens.first().copied().unwrap_or_default();
    let id: Option<u32> = match tag.strip_prefix(CORE_ROW_PREFIX) {
        None | Some("") => None,
        Some(suffix) => Some(suffix.parse().unwrap_or_else(|_| {
            warnings.push(ParseWarning::InvalidNumber {
                line: line_no,
                field: "id",
                token: tag.to_string(),
            });
            0
        })),
    };

    let mut counter = |idx: usize, field: &'static str| -> u64 {
        tokens
            .get(idx)
            .map_or(0, |token| parse_u64(line_no, field, token, warnings))
    };

    CoreCounters {
        id,
        user: counter(1, "user"),
        nice: counter(2, "nice"),
        system: counter(3, "system"),
        idle: counter(4, "idle"),
        iowait: counter(5, "iowait"),
        irq: counter(6, "irq"),
        softirq: counter(7, "softirq"),
    }
}

/// Parses `name value [...]`. Only the first two tokens are used: `intr`
/// and `softirq` carry per-source breakdowns after the total.
fn parse_scalar_row(
    line_no: usize,
    line: &str,
    scalars: &mut ScalarCounters,
    warnings: &mut Vec<ParseWarning>,
) {
    let mut tokens = line.split_whitespace();
    let (name, value) = match (tokens.next(), tokens.next()) {
        (None, _) => return,
        (Some(name), Some(value)) => (name, value),
        (Some(_), None) => {
            warnings.push(ParseWarning::MalformedLine {
                line: line_no,
                expected: 2,
                found: 1,
            });
            return;
        }
    };

    let Some(field) = scalar_field(&upper_first(name)) else {
        warnings.push(ParseWarning::UnknownScalar {
            line: line_no,
            name: name.to_string(),
        });
        return;
    };

    let value = parse_u64(line_no, field.name(), value, warnings);
    field.set(scalars, value);
}

fn parse_u64(
    line_no: usize,
    field: &'static str,
    token: &str,
    warnings: &mut Vec<ParseWarning>,
) -> u64 {
    token.parse().unwrap_or_else(|_| {
        warnings.push(ParseWarning::InvalidNumber {
            line: line_no,
            field,
            token: token.to_string(),
        });
        0
    })
}
