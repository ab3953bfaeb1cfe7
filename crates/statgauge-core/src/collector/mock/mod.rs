//! In-memory filesystem and canned `/proc/stat` contents for tests.

mod filesystem;
pub mod scenarios;

pub use filesystem::MockFs;
