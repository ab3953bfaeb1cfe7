//! Reading and parsing `/proc/stat`.

pub mod parser;
pub mod reader;

pub use parser::{CORE_ROW_PREFIX, ParseOutcome, ParseWarning, parse_stat};
pub use reader::{CollectError, read_stat};
