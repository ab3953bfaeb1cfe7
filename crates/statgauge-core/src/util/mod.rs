//! Helper utilities.

/// Upper-cases the first character of `name`, leaving the rest unchanged.
///
/// `procs_running` becomes `Procs_running`, the form scalar fields are
/// looked up by.
pub fn upper_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lower-cases the first character of `name`, leaving the rest unchanged.
///
/// Inverse of [`upper_first`] for ASCII names; used to build metric names.
pub fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
