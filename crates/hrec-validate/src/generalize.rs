//! Generalized addresses: value addresses with every index stripped.
//!
//! `Person0.Email1` and `Person3.Email0` both generalize to `Person.Email`,
//! which is the form rules are declared against.

use hrec_model::{Address, SEPARATOR};

/// Strip the trailing digit run from every segment of a dotted address.
pub fn generalize(address: &str) -> String {
    address
        .split(SEPARATOR)
        .map(|segment| segment.trim_end_matches(|c: char| c.is_ascii_digit()))
        .collect::<Vec<_>>()
        .join(".")
}

/// Generalize a parsed address.
pub fn generalize_address(address: &Address) -> String {
    address
        .segments()
        .iter()
        .map(|segment| segment.name.as_str())
        .collect::<Vec<_>>()
        .join(".")
}

/// The generalized parent of a generalized name, if it is nested.
pub(crate) fn split_parent(general: &str) -> Option<(&str, &str)> {
    general.rsplit_once(SEPARATOR)
}
