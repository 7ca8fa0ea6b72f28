//! Validation issue types.
//!
//! Each variant carries only the data its message needs. The `Display`
//! form is the message reported to callers.

use std::fmt;

use serde::{Deserialize, Serialize};

use hrec_model::ValueKind;

/// Which kind of rule an issue came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Structure,
    Presence,
    Cardinality,
    Type,
    Children,
    Format,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Structure => "Structure",
            Self::Presence => "Presence",
            Self::Cardinality => "Cardinality",
            Self::Type => "Type",
            Self::Children => "Children",
            Self::Format => "Format",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Issue {
    /// A key whose generalized form no rule declares (strict mode).
    BadKey { address: String },
    /// A required top-level field has no instances.
    MissingRequired { field: String },
    /// A parent instance lacks a required child field.
    MissingRequiredChild { field: String, parent: String },
    /// Instance count differs from the declared cardinality.
    CardinalityMismatch {
        field: String,
        parent: Option<String>,
        actual: usize,
        expected: usize,
    },
    TypeMismatch {
        address: String,
        actual: ValueKind,
        expected: ValueKind,
    },
    /// Fewer child fields present than the rule demands.
    TooFewChildren {
        address: String,
        present: usize,
        required: usize,
        candidates: Vec<String>,
    },
    PatternMismatch { address: String, pattern: String },
}

impl Issue {
    pub fn category(&self) -> Category {
        match self {
            Issue::BadKey { .. } => Category::Structure,
            Issue::MissingRequired { .. } | Issue::MissingRequiredChild { .. } => {
                Category::Presence
            }
            Issue::CardinalityMismatch { .. } => Category::Cardinality,
            Issue::TypeMismatch { .. } => Category::Type,
            Issue::TooFewChildren { .. } => Category::Children,
            Issue::PatternMismatch { .. } => Category::Format,
        }
    }

    /// The address or field name the issue is about.
    pub fn subject(&self) -> &str {
        match self {
            Issue::BadKey { address }
            | Issue::TypeMismatch { address, .. }
            | Issue::TooFewChildren { address, .. }
            | Issue::PatternMismatch { address, .. } => address,
            Issue::MissingRequired { field } => field,
            Issue::MissingRequiredChild { parent, .. } => parent,
            Issue::CardinalityMismatch { field, parent, .. } => parent.as_deref().unwrap_or(field),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::BadKey { address } => write!(f, "Bad key: {address}"),
            Issue::MissingRequired { field } => write!(f, "Missing required key: {field}"),
            Issue::MissingRequiredChild { field, parent } => {
                write!(f, "Missing required key: {field} from {parent}")
            }
            Issue::CardinalityMismatch {
                field,
                parent,
                actual,
                expected,
            } => {
                write!(f, "Cardinality mismatch: {field}")?;
                if let Some(parent) = parent {
                    write!(f, " in {parent}")?;
                }
                write!(f, " has {actual} instance(s), expected {expected}")
            }
            Issue::TypeMismatch {
                address,
                actual,
                expected,
            } => write!(f, "Type mismatch: {address} is {actual}, expected {expected}"),
            Issue::TooFewChildren {
                address,
                present,
                required,
                candidates,
            } => write!(
                f,
                "Fewer than required children: {address} has {present} of {required} required children (candidates: {})",
                candidates.join(", ")
            ),
            Issue::PatternMismatch { address, pattern } => {
                write!(f, "Validation failed: {address} does not match {pattern}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            Issue::MissingRequiredChild {
                field: "Email".into(),
                parent: "Person1".into(),
            }
            .to_string(),
            "Missing required key: Email from Person1"
        );
        assert_eq!(
            Issue::CardinalityMismatch {
                field: "Name".into(),
                parent: None,
                actual: 2,
                expected: 1,
            }
            .to_string(),
            "Cardinality mismatch: Name has 2 instance(s), expected 1"
        );
        assert_eq!(
            Issue::TypeMismatch {
                address: "Age0".into(),
                actual: ValueKind::String,
                expected: ValueKind::Integer,
            }
            .to_string(),
            "Type mismatch: Age0 is string, expected integer"
        );
    }

    #[test]
    fn subject_prefers_parent() {
        let issue = Issue::CardinalityMismatch {
            field: "Email".into(),
            parent: Some("Person0".into()),
            actual: 0,
            expected: 1,
        };
        assert_eq!(issue.subject(), "Person0");
        assert_eq!(issue.category(), Category::Cardinality);
    }
}
