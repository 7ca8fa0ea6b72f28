//! Validation of hierarchical records against rule sets.

#![deny(unsafe_code)]

pub mod compile;
pub mod error;
pub mod generalize;
pub mod issue;
pub mod report;
pub mod validator;

pub use compile::{Cardinality, CompiledRule, Obligation, Pattern, ValueType};
pub use error::{ConfigurationError, ValidateError};
pub use generalize::{generalize, generalize_address};
pub use issue::{Category, Issue};
pub use report::ValidationResult;
pub use validator::{
    ValidateOptions, Validator, gather_matching_values, matching_keys, validate,
};
