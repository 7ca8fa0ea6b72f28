use thiserror::Error;

use hrec_ingest::IngestError;

/// A rule attribute the validator cannot interpret.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("rule {field:?}: field name is not a generalized address: {reason}")]
    InvalidFieldName { field: String, reason: String },
    #[error("rule {field:?}: unknown value type {token:?}")]
    UnknownValueType { field: String, token: String },
    #[error("rule {field:?}: {attribute} must be an integer, found {value:?}")]
    NotAnInteger {
        field: String,
        attribute: &'static str,
        value: String,
    },
    #[error("rule {field:?}: invalid validation pattern: {message}")]
    InvalidPattern { field: String, message: String },
}

/// Failure to validate a document before any rule runs.
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error("document is not a record: {0}")]
    NotARecord(#[source] IngestError),
}

pub type Result<T> = std::result::Result<T, ConfigurationError>;
