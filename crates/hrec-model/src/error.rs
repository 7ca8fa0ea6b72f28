use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("malformed address {address:?}: {reason}")]
    MalformedAddress { address: String, reason: String },
    #[error("invalid field name {name:?}: {reason}")]
    InvalidFieldName { name: String, reason: String },
    #[error("no such value or field: {address}")]
    NotFound { address: String },
    #[error("field does not exist: {address}")]
    FieldNotFound { address: String },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("rule is missing attribute {attribute:?}")]
    MissingAttribute { attribute: &'static str },
}

impl RecordError {
    pub(crate) fn malformed(address: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedAddress {
            address: address.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn not_found(address: impl ToString) -> Self {
        Self::NotFound {
            address: address.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RecordError>;
