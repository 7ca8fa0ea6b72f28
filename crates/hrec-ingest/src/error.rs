use std::path::PathBuf;

use hrec_model::RecordError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("not a record at {pointer}: {message}")]
    Shape { pointer: String, message: String },

    #[error(transparent)]
    Record(#[from] RecordError),
}

impl IngestError {
    pub(crate) fn shape(pointer: &str, message: impl Into<String>) -> Self {
        Self::Shape {
            pointer: if pointer.is_empty() {
                "/".to_string()
            } else {
                pointer.to_string()
            },
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
