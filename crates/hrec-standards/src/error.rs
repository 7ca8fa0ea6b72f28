#![deny(unsafe_code)]

use std::path::PathBuf;

use hrec_model::RecordError;

#[derive(Debug, thiserror::Error)]
pub enum StandardsError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse CSV {path}: {message}")]
    Csv { path: PathBuf, message: String },

    #[error("failed to parse JSON in {path} line {line}: {source}")]
    Json {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid rule in {path} line {line}: {message}")]
    InvalidRow {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("rule in {path} line {line} rejected: {source}")]
    Rule {
        path: PathBuf,
        line: usize,
        #[source]
        source: RecordError,
    },

    #[error("cannot tell rule file format of {path} (expected .csv, .jsonl or .ndjson)")]
    UnknownFormat { path: PathBuf },
}

impl StandardsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Csv {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StandardsError>;
