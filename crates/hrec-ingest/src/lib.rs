#![deny(unsafe_code)]

pub mod error;
pub mod json;

pub use error::{IngestError, Result};
pub use json::{
    parse_record, read_record, record_from_json, record_to_json, record_to_string, write_record,
};
