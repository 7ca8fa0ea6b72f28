//! JSON interchange for records.
//!
//! A record document is a JSON object whose properties are arrays. Array
//! elements are scalars, `null`, or nested objects of the same shape:
//!
//! ```json
//! { "Name": ["Alice"], "Person": [{ "Email": ["a@b.com"] }] }
//! ```

use std::path::Path;

use serde_json::{Map, Value as JsonValue};
use tracing::debug;

use hrec_model::{Fields, Record, Value};

use crate::error::{IngestError, Result};

/// Convert a parsed JSON document into a record.
pub fn record_from_json(document: JsonValue) -> Result<Record> {
    match document {
        JsonValue::Object(map) => Ok(Record::from_data(fields_from_json(map, "")?)?),
        other => Err(IngestError::shape(
            "",
            format!("expected an object, found {}", json_kind(&other)),
        )),
    }
}

/// Parse a record document from a string.
pub fn parse_record(text: &str) -> Result<Record> {
    let document: JsonValue = serde_json::from_str(text)?;
    record_from_json(document)
}

/// Convert a record back into a JSON document.
pub fn record_to_json(record: &Record) -> Result<JsonValue> {
    Ok(serde_json::to_value(record)?)
}

/// Render a record as JSON text; `pretty` uses four-space indentation.
pub fn record_to_string(record: &Record, pretty: bool) -> Result<String> {
    if pretty {
        Ok(record.to_string())
    } else {
        Ok(serde_json::to_string(record)?)
    }
}

/// Load a record from a JSON file.
pub fn read_record(path: &Path) -> Result<Record> {
    let text = std::fs::read_to_string(path).map_err(|source| IngestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let record = parse_record(&text)?;
    debug!(path = %path.display(), keys = record.keys().len(), "loaded record");
    Ok(record)
}

/// Save a record to a JSON file.
pub fn write_record(path: &Path, record: &Record, pretty: bool) -> Result<()> {
    let text = record_to_string(record, pretty)?;
    std::fs::write(path, text).map_err(|source| IngestError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "wrote record");
    Ok(())
}

fn fields_from_json(map: Map<String, JsonValue>, pointer: &str) -> Result<Fields> {
    let mut fields = Fields::new();
    for (name, instances) in map {
        let field_pointer = format!("{pointer}/{name}");
        let JsonValue::Array(instances) = instances else {
            return Err(IngestError::shape(
                &field_pointer,
                format!(
                    "field values must be lists, found {}",
                    json_kind(&instances)
                ),
            ));
        };
        let values = instances
            .into_iter()
            .enumerate()
            .map(|(index, instance)| {
                value_from_json(instance, &format!("{field_pointer}/{index}"))
            })
            .collect::<Result<Vec<_>>>()?;
        fields.insert(name, values);
    }
    Ok(fields)
}

fn value_from_json(value: JsonValue, pointer: &str) -> Result<Value> {
    Ok(match value {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Bool(b),
        JsonValue::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Value::Integer(i),
            (None, Some(f)) if n.is_f64() => Value::Float(f),
            _ => {
                return Err(IngestError::shape(
                    pointer,
                    format!("integer out of range: {n}"),
                ));
            }
        },
        JsonValue::String(s) => Value::String(s),
        JsonValue::Object(map) => Value::Object(fields_from_json(map, pointer)?),
        JsonValue::Array(_) => {
            return Err(IngestError::shape(
                pointer,
                "instances must be scalars or objects, found a list",
            ));
        }
    })
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "a list",
        JsonValue::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_keep_their_kind() {
        let record = parse_record(r#"{"N": [1, 1.5, -3]}"#).unwrap();
        assert_eq!(
            record.get_field("N").unwrap(),
            &[Value::Integer(1), Value::Float(1.5), Value::Integer(-3)]
        );
    }

    #[test]
    fn rejects_non_list_fields() {
        let err = parse_record(r#"{"Person": [{"Email": "a@b.com"}]}"#).unwrap_err();
        match err {
            IngestError::Shape { pointer, .. } => assert_eq!(pointer, "/Person/0/Email"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_integers_beyond_i64() {
        let err = parse_record(r#"{"N": [18446744073709551615]}"#).unwrap_err();
        match err {
            IngestError::Shape { pointer, message } => {
                assert_eq!(pointer, "/N/0");
                assert!(message.starts_with("integer out of range"), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(parse_record(r#"{"N": [9223372036854775807]}"#).is_ok());
    }

    #[test]
    fn rejects_non_object_root() {
        let err = parse_record("[1, 2]").unwrap_err();
        assert!(matches!(err, IngestError::Shape { ref pointer, .. } if pointer == "/"));
    }

    #[test]
    fn rejects_nested_lists() {
        assert!(matches!(
            parse_record(r#"{"A": [[1]]}"#),
            Err(IngestError::Shape { .. })
        ));
    }
}
