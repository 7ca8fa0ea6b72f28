#![deny(unsafe_code)]

use std::path::Path;

use serde_json::Value as JsonValue;

use hrec_model::{RULE_COLUMNS, RuleRecord};

use crate::error::{Result, StandardsError};
use crate::rules::RuleRow;

/// Read a line-delimited rule file: one JSON object per non-blank line.
pub fn read_rules_jsonl(path: &Path) -> Result<Vec<RuleRow>> {
    let text = std::fs::read_to_string(path).map_err(|e| StandardsError::io(path, e))?;
    parse_rules_jsonl(&text, path)
}

/// Parse line-delimited rule rows; `path` is only used in error messages.
///
/// Numbers and booleans are accepted and converted to their text form, so
/// `{"Cardinality": 1}` reads the same as `{"Cardinality": "1"}`. A `null`
/// counts as an absent attribute.
pub fn parse_rules_jsonl(text: &str, path: &Path) -> Result<Vec<RuleRow>> {
    let mut rows = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        if raw.trim().is_empty() {
            continue;
        }
        let value: JsonValue =
            serde_json::from_str(raw).map_err(|source| StandardsError::Json {
                path: path.to_path_buf(),
                line,
                source,
            })?;
        let JsonValue::Object(map) = value else {
            return Err(StandardsError::InvalidRow {
                path: path.to_path_buf(),
                line,
                message: "each line must be a JSON object".to_string(),
            });
        };

        let mut attributes: [Option<String>; 6] = Default::default();
        for (slot, column) in attributes.iter_mut().zip(RULE_COLUMNS) {
            *slot = match map.get(column) {
                None | Some(JsonValue::Null) => None,
                Some(JsonValue::String(s)) => Some(s.trim().to_string()),
                Some(JsonValue::Number(n)) => Some(n.to_string()),
                Some(JsonValue::Bool(b)) => Some(b.to_string()),
                Some(_) => {
                    return Err(StandardsError::InvalidRow {
                        path: path.to_path_buf(),
                        line,
                        message: format!("{column:?} must be a string"),
                    });
                }
            };
        }
        let [
            field_name,
            value_type,
            obligation,
            cardinality,
            validation,
            children_required,
        ] = attributes;

        rows.push(RuleRow {
            line,
            record: RuleRecord {
                field_name,
                value_type,
                obligation,
                cardinality,
                validation,
                children_required,
            },
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_blank_lines_and_converts_numbers() {
        let text = concat!(
            r#"{"Field Name": "Name", "Value Type": "string", "Obligation": "r", "Cardinality": 1, "Validation": "", "Children Required": ""}"#,
            "\n\n",
            r#"{"Field Name": "Tag", "Value Type": "", "Obligation": "", "Cardinality": "n", "Validation": null, "Children Required": ""}"#,
            "\n",
        );
        let rows = parse_rules_jsonl(text, Path::new("rules.jsonl")).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].record.cardinality.as_deref(), Some("1"));
        assert_eq!(rows[1].line, 3);
        assert_eq!(rows[1].record.validation, None);
    }

    #[test]
    fn rejects_non_objects() {
        let err = parse_rules_jsonl("[1]\n", Path::new("rules.jsonl")).unwrap_err();
        assert!(matches!(err, StandardsError::InvalidRow { line: 1, .. }));
    }
}
