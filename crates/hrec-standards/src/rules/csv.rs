#![deny(unsafe_code)]

use std::path::Path;

use hrec_model::{RULE_COLUMNS, RuleRecord};

use crate::error::{Result, StandardsError};
use crate::rules::RuleRow;

/// Read a tabular rule file.
///
/// The header row names the columns; the six rule columns may appear in any
/// order and extra columns are ignored. Values are trimmed and a leading
/// byte order mark on the header row is dropped.
pub fn read_rules_csv(path: &Path) -> Result<Vec<RuleRow>> {
    let bytes = std::fs::read(path).map_err(|e| StandardsError::io(path, e))?;
    parse_rules_csv(&bytes, path)
}

/// Parse tabular rule rows; `path` is only used in error messages.
pub fn parse_rules_csv(bytes: &[u8], path: &Path) -> Result<Vec<RuleRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| StandardsError::csv(path, e))?
        .clone();

    let header_idx = |name: &str| -> Option<usize> {
        headers
            .iter()
            .position(|h| h.trim_matches('\u{feff}').trim() == name)
    };
    let [field_i, type_i, obligation_i, cardinality_i, validation_i, children_i] =
        RULE_COLUMNS.map(header_idx);

    let mut rows = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| StandardsError::csv(path, e))?;
        let line = row
            .position()
            .map_or(0, |p| usize::try_from(p.line()).unwrap_or(usize::MAX));

        let get = |i: Option<usize>| -> Option<String> {
            i.map(|i| row.get(i).unwrap_or("").trim().to_string())
        };

        rows.push(RuleRow {
            line,
            record: RuleRecord {
                field_name: get(field_i),
                value_type: get(type_i),
                obligation: get(obligation_i),
                cardinality: get(cardinality_i),
                validation: get(validation_i),
                children_required: get(children_i),
            },
        });
    }

    Ok(rows)
}
