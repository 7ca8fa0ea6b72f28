//! Rule set loaders.
//!
//! Both encodings produce [`RuleRow`]s, which are then admitted to a
//! [`RuleSet`] in file order. Rows with an empty `Field Name` are skipped.

pub mod csv;
pub mod jsonl;

use std::path::Path;

use tracing::debug;

use hrec_model::{RuleRecord, RuleSet};

use crate::error::{Result, StandardsError};

pub use self::csv::{parse_rules_csv, read_rules_csv};
pub use self::jsonl::{parse_rules_jsonl, read_rules_jsonl};

/// A rule row and the 1-based line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleRow {
    pub line: usize,
    pub record: RuleRecord,
}

/// Rule file encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RulesFormat {
    Csv,
    JsonLines,
}

impl RulesFormat {
    /// Guess the encoding from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "jsonl" | "ndjson" => Some(Self::JsonLines),
            _ => None,
        }
    }
}

/// Admit rows to a new rule set, in order.
pub fn build_rule_set(path: &Path, rows: Vec<RuleRow>) -> Result<RuleSet> {
    let mut rules = RuleSet::new();
    for RuleRow { line, record } in rows {
        if record.field_name.as_deref() == Some("") {
            debug!(line, "skipping rule row without a field name");
            continue;
        }
        rules
            .add(record)
            .map_err(|source| StandardsError::Rule {
                path: path.to_path_buf(),
                line,
                source,
            })?;
    }
    Ok(rules)
}

/// Load a rule set, using `format` or the file extension to pick the
/// encoding.
pub fn load_rule_set(path: &Path, format: Option<RulesFormat>) -> Result<RuleSet> {
    let format = format
        .or_else(|| RulesFormat::from_path(path))
        .ok_or_else(|| StandardsError::UnknownFormat {
            path: path.to_path_buf(),
        })?;
    let rows = match format {
        RulesFormat::Csv => read_rules_csv(path)?,
        RulesFormat::JsonLines => read_rules_jsonl(path)?,
    };
    let rules = build_rule_set(path, rows)?;
    debug!(path = %path.display(), ?format, rules = rules.len(), "loaded rule set");
    Ok(rules)
}
