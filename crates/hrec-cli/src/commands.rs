use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info_span, trace};

use hrec_ingest::read_record;
use hrec_model::{Lookup, Record};
use hrec_standards::{RulesFormat, load_rule_set};
use hrec_validate::{ValidateOptions, ValidationResult, Validator};

use crate::logging::redact_value;
use crate::output::to_pretty_json;

/// Load rules and a record document, then validate.
pub fn run_validate(
    record_path: &Path,
    rules_path: &Path,
    rules_format: Option<RulesFormat>,
    options: &ValidateOptions,
) -> Result<ValidationResult> {
    let span = info_span!(
        "validate_file",
        record = %record_path.display(),
        rules = %rules_path.display()
    );
    let _guard = span.enter();

    let rules = load_rule_set(rules_path, rules_format)
        .with_context(|| format!("load rules from {}", rules_path.display()))?;
    let validator = Validator::new(&rules)
        .with_context(|| format!("compile rules from {}", rules_path.display()))?;

    let text = std::fs::read_to_string(record_path)
        .with_context(|| format!("read {}", record_path.display()))?;
    let document: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("parse {}", record_path.display()))?;
    let result = validator
        .validate_document(document, options)
        .with_context(|| format!("validate {}", record_path.display()))?;
    Ok(result)
}

fn load(record_path: &Path) -> Result<Record> {
    read_record(record_path).with_context(|| format!("load record {}", record_path.display()))
}

pub fn run_keys(record_path: &Path) -> Result<Vec<String>> {
    Ok(load(record_path)?.keys())
}

/// Leaf addresses with each value as compact JSON.
pub fn run_leaves(record_path: &Path) -> Result<Vec<(String, String)>> {
    let record = load(record_path)?;
    record
        .leaves()
        .into_iter()
        .map(|(address, value)| Ok((address, serde_json::to_string(value)?)))
        .collect()
}

/// Resolve one address and render what it holds.
pub fn run_get(record_path: &Path, address: &str) -> Result<String> {
    let record = load(record_path)?;
    let lookup = record
        .get(address)
        .with_context(|| format!("resolve {address}"))?;
    let rendered = match lookup {
        Lookup::Value(value) => to_pretty_json(value)?,
        Lookup::Field(instances) => to_pretty_json(instances)?,
    };
    trace!(address, value = redact_value(&rendered), "resolved address");
    Ok(rendered)
}
