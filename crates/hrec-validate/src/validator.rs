//! Rule-driven record validation.
//!
//! Every key in the record is generalized once. Each rule is then checked
//! against the instances whose generalized address equals its field name:
//!
//! 1. Strict mode: every generalized key must be declared by some rule.
//! 2. Required fields must have instances. For nested rules the check is
//!    made per parent instance.
//! 3. Rules with no matching instances stop here.
//! 4. Cardinality, value type, children required and validation pattern
//!    are checked against the matching instances.
//!
//! Messages are reported in that order, rule by rule.

use std::collections::BTreeSet;

use tracing::{debug, info, info_span};

use hrec_ingest::record_from_json;
use hrec_model::{Record, RuleSet, Value};

use crate::compile::{Cardinality, CompiledRule};
use crate::error::{ConfigurationError, Result, ValidateError};
use crate::generalize::{generalize, split_parent};
use crate::issue::Issue;
use crate::report::ValidationResult;

/// Switches for a validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidateOptions {
    /// Report keys that no rule declares.
    pub strict: bool,
    /// Report required fields that have no instances.
    pub missing_is_error: bool,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            strict: true,
            missing_is_error: true,
        }
    }
}

impl ValidateOptions {
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    #[must_use]
    pub fn with_missing_is_error(mut self, missing_is_error: bool) -> Self {
        self.missing_is_error = missing_is_error;
        self
    }
}

/// An instance in the record with its concrete and generalized address.
struct Instance<'a> {
    address: String,
    general: String,
    value: &'a Value,
}

fn collect_instances(record: &Record) -> Vec<Instance<'_>> {
    record
        .entries()
        .into_iter()
        .map(|(address, value)| Instance {
            general: generalize(&address),
            address,
            value,
        })
        .collect()
}

/// Rules compiled once and applied to any number of records.
#[derive(Debug, Clone)]
pub struct Validator {
    rules: Vec<CompiledRule>,
}

impl Validator {
    /// Compile every rule, failing on the first one that cannot be interpreted.
    pub fn new(rules: &RuleSet) -> Result<Self> {
        let rules = rules
            .iter()
            .map(CompiledRule::compile)
            .collect::<Result<Vec<_>>>()?;
        debug!(rules = rules.len(), "compiled rule set");
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    pub fn validate(&self, record: &Record, options: &ValidateOptions) -> ValidationResult {
        let span = info_span!(
            "validate",
            rules = self.rules.len(),
            strict = options.strict,
            missing_is_error = options.missing_is_error
        );
        let _guard = span.enter();

        let instances = collect_instances(record);
        let mut issues = Vec::new();

        if options.strict {
            let declared: BTreeSet<&str> =
                self.rules.iter().map(|rule| rule.field_name.as_str()).collect();
            issues.extend(
                instances
                    .iter()
                    .filter(|instance| !declared.contains(instance.general.as_str()))
                    .map(|instance| Issue::BadKey {
                        address: instance.address.clone(),
                    }),
            );
        }

        for rule in &self.rules {
            let before = issues.len();
            self.check_rule(rule, &instances, options, &mut issues);
            if issues.len() > before {
                debug!(
                    field = %rule.field_name,
                    issues = issues.len() - before,
                    "rule not satisfied"
                );
            }
        }

        let result = ValidationResult::from_issues(issues);
        info!(
            keys = instances.len(),
            valid = result.valid,
            errors = result.error_count(),
            "validation finished"
        );
        result
    }

    /// Validate a JSON document that should hold a record.
    pub fn validate_document(
        &self,
        document: serde_json::Value,
        options: &ValidateOptions,
    ) -> std::result::Result<ValidationResult, ValidateError> {
        let record = record_from_json(document).map_err(ValidateError::NotARecord)?;
        Ok(self.validate(&record, options))
    }

    fn check_rule(
        &self,
        rule: &CompiledRule,
        instances: &[Instance<'_>],
        options: &ValidateOptions,
        issues: &mut Vec<Issue>,
    ) {
        let field = rule.field_name.as_str();
        let matching: Vec<&Instance<'_>> = instances
            .iter()
            .filter(|instance| instance.general == field)
            .collect();
        let nesting = split_parent(field);
        let parents = |parent: &str| {
            instances
                .iter()
                .filter(move |instance| instance.general == parent)
                .collect::<Vec<_>>()
        };

        if rule.obligation.is_required() && options.missing_is_error {
            match nesting {
                None if matching.is_empty() => issues.push(Issue::MissingRequired {
                    field: field.to_string(),
                }),
                None => {}
                Some((parent, leaf)) => {
                    for instance in parents(parent) {
                        let present = instance
                            .value
                            .as_object()
                            .is_some_and(|children| children.contains_key(leaf));
                        if !present {
                            issues.push(Issue::MissingRequiredChild {
                                field: leaf.to_string(),
                                parent: instance.address.clone(),
                            });
                        }
                    }
                }
            }
        }

        if matching.is_empty() {
            return;
        }

        if let Cardinality::Exactly(expected) = rule.cardinality {
            match nesting {
                None => {
                    if matching.len() != expected {
                        issues.push(Issue::CardinalityMismatch {
                            field: field.to_string(),
                            parent: None,
                            actual: matching.len(),
                            expected,
                        });
                    }
                }
                Some((parent, leaf)) => {
                    for instance in parents(parent) {
                        let actual = instance
                            .value
                            .as_object()
                            .and_then(|children| children.get(leaf))
                            .map_or(0, Vec::len);
                        if actual != expected {
                            issues.push(Issue::CardinalityMismatch {
                                field: leaf.to_string(),
                                parent: Some(instance.address.clone()),
                                actual,
                                expected,
                            });
                        }
                    }
                }
            }
        }

        if let Some(value_type) = rule.value_type {
            for instance in &matching {
                if !value_type.accepts(instance.value) {
                    issues.push(Issue::TypeMismatch {
                        address: instance.address.clone(),
                        actual: instance.value.kind(),
                        expected: value_type.kind(),
                    });
                }
            }
        }

        if let Some(required) = rule.children_required {
            let candidates = self.child_fields(field);
            for instance in &matching {
                let present = candidates
                    .iter()
                    .filter(|leaf| {
                        instance
                            .value
                            .as_object()
                            .and_then(|children| children.get(**leaf))
                            .is_some_and(|values| !values.is_empty())
                    })
                    .count();
                if present < required {
                    issues.push(Issue::TooFewChildren {
                        address: instance.address.clone(),
                        present,
                        required,
                        candidates: candidates
                            .iter()
                            .map(|leaf| format!("{}.{leaf}", instance.address))
                            .collect(),
                    });
                }
            }
        }

        if let Some(pattern) = &rule.validation {
            for instance in &matching {
                if !pattern.matches(instance.value) {
                    issues.push(Issue::PatternMismatch {
                        address: instance.address.clone(),
                        pattern: pattern.as_str().to_string(),
                    });
                }
            }
        }
    }

    /// Leaf names of the rules exactly one level below `field`.
    fn child_fields<'r>(&'r self, field: &str) -> Vec<&'r str> {
        let mut children: Vec<&str> = Vec::new();
        for rule in &self.rules {
            if let Some((parent, leaf)) = split_parent(&rule.field_name)
                && parent == field
                && !children.contains(&leaf)
            {
                children.push(leaf);
            }
        }
        children
    }
}

/// Compile `rules` and validate `record` against them.
pub fn validate(
    record: &Record,
    rules: &RuleSet,
    options: &ValidateOptions,
) -> std::result::Result<ValidationResult, ConfigurationError> {
    Ok(Validator::new(rules)?.validate(record, options))
}

/// Concrete addresses whose generalized form equals `general`.
pub fn matching_keys(general: &str, record: &Record) -> Vec<String> {
    record
        .keys()
        .into_iter()
        .filter(|key| generalize(key) == general)
        .collect()
}

/// Values at every address whose generalized form equals `general`.
pub fn gather_matching_values<'a>(general: &str, record: &'a Record) -> Vec<&'a Value> {
    record
        .entries()
        .into_iter()
        .filter(|(address, _)| generalize(address) == general)
        .map(|(_, value)| value)
        .collect()
}

#[cfg(test)]
mod tests {
    use hrec_model::RuleRecord;

    use super::*;

    fn rules(records: Vec<RuleRecord>) -> RuleSet {
        RuleSet::from_records(records).unwrap()
    }

    #[test]
    fn matching_helpers_follow_generalization() {
        let mut record = Record::new();
        record.set_value("Person0.Email0", Value::from("a")).unwrap();
        record.set_value("Person1.Email1", Value::from("b")).unwrap();
        assert_eq!(
            matching_keys("Person.Email", &record),
            vec!["Person0.Email0", "Person1.Email0", "Person1.Email1"]
        );
        let values = gather_matching_values("Person.Email", &record);
        assert_eq!(values, vec![&Value::from("a"), &Value::Null, &Value::from("b")]);
    }

    #[test]
    fn child_fields_are_deduplicated() {
        let validator = Validator::new(&rules(vec![
            RuleRecord::new("Person"),
            RuleRecord::new("Person.Email"),
            RuleRecord::new("Person.Email"),
            RuleRecord::new("Person.Phone"),
            RuleRecord::new("Person.Phone.Ext"),
        ]))
        .unwrap();
        assert_eq!(
            validator.child_fields("Person"),
            vec!["Email", "Phone"]
        );
    }

    #[test]
    fn options_default_to_strict() {
        let options = ValidateOptions::default();
        assert!(options.strict && options.missing_is_error);
        let lax = options.with_strict(false).with_missing_is_error(false);
        assert!(!lax.strict && !lax.missing_is_error);
    }

    #[test]
    fn configuration_errors_surface_before_validation() {
        let set = rules(vec![RuleRecord::new("Age").with_cardinality("x")]);
        assert!(validate(&Record::new(), &set, &ValidateOptions::default()).is_err());
    }
}
