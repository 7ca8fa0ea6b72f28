#![deny(unsafe_code)]

pub mod error;
pub mod rules;

pub use crate::error::{Result, StandardsError};
pub use crate::rules::{
    RuleRow, RulesFormat, build_rule_set, load_rule_set, parse_rules_csv, parse_rules_jsonl,
    read_rules_csv, read_rules_jsonl,
};
