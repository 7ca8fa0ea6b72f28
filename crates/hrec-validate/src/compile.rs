//! Interpretation of the six string attributes of a rule.
//!
//! | Attribute         | Empty means   | Otherwise                                   |
//! |-------------------|---------------|---------------------------------------------|
//! | Value Type        | any kind      | `string`, `object`, `integer`, `boolean`, `float` |
//! | Obligation        | optional      | `r` marks the field required                |
//! | Cardinality       | unbounded     | `n` (unbounded) or an exact instance count  |
//! | Validation        | no pattern    | regular expression, matched in full         |
//! | Children Required | no check      | minimum number of child fields present      |
//!
//! Tokens are trimmed and compared case-insensitively.

use std::fmt;

use regex::Regex;

use hrec_model::{Rule, RuleId, SEPARATOR, Value, ValueKind, validate_field_name};

use crate::error::{ConfigurationError, Result};

/// Kind a rule requires of every matching value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    String,
    Object,
    Integer,
    Boolean,
    Float,
}

impl ValueType {
    /// Parse a Value Type token; empty means no constraint.
    pub fn parse(token: &str) -> Option<Option<Self>> {
        match token.trim().to_lowercase().as_str() {
            "" => Some(None),
            "string" => Some(Some(Self::String)),
            "object" => Some(Some(Self::Object)),
            "integer" => Some(Some(Self::Integer)),
            "boolean" => Some(Some(Self::Boolean)),
            "float" => Some(Some(Self::Float)),
            _ => None,
        }
    }

    pub fn kind(self) -> ValueKind {
        match self {
            Self::String => ValueKind::String,
            Self::Object => ValueKind::Object,
            Self::Integer => ValueKind::Integer,
            Self::Boolean => ValueKind::Boolean,
            Self::Float => ValueKind::Float,
        }
    }

    /// Exact kind match. Null satisfies no declared type.
    pub fn accepts(self, value: &Value) -> bool {
        value.kind() == self.kind()
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind().as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Obligation {
    Required,
    #[default]
    Optional,
}

impl Obligation {
    pub fn parse(token: &str) -> Self {
        if token.trim().eq_ignore_ascii_case("r") {
            Self::Required
        } else {
            Self::Optional
        }
    }

    pub fn is_required(self) -> bool {
        self == Self::Required
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cardinality {
    #[default]
    Unbounded,
    Exactly(usize),
}

impl Cardinality {
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        if token.is_empty() || token.eq_ignore_ascii_case("n") {
            return Some(Self::Unbounded);
        }
        token.parse().ok().map(Self::Exactly)
    }
}

/// A compiled validation pattern, kept with its source text.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    pub fn new(source: &str) -> std::result::Result<Self, regex::Error> {
        let regex = Regex::new(&format!("^(?:{source})$"))?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whole-string match against the value's string form.
    pub fn matches(&self, value: &Value) -> bool {
        self.regex.is_match(&value.string_form())
    }
}

/// A rule with its attributes interpreted.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub id: RuleId,
    pub field_name: String,
    pub value_type: Option<ValueType>,
    pub obligation: Obligation,
    pub cardinality: Cardinality,
    pub validation: Option<Pattern>,
    pub children_required: Option<usize>,
}

impl CompiledRule {
    pub fn compile(rule: &Rule) -> Result<Self> {
        let field = rule.field_name.trim();
        for name in field.split(SEPARATOR) {
            validate_field_name(name).map_err(|err| ConfigurationError::InvalidFieldName {
                field: field.to_string(),
                reason: err.to_string(),
            })?;
        }

        let value_type = ValueType::parse(&rule.value_type).ok_or_else(|| {
            ConfigurationError::UnknownValueType {
                field: field.to_string(),
                token: rule.value_type.trim().to_string(),
            }
        })?;

        let cardinality = Cardinality::parse(&rule.cardinality).ok_or_else(|| {
            ConfigurationError::NotAnInteger {
                field: field.to_string(),
                attribute: "Cardinality",
                value: rule.cardinality.clone(),
            }
        })?;

        let children = rule.children_required.trim();
        let children_required = if children.is_empty() {
            None
        } else {
            Some(
                children
                    .parse()
                    .map_err(|_| ConfigurationError::NotAnInteger {
                        field: field.to_string(),
                        attribute: "Children Required",
                        value: rule.children_required.clone(),
                    })?,
            )
        };

        let validation = if rule.validation.is_empty() {
            None
        } else {
            Some(Pattern::new(&rule.validation).map_err(|err| {
                ConfigurationError::InvalidPattern {
                    field: field.to_string(),
                    message: err.to_string(),
                }
            })?)
        };

        Ok(Self {
            id: rule.id,
            field_name: field.to_string(),
            value_type,
            obligation: Obligation::parse(&rule.obligation),
            cardinality,
            validation,
            children_required,
        })
    }

    pub fn is_nested(&self) -> bool {
        self.field_name.contains(SEPARATOR)
    }
}
