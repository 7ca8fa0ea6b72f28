//! Validation rule records and the ordered rule set that stores them.
//!
//! Rules are kept exactly as declared (six string attributes). Interpreting
//! them is the validator's job; this module only checks that every
//! attribute is present and hands out identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{RecordError, Result};

/// Column names of a rule row, in declaration order.
pub const RULE_COLUMNS: [&str; 6] = [
    "Field Name",
    "Value Type",
    "Obligation",
    "Cardinality",
    "Validation",
    "Children Required",
];

/// Identifier assigned to a rule when it joins a [`RuleSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RuleId(Uuid);

impl RuleId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RuleId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A rule row as read from a rule file. Attributes may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleRecord {
    #[serde(rename = "Field Name")]
    pub field_name: Option<String>,
    #[serde(rename = "Value Type")]
    pub value_type: Option<String>,
    #[serde(rename = "Obligation")]
    pub obligation: Option<String>,
    #[serde(rename = "Cardinality")]
    pub cardinality: Option<String>,
    #[serde(rename = "Validation")]
    pub validation: Option<String>,
    #[serde(rename = "Children Required")]
    pub children_required: Option<String>,
}

impl RuleRecord {
    /// A rule for `field_name` with every other attribute present but empty.
    pub fn new(field_name: impl Into<String>) -> Self {
        Self {
            field_name: Some(field_name.into()),
            value_type: Some(String::new()),
            obligation: Some(String::new()),
            cardinality: Some(String::new()),
            validation: Some(String::new()),
            children_required: Some(String::new()),
        }
    }

    #[must_use]
    pub fn with_value_type(mut self, value: impl Into<String>) -> Self {
        self.value_type = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_obligation(mut self, value: impl Into<String>) -> Self {
        self.obligation = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_cardinality(mut self, value: impl Into<String>) -> Self {
        self.cardinality = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_validation(mut self, value: impl Into<String>) -> Self {
        self.validation = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_children_required(mut self, value: impl Into<String>) -> Self {
        self.children_required = Some(value.into());
        self
    }

    /// Look up an attribute by its column name.
    pub fn attribute(&self, column: &str) -> Option<&str> {
        let value = match column {
            "Field Name" => &self.field_name,
            "Value Type" => &self.value_type,
            "Obligation" => &self.obligation,
            "Cardinality" => &self.cardinality,
            "Validation" => &self.validation,
            "Children Required" => &self.children_required,
            _ => return None,
        };
        value.as_deref()
    }
}

/// A rule admitted to a [`RuleSet`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub id: RuleId,
    #[serde(rename = "Field Name")]
    pub field_name: String,
    #[serde(rename = "Value Type")]
    pub value_type: String,
    #[serde(rename = "Obligation")]
    pub obligation: String,
    #[serde(rename = "Cardinality")]
    pub cardinality: String,
    #[serde(rename = "Validation")]
    pub validation: String,
    #[serde(rename = "Children Required")]
    pub children_required: String,
}

impl TryFrom<RuleRecord> for Rule {
    type Error = RecordError;

    fn try_from(record: RuleRecord) -> Result<Self> {
        fn require(value: Option<String>, attribute: &'static str) -> Result<String> {
            value.ok_or(RecordError::MissingAttribute { attribute })
        }

        Ok(Self {
            id: RuleId::new(),
            field_name: require(record.field_name, RULE_COLUMNS[0])?,
            value_type: require(record.value_type, RULE_COLUMNS[1])?,
            obligation: require(record.obligation, RULE_COLUMNS[2])?,
            cardinality: require(record.cardinality, RULE_COLUMNS[3])?,
            validation: require(record.validation, RULE_COLUMNS[4])?,
            children_required: require(record.children_required, RULE_COLUMNS[5])?,
        })
    }
}

/// Ordered collection of rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a rule row, assigning it a fresh identifier.
    pub fn add(&mut self, record: RuleRecord) -> Result<RuleId> {
        let rule = Rule::try_from(record)?;
        let id = rule.id;
        self.rules.push(rule);
        Ok(id)
    }

    /// Build a rule set from rows, failing on the first incomplete one.
    pub fn from_records<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = RuleRecord>,
    {
        let mut set = Self::new();
        for record in records {
            set.add(record)?;
        }
        Ok(set)
    }

    /// Remove a rule by identifier.
    pub fn remove(&mut self, id: RuleId) -> Option<Rule> {
        let position = self.rules.iter().position(|rule| rule.id == id)?;
        Some(self.rules.remove(position))
    }

    pub fn get(&self, id: RuleId) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.id == id)
    }

    /// Rules in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
