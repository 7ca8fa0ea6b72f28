#![deny(unsafe_code)]

pub mod address;
pub mod error;
pub mod record;
pub mod rule;
pub mod value;

pub use address::{Address, IntoAddress, SEPARATOR, Segment, validate_field_name};
pub use error::{RecordError, Result};
pub use record::{Entry, Lookup, Record};
pub use rule::{RULE_COLUMNS, Rule, RuleId, RuleRecord, RuleSet};
pub use value::{Fields, Value, ValueKind};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_set_assigns_ids_and_keeps_order() {
        let mut rules = RuleSet::new();
        let first = rules.add(RuleRecord::new("Name")).expect("add Name");
        let second = rules.add(RuleRecord::new("Person")).expect("add Person");
        assert_ne!(first, second);
        let names: Vec<&str> = rules.iter().map(|r| r.field_name.as_str()).collect();
        assert_eq!(names, vec!["Name", "Person"]);

        let removed = rules.remove(first).expect("remove Name");
        assert_eq!(removed.field_name, "Name");
        assert_eq!(rules.len(), 1);
        assert!(rules.get(first).is_none());
        assert!(rules.remove(first).is_none());
    }

    #[test]
    fn rule_set_rejects_missing_attributes() {
        let mut rules = RuleSet::new();
        let record = RuleRecord {
            validation: None,
            ..RuleRecord::new("Name")
        };
        let err = rules.add(record).unwrap_err();
        assert_eq!(
            err,
            RecordError::MissingAttribute {
                attribute: "Validation"
            }
        );
        assert!(rules.is_empty());
    }

    #[test]
    fn rule_record_deserializes_from_columns() {
        let record: RuleRecord = serde_json::from_str(
            r#"{"Field Name": "Person.Email", "Value Type": "string", "Obligation": "r",
                "Cardinality": "n", "Validation": "", "Children Required": ""}"#,
        )
        .expect("deserialize rule");
        assert_eq!(record.attribute("Field Name"), Some("Person.Email"));
        assert_eq!(record.attribute("Cardinality"), Some("n"));
        assert_eq!(record.attribute("Unknown"), None);
    }
}
