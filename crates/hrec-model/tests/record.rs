//! Tests for record addressing and mutation.

use hrec_model::{Address, Entry, Lookup, Record, RecordError, Segment, Value};
use proptest::prelude::*;

fn person_record() -> Record {
    let mut record = Record::new();
    record.set_value("Person0.Email0", Value::from("a@b.com")).unwrap();
    record.set_value("Person0.Phone0", Value::from("555-0100")).unwrap();
    record.set_value("Person1.Email0", Value::from("c@d.com")).unwrap();
    record
}

#[test]
fn set_then_get_round_trip() {
    let mut record = Record::new();
    record.set_value("Name0", Value::from("Alice")).unwrap();
    assert_eq!(record.get_value("Name0").unwrap(), &Value::from("Alice"));
    assert_eq!(record.get_field("Name").unwrap(), &[Value::from("Alice")]);
}

#[test]
fn nested_set_vivifies_parents() {
    let mut record = Record::new();
    record.set_value("Parent0.Child0", Value::from("X")).unwrap();
    assert_eq!(record.get_value("Parent0.Child0").unwrap(), &Value::from("X"));
    assert_eq!(record.get_field("Parent0.Child").unwrap(), &[Value::from("X")]);
    assert!(record.get_value("Parent0").unwrap().is_object());
}

#[test]
fn vivify_replaces_null_parents_with_mappings() {
    let mut record = Record::new();
    record.set_field("Parent", vec![Value::Null, Value::Null]).unwrap();
    record.set_value("Parent1.Child0", Value::from(7)).unwrap();
    assert_eq!(record.get_value("Parent0").unwrap(), &Value::Null);
    assert_eq!(record.get_value("Parent1.Child0").unwrap(), &Value::from(7));
}

#[test]
fn overwriting_existing_value() {
    let mut record = person_record();
    record
        .set_value("Person0.Email0", Value::from("z@y.com"))
        .unwrap();
    assert_eq!(
        record.get_value("Person0.Email0").unwrap(),
        &Value::from("z@y.com")
    );
    assert_eq!(record.get_field("Person0.Email").unwrap().len(), 1);
}

#[test]
fn get_missing_is_not_found() {
    let record = person_record();
    assert!(matches!(
        record.get_value("Person5.Email0"),
        Err(RecordError::NotFound { .. })
    ));
    assert!(matches!(
        record.get_value("Person0.Email3"),
        Err(RecordError::NotFound { .. })
    ));
    assert!(matches!(
        record.get_field("Person0.Fax"),
        Err(RecordError::NotFound { .. })
    ));
    assert!(matches!(
        record.get_field("Person0.Email0.Domain"),
        Err(RecordError::NotFound { .. })
    ));
}

#[test]
fn index_discipline_is_enforced() {
    let mut record = person_record();
    assert!(matches!(
        record.get_value("Person0.Email"),
        Err(RecordError::MalformedAddress { .. })
    ));
    assert!(matches!(
        record.get_field("Person0.Email0"),
        Err(RecordError::MalformedAddress { .. })
    ));
    assert!(matches!(
        record.set_field("Person.Email", vec![]),
        Err(RecordError::MalformedAddress { .. })
    ));
    assert!(matches!(
        record.value_exists("Person0.Email"),
        Err(RecordError::MalformedAddress { .. })
    ));
    assert!(matches!(
        record.field_exists("Person0.Email1"),
        Err(RecordError::MalformedAddress { .. })
    ));
}

#[test]
fn absence_is_not_failure() {
    let mut record = Record::new();
    assert!(!record.value_exists("Missing0").unwrap());
    assert!(!record.field_exists("Missing").unwrap());
    record.remove_value("Missing0").unwrap();
    record.remove_field("Missing").unwrap();
    assert!(record.is_empty());
}

#[test]
fn existence_checks() {
    let record = person_record();
    assert!(record.value_exists("Person0.Email0").unwrap());
    assert!(record.value_exists("Person1").unwrap());
    assert!(!record.value_exists("Person1.Phone0").unwrap());
    assert!(record.field_exists("Person0.Phone").unwrap());
    assert!(!record.field_exists("Person1.Phone").unwrap());
    assert!(!record.field_exists("Person2.Phone").unwrap());
    assert!(!record.value_exists("Person0.Email0.Domain0").unwrap());
}

#[test]
fn deserialization_checks_field_names() {
    let record: Record = serde_json::from_str(r#"{"Phone": ["x"]}"#).unwrap();
    assert_eq!(record.get_value("Phone0").unwrap(), &Value::from("x"));

    let err = serde_json::from_str::<Record>(r#"{"Phone2": ["x"]}"#).unwrap_err();
    assert!(err.to_string().contains("invalid field name \"Phone2\""), "{err}");
    assert!(serde_json::from_str::<Record>(r#"{"Person": [{"Email3": ["x"]}]}"#).is_err());
}

#[test]
fn serialization_is_the_bare_mapping() {
    let mut record = Record::new();
    record.set_value("Name0", Value::from("Alice")).unwrap();
    assert_eq!(
        serde_json::to_string(&record).unwrap(),
        r#"{"Name":["Alice"]}"#
    );
}

#[test]
fn add_to_field_appends() {
    let mut record = Record::new();
    record.add_to_field("Tag", Value::from("A"), true).unwrap();
    record.add_to_field("Tag", Value::from("B"), true).unwrap();
    assert_eq!(
        record.get_field("Tag").unwrap(),
        &[Value::from("A"), Value::from("B")]
    );
}

#[test]
fn add_to_missing_field_without_create_fails() {
    let mut record = Record::new();
    let err = record
        .add_to_field("Tag", Value::from("A"), false)
        .unwrap_err();
    assert_eq!(
        err,
        RecordError::FieldNotFound {
            address: "Tag".to_string()
        }
    );
    assert!(record.is_empty());
}

#[test]
fn remove_value_shifts_indices() {
    let mut record = Record::new();
    record
        .set_field("Tag", vec![Value::from("A"), Value::from("B"), Value::from("C")])
        .unwrap();
    record.remove_value("Tag1").unwrap();
    assert_eq!(
        record.get_field("Tag").unwrap(),
        &[Value::from("A"), Value::from("C")]
    );
    assert_eq!(record.get_value("Tag1").unwrap(), &Value::from("C"));
}

#[test]
fn remove_field_drops_all_instances() {
    let mut record = person_record();
    record.remove_field("Person0.Email").unwrap();
    assert!(!record.field_exists("Person0.Email").unwrap());
    assert!(record.field_exists("Person1.Email").unwrap());
}

#[test]
fn pre_split_segments_are_accepted() {
    let mut record = Record::new();
    let segments = vec![
        Segment::indexed("Parent", 0).unwrap(),
        Segment::indexed("Child", 0).unwrap(),
    ];
    record.set_value(segments.clone(), Value::from(true)).unwrap();
    assert_eq!(
        record.get_value(segments.as_slice()).unwrap(),
        &Value::from(true)
    );
    let bad = vec![Segment {
        name: "a.b".to_string(),
        index: Some(0),
    }];
    assert!(matches!(
        record.get_value(bad),
        Err(RecordError::InvalidFieldName { .. })
    ));
}

#[test]
fn field_names_ending_in_digits_are_rejected() {
    let mut data = hrec_model::Fields::new();
    data.insert("Phone2".to_string(), vec![Value::from("x")]);
    assert!(matches!(
        Record::from_data(data),
        Err(RecordError::InvalidFieldName { .. })
    ));
}

#[test]
fn key_shape_dispatch() {
    let mut record = Record::new();
    record
        .set("Tag", Entry::Field(vec![Value::from("A")]))
        .unwrap();
    record.set("Tag1", Entry::Value(Value::from("B"))).unwrap();
    assert_eq!(
        record.get("Tag1").unwrap(),
        Lookup::Value(&Value::from("B"))
    );
    assert_eq!(
        record.get("Tag").unwrap(),
        Lookup::Field(&[Value::from("A"), Value::from("B")])
    );
    assert!(matches!(
        record.set("Tag", Entry::Value(Value::from("C"))),
        Err(RecordError::InvalidArgument(_))
    ));
    record.remove("Tag0").unwrap();
    assert_eq!(record.get_field("Tag").unwrap(), &[Value::from("B")]);
    record.remove("Tag").unwrap();
    assert!(record.is_empty());
}

#[test]
fn records_compare_by_content() {
    assert_eq!(person_record(), person_record());
    let mut other = person_record();
    other.add_to_field("Person1.Email", Value::from("e@f.com"), true).unwrap();
    assert_ne!(person_record(), other);
}

fn field_name() -> impl Strategy<Value = String> {
    "[A-Za-z_][A-Za-z0-9_]{0,8}[A-Za-z_]"
}

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Integer),
        "[ -~]{0,12}".prop_map(Value::String),
    ]
}

proptest! {
    #[test]
    fn set_get_round_trip(name in field_name(), value in leaf()) {
        let mut record = Record::new();
        let address = format!("{name}0");
        record.set_value(address.as_str(), value.clone()).unwrap();
        prop_assert_eq!(record.get_value(address.as_str()).unwrap(), &value);
        prop_assert_eq!(record.get_field(name.as_str()).unwrap(), &[value][..]);
    }

    #[test]
    fn parse_display_round_trip(names in prop::collection::vec(field_name(), 1..4), index in 0usize..50) {
        let dotted = names
            .iter()
            .map(|name| format!("{name}{index}"))
            .collect::<Vec<_>>()
            .join(".");
        let address = Address::parse(&dotted).unwrap();
        prop_assert_eq!(address.len(), names.len());
        prop_assert_eq!(address.to_string(), dotted);
    }
}
