//! The addressable record tree.
//!
//! A [`Record`] wraps a root [`Fields`] mapping. Every operation takes a path
//! in dotted key syntax (or pre-split segments, see [`IntoAddress`]) and
//! enforces the indexing discipline of the operation:
//!
//! - value operations (`get_value`, `set_value`, `remove_value`,
//!   `value_exists`) need an index on every segment;
//! - field operations (`get_field`, `set_field`, `add_to_field`,
//!   `remove_field`, `field_exists`) need an index on every segment except
//!   the last, which must not have one.
//!
//! Writes create missing intermediate structure ("vivification"). The path is
//! checked before anything is created, so a failed write leaves the record
//! untouched.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::address::{Address, IntoAddress, Segment, validate_field_name};
use crate::error::{RecordError, Result};
use crate::value::{Fields, Value};

/// Result of a key-shape dispatched lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
    Value(&'a Value),
    Field(&'a [Value]),
}

/// Payload of a key-shape dispatched write.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Value(Value),
    Field(Vec<Value>),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Fields", into = "Fields")]
pub struct Record {
    data: Fields,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing mapping, checking every field name in the tree.
    pub fn from_data(data: Fields) -> Result<Self> {
        check_field_names(&data)?;
        Ok(Self { data })
    }

    pub fn data(&self) -> &Fields {
        &self.data
    }

    pub fn into_data(self) -> Fields {
        self.data
    }

    /// Replace the root mapping.
    pub fn set_data(&mut self, data: Fields) -> Result<()> {
        check_field_names(&data)?;
        self.data = data;
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Top-level field names.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    pub fn get_value(&self, address: impl IntoAddress) -> Result<&Value> {
        let address = address.into_address()?;
        address.require_all_indexed()?;
        self.find_value(&address)
            .ok_or_else(|| RecordError::not_found(&address))
    }

    pub fn set_value(&mut self, address: impl IntoAddress, value: Value) -> Result<()> {
        let address = address.into_address()?;
        address.require_all_indexed()?;
        let index = address.last().index.unwrap_or_default();
        let instances = self.vivify(&address)?;
        match instances.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(RecordError::not_found(&address)),
        }
    }

    pub fn get_field(&self, address: impl IntoAddress) -> Result<&[Value]> {
        let address = address.into_address()?;
        address.require_only_inner_indexed()?;
        self.find_field(&address)
            .ok_or_else(|| RecordError::not_found(&address))
    }

    /// Replace a field's instances wholesale, creating the field if needed.
    pub fn set_field(&mut self, address: impl IntoAddress, instances: Vec<Value>) -> Result<()> {
        let address = address.into_address()?;
        address.require_only_inner_indexed()?;
        let field = self.vivify(&address)?;
        *field = instances;
        Ok(())
    }

    /// Append an instance to a field.
    ///
    /// A missing field is created holding `value` at index 0 when
    /// `create_if_missing` is set, otherwise [`RecordError::FieldNotFound`]
    /// is returned.
    pub fn add_to_field(
        &mut self,
        address: impl IntoAddress,
        value: Value,
        create_if_missing: bool,
    ) -> Result<()> {
        let address = address.into_address()?;
        address.require_only_inner_indexed()?;
        if let Some(instances) = self.find_field_mut(&address) {
            instances.push(value);
            return Ok(());
        }
        if !create_if_missing {
            return Err(RecordError::FieldNotFound {
                address: address.to_string(),
            });
        }
        self.set_value(address.with_last_index(Some(0)), value)
    }

    /// Remove one instance; later instances shift down by one. Missing
    /// targets are ignored.
    pub fn remove_value(&mut self, address: impl IntoAddress) -> Result<()> {
        let address = address.into_address()?;
        address.require_all_indexed()?;
        let (last, inner) = address.split_last();
        let Some(index) = last.index else {
            return Ok(());
        };
        if let Some(instances) = self
            .container_mut(inner)
            .and_then(|fields| fields.get_mut(&last.name))
            && index < instances.len()
        {
            instances.remove(index);
            trace!(address = %address, "removed value");
        }
        Ok(())
    }

    /// Remove a whole field. Missing targets are ignored.
    pub fn remove_field(&mut self, address: impl IntoAddress) -> Result<()> {
        let address = address.into_address()?;
        address.require_only_inner_indexed()?;
        let (last, inner) = address.split_last();
        if let Some(fields) = self.container_mut(inner)
            && fields.remove(&last.name).is_some()
        {
            trace!(address = %address, "removed field");
        }
        Ok(())
    }

    /// Whether a value exists at `address`. Only malformed addresses fail.
    pub fn value_exists(&self, address: impl IntoAddress) -> Result<bool> {
        let address = address.into_address()?;
        address.require_all_indexed()?;
        Ok(self.find_value(&address).is_some())
    }

    /// Whether a field exists at `address`. Only malformed addresses fail.
    pub fn field_exists(&self, address: impl IntoAddress) -> Result<bool> {
        let address = address.into_address()?;
        address.require_only_inner_indexed()?;
        Ok(self.find_field(&address).is_some())
    }

    /// Every address in the tree, depth first, instances in index order.
    pub fn keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        walk(&self.data, None, &mut |path, _| keys.push(path.to_string()));
        keys
    }

    /// Addresses and values of every non-mapping instance.
    pub fn leaves(&self) -> Vec<(String, &Value)> {
        let mut leaves = Vec::new();
        walk(&self.data, None, &mut |path, value| {
            if !value.is_object() {
                leaves.push((path.to_string(), value));
            }
        });
        leaves
    }

    /// Every instance, in the same order as [`Record::keys`].
    pub fn values(&self) -> Vec<&Value> {
        let mut values = Vec::new();
        walk(&self.data, None, &mut |_, value| values.push(value));
        values
    }

    /// Every instance paired with its address.
    pub fn entries(&self) -> Vec<(String, &Value)> {
        let mut entries = Vec::new();
        walk(&self.data, None, &mut |path, value| {
            entries.push((path.to_string(), value));
        });
        entries
    }

    /// Look up a value if the key ends in a digit, otherwise a field.
    pub fn get(&self, key: &str) -> Result<Lookup<'_>> {
        if ends_with_index(key) {
            self.get_value(key).map(Lookup::Value)
        } else {
            self.get_field(key).map(Lookup::Field)
        }
    }

    /// Set a value if the key ends in a digit, otherwise a field.
    pub fn set(&mut self, key: &str, entry: Entry) -> Result<()> {
        match (ends_with_index(key), entry) {
            (true, Entry::Value(value)) => self.set_value(key, value),
            (false, Entry::Field(instances)) => self.set_field(key, instances),
            (true, Entry::Field(_)) => Err(RecordError::InvalidArgument(format!(
                "{key} addresses a single value, not a field"
            ))),
            (false, Entry::Value(_)) => Err(RecordError::InvalidArgument(
                "fields can only be set to a list of instances".to_string(),
            )),
        }
    }

    /// Remove a value if the key ends in a digit, otherwise a field.
    pub fn remove(&mut self, key: &str) -> Result<()> {
        if ends_with_index(key) {
            self.remove_value(key)
        } else {
            self.remove_field(key)
        }
    }

    fn container(&self, inner: &[Segment]) -> Option<&Fields> {
        let mut fields = &self.data;
        for segment in inner {
            fields = instance(fields, segment)?.as_object()?;
        }
        Some(fields)
    }

    fn container_mut(&mut self, inner: &[Segment]) -> Option<&mut Fields> {
        let mut fields = &mut self.data;
        for segment in inner {
            let index = segment.index?;
            fields = fields
                .get_mut(&segment.name)?
                .get_mut(index)?
                .as_object_mut()?;
        }
        Some(fields)
    }

    fn find_value(&self, address: &Address) -> Option<&Value> {
        let (last, inner) = address.split_last();
        instance(self.container(inner)?, last)
    }

    fn find_field(&self, address: &Address) -> Option<&[Value]> {
        let (last, inner) = address.split_last();
        self.container(inner)?
            .get(&last.name)
            .map(Vec::as_slice)
    }

    fn find_field_mut(&mut self, address: &Address) -> Option<&mut Vec<Value>> {
        let (last, inner) = address.split_last();
        self.container_mut(inner)?.get_mut(&last.name)
    }

    /// Create whatever is missing along `address` and return the instance
    /// list of its final field.
    ///
    /// Absent fields start as `[null]`, instance lists are padded with nulls
    /// up to the requested index and null instances on the way down become
    /// empty mappings. Existing leaves on the path are never overwritten; the
    /// whole path is checked for them before anything is created.
    fn vivify(&mut self, address: &Address) -> Result<&mut Vec<Value>> {
        let (last, inner) = address.split_last();
        self.check_descent(address, inner)?;

        let mut fields = &mut self.data;
        for segment in inner {
            let index = segment.index.unwrap_or_default();
            let instances = fields.entry(segment.name.clone()).or_insert_with(|| {
                trace!(field = %segment.name, "creating field");
                vec![Value::Null]
            });
            pad(instances, index);
            let slot = instances
                .get_mut(index)
                .ok_or_else(|| RecordError::not_found(address))?;
            if slot.is_null() {
                *slot = Value::object();
            }
            fields = slot
                .as_object_mut()
                .ok_or_else(|| RecordError::not_found(address))?;
        }

        let instances = fields.entry(last.name.clone()).or_insert_with(|| {
            trace!(field = %last.name, "creating field");
            vec![Value::Null]
        });
        if let Some(index) = last.index {
            pad(instances, index);
        }
        Ok(instances)
    }

    /// Fail if an existing non-null leaf sits where vivification would need
    /// to descend.
    fn check_descent(&self, address: &Address, inner: &[Segment]) -> Result<()> {
        let mut fields = &self.data;
        for segment in inner {
            let Some(value) = instance(fields, segment) else {
                return Ok(());
            };
            match value {
                Value::Object(next) => fields = next,
                Value::Null => return Ok(()),
                _ => {
                    return Err(RecordError::NotFound {
                        address: format!("{address} (cannot descend through leaf {segment})"),
                    });
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut serializer).map_err(|_| fmt::Error)?;
        f.write_str(&String::from_utf8_lossy(&out))
    }
}

impl TryFrom<Fields> for Record {
    type Error = RecordError;

    fn try_from(data: Fields) -> Result<Self> {
        Self::from_data(data)
    }
}

impl From<Record> for Fields {
    fn from(record: Record) -> Self {
        record.data
    }
}

fn instance<'a>(fields: &'a Fields, segment: &Segment) -> Option<&'a Value> {
    fields.get(&segment.name)?.get(segment.index?)
}

fn pad(instances: &mut Vec<Value>, index: usize) {
    if instances.len() <= index {
        instances.resize(index + 1, Value::Null);
    }
}

fn ends_with_index(key: &str) -> bool {
    key.ends_with(|c: char| c.is_ascii_digit())
}

fn walk<'a>(fields: &'a Fields, prefix: Option<&str>, visit: &mut dyn FnMut(&str, &'a Value)) {
    for (name, instances) in fields {
        for (index, value) in instances.iter().enumerate() {
            let path = match prefix {
                Some(prefix) => format!("{prefix}.{name}{index}"),
                None => format!("{name}{index}"),
            };
            visit(&path, value);
            if let Value::Object(children) = value {
                walk(children, Some(&path), visit);
            }
        }
    }
}

fn check_field_names(fields: &Fields) -> Result<()> {
    for (name, instances) in fields {
        validate_field_name(name)?;
        for value in instances {
            if let Value::Object(children) = value {
                check_field_names(children)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Record {
        let mut record = Record::new();
        record.set_value("Name0", Value::from("Alice")).unwrap();
        record.set_value("Person0.Email0", Value::from("a@b.com")).unwrap();
        record.set_value("Person0.Email1", Value::from("c@d.com")).unwrap();
        record
    }

    #[test]
    fn keys_are_depth_first() {
        let record = sample();
        assert_eq!(
            record.keys(),
            vec!["Name0", "Person0", "Person0.Email0", "Person0.Email1"]
        );
    }

    #[test]
    fn leaves_skip_mappings() {
        let record = sample();
        let leaves: Vec<String> = record.leaves().into_iter().map(|(k, _)| k).collect();
        assert_eq!(leaves, vec!["Name0", "Person0.Email0", "Person0.Email1"]);
    }

    #[test]
    fn values_follow_key_order() {
        let record = sample();
        let values = record.values();
        assert_eq!(values.len(), record.keys().len());
        assert_eq!(values[0], &Value::from("Alice"));
        assert!(values[1].is_object());
    }

    #[test]
    fn vivify_pads_with_nulls() {
        let mut record = Record::new();
        record.set_value("Tag2", Value::from("c")).unwrap();
        assert_eq!(
            record.get_field("Tag").unwrap(),
            &[Value::Null, Value::Null, Value::from("c")]
        );
    }

    #[test]
    fn write_through_leaf_leaves_record_untouched() {
        let mut record = sample();
        let before = record.clone();
        let err = record
            .set_value("Name0.Nick0.Short0", Value::from("Al"))
            .unwrap_err();
        assert!(matches!(err, RecordError::NotFound { .. }));
        assert_eq!(record, before);
    }

    #[test]
    fn display_is_indented_json() {
        let mut record = Record::new();
        record.set_value("A0", Value::from(1)).unwrap();
        assert_eq!(record.to_string(), "{\n    \"A\": [\n        1\n    ]\n}");
    }
}
