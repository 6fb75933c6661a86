//! Ordered caller input for the fragment builders.
//!
//! Placeholder numbering follows key order, so every mapping here is an
//! explicit sequence of pairs. Deserializing from JSON keeps document order.

use crate::error::{JoblyError, JoblyResult};
use crate::value::SqlValue;
use serde::Deserialize;
use serde::de::{Deserializer, MapAccess, Visitor};
use std::fmt;

/// Logical field name → physical column name.
///
/// Keys missing from the map are used verbatim as column names.
///
/// ```ignore
/// static COMPANY_COLUMNS: FieldMap<'static> = FieldMap::new(&[
///     ("numEmployees", "num_employees"),
///     ("logoUrl", "logo_url"),
/// ]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FieldMap<'a> {
    entries: &'a [(&'a str, &'a str)],
}

impl<'a> FieldMap<'a> {
    pub const fn new(entries: &'a [(&'a str, &'a str)]) -> Self {
        Self { entries }
    }

    /// A map with no renames.
    pub const fn empty() -> Self {
        Self { entries: &[] }
    }

    /// Column for `key`, falling back to `key` itself.
    pub fn column_for<'k>(&self, key: &'k str) -> &'k str
    where
        'a: 'k,
    {
        self.entries
            .iter()
            .find(|(logical, _)| *logical == key)
            .map_or(key, |(_, column)| *column)
    }
}

/// Insertion-ordered `(key, value)` pairs with unique keys.
#[derive(Debug, Clone, Default, PartialEq)]
struct Entries(Vec<(String, SqlValue)>);

impl Entries {
    fn insert(&mut self, key: String, value: SqlValue) {
        // A repeated key keeps its first position and takes the latest value.
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    fn get(&self, key: &str) -> Option<&SqlValue> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    fn from_json(value: serde_json::Value) -> JoblyResult<Self> {
        let serde_json::Value::Object(map) = value else {
            return Err(JoblyError::validation("expected a JSON object"));
        };
        // Without serde_json's `preserve_order` the map is key-sorted; parse
        // from text via `Deserialize` when document order matters.
        let mut entries = Entries::default();
        for (key, value) in map {
            entries.insert(key, SqlValue::try_from(value)?);
        }
        Ok(entries)
    }
}

impl<K: Into<String>, V: Into<SqlValue>> FromIterator<(K, V)> for Entries {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut entries = Entries::default();
        for (k, v) in iter {
            entries.insert(k.into(), v.into());
        }
        entries
    }
}

struct EntriesVisitor;

impl<'de> Visitor<'de> for EntriesVisitor {
    type Value = Entries;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of field names to scalar values")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Entries, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = Entries(Vec::with_capacity(access.size_hint().unwrap_or(0)));
        while let Some((key, value)) = access.next_entry::<String, SqlValue>()? {
            entries.insert(key, value);
        }
        Ok(entries)
    }
}

impl<'de> Deserialize<'de> for Entries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(EntriesVisitor)
    }
}

macro_rules! ordered_input {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Entries);

        impl $name {
            pub fn new() -> Self {
                Self::default()
            }

            /// Add or replace `key` (chainable).
            pub fn set(mut self, key: impl Into<String>, value: impl Into<SqlValue>) -> Self {
                self.insert(key, value);
                self
            }

            /// Add or replace `key`; a replaced key keeps its original position.
            pub fn insert(&mut self, key: impl Into<String>, value: impl Into<SqlValue>) {
                self.0.insert(key.into(), value.into());
            }

            pub fn get(&self, key: &str) -> Option<&SqlValue> {
                self.0.get(key)
            }

            pub fn contains_key(&self, key: &str) -> bool {
                self.0.get(key).is_some()
            }

            pub fn len(&self) -> usize {
                self.0.0.len()
            }

            pub fn is_empty(&self) -> bool {
                self.0.0.is_empty()
            }

            /// Pairs in insertion order.
            pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
                self.0.0.iter().map(|(k, v)| (k.as_str(), v))
            }

            pub fn keys(&self) -> impl Iterator<Item = &str> {
                self.0.0.iter().map(|(k, _)| k.as_str())
            }

            /// Build from a decoded JSON object.
            pub fn from_json(value: serde_json::Value) -> JoblyResult<Self> {
                Entries::from_json(value).map(Self)
            }
        }

        impl<K: Into<String>, V: Into<SqlValue>> FromIterator<(K, V)> for $name {
            fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
                Self(iter.into_iter().collect())
            }
        }
    };
}

ordered_input!(
    /// Fields to change in a partial update, in placeholder order.
    ///
    /// Must hold at least one key when handed to the update builder.
    UpdatePayload
);

ordered_input!(
    /// Optional search filters for a resource.
    ///
    /// Keys must come from the resource's declared filter set; the builder
    /// walks the declared order, so the order here does not affect output.
    FilterCriteria
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_map_falls_back_to_key() {
        let fields = FieldMap::new(&[("firstName", "first_name")]);
        assert_eq!(fields.column_for("firstName"), "first_name");
        assert_eq!(fields.column_for("age"), "age");
        assert_eq!(FieldMap::empty().column_for("age"), "age");
    }

    #[test]
    fn payload_keeps_insertion_order() {
        let payload = UpdatePayload::new()
            .set("zeta", 1)
            .set("alpha", 2)
            .set("mid", 3);
        let keys: Vec<_> = payload.keys().collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn repeated_key_keeps_position_and_takes_latest_value() {
        let payload = UpdatePayload::new()
            .set("name", "old")
            .set("age", 3)
            .set("name", "new");
        assert_eq!(payload.len(), 2);
        let pairs: Vec<_> = payload.iter().collect();
        assert_eq!(pairs[0], ("name", &SqlValue::from("new")));
        assert_eq!(pairs[1], ("age", &SqlValue::Int(3)));
    }

    #[test]
    fn deserialize_keeps_document_order() {
        let payload: UpdatePayload =
            serde_json::from_str(r#"{"logoUrl": "http://x", "description": "d", "name": "n"}"#)
                .unwrap();
        let keys: Vec<_> = payload.keys().collect();
        assert_eq!(keys, ["logoUrl", "description", "name"]);
    }

    #[test]
    fn deserialize_rejects_nested_values() {
        let res: Result<FilterCriteria, _> = serde_json::from_str(r#"{"nameLike": ["a"]}"#);
        assert!(res.is_err());
    }

    #[test]
    fn from_json_requires_object() {
        assert!(FilterCriteria::from_json(serde_json::json!([1])).is_err());
        let criteria =
            FilterCriteria::from_json(serde_json::json!({"minEmployees": 2})).unwrap();
        assert_eq!(criteria.get("minEmployees"), Some(&SqlValue::Int(2)));
    }

    #[test]
    fn collects_from_pairs() {
        let criteria: FilterCriteria = [("title", "Engineer")].into_iter().collect();
        assert!(criteria.contains_key("title"));
        assert!(!criteria.is_empty());
    }
}
