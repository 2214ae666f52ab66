//! Field data model shared by extraction, selection and writing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Sentinel recorded by the widget traversal for fields that carry no value.
pub const NOT_AVAILABLE: &str = "N/A";

/// Field name to current value. `None` marks an absent value and serializes
/// as JSON `null`.
pub type FieldValues = BTreeMap<String, Option<String>>;

/// Ordered list of canonical field names eligible for transfer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowList {
    #[serde(default)]
    pub fields_to_copy: Vec<String>,
}

impl AllowList {
    /// Create an allow-list from canonical names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields_to_copy: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.fields_to_copy.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields_to_copy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields_to_copy.is_empty()
    }
}

/// Coerce an extracted value into the string written to a destination field.
///
/// Absence becomes `""` so the destination field is always writable; every
/// string, including `"N/A"`, is written as is.
pub fn coerce_value(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

/// Turn [`NOT_AVAILABLE`] markers left by the widget traversal back into
/// absent values.
///
/// Only applies to values produced by widget extraction, where the sentinel
/// stands for a field that was never filled.
pub fn clear_not_available(values: &mut FieldValues) {
    for value in values.values_mut() {
        if value.as_deref() == Some(NOT_AVAILABLE) {
            *value = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_value() {
        assert_eq!(coerce_value(None), "");
        assert_eq!(coerce_value(Some("")), "");
        assert_eq!(coerce_value(Some("Alice")), "Alice");
    }

    #[test]
    fn test_literal_not_available_is_kept_by_coercion() {
        assert_eq!(coerce_value(Some(NOT_AVAILABLE)), "N/A");
    }

    #[test]
    fn test_clear_not_available() {
        let mut values = FieldValues::new();
        values.insert("Notes".to_string(), Some(NOT_AVAILABLE.to_string()));
        values.insert("Name".to_string(), Some("Alice".to_string()));
        values.insert("Field".to_string(), None);

        clear_not_available(&mut values);

        assert_eq!(values.get("Notes"), Some(&None));
        assert_eq!(values.get("Name"), Some(&Some("Alice".to_string())));
        assert_eq!(values.get("Field"), Some(&None));
    }

    #[test]
    fn test_allow_list_missing_key_is_empty() {
        let list: AllowList = serde_json::from_str(r#"{"other": 1}"#).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn test_allow_list_keeps_order() {
        let list: AllowList =
            serde_json::from_str(r#"{"fields_to_copy": ["Zeta", "Alpha", "Mid"]}"#).unwrap();
        assert_eq!(list.iter().collect::<Vec<_>>(), vec!["Zeta", "Alpha", "Mid"]);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_null_values_round_trip() {
        let mut values = FieldValues::new();
        values.insert("Field]".to_string(), None);
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"{"Field]":null}"#);
    }
}
