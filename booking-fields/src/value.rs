//! Typed views over runtime field values.
//!
//! Field values travel as `serde_json::Value` between the host and the
//! registry. The helpers here give shape to the composite ones: the
//! radioInput record and the two forms of a name.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::NameVariant;

/// Value of a radioInput field: the chosen option plus its dependent input.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectiveValue {
    pub value: String,
    #[serde(default)]
    pub option_value: String,
}

impl ObjectiveValue {
    pub fn new(value: impl Into<String>, option_value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            option_value: option_value.into(),
        }
    }

    /// Read the record leniently; missing or non-string members become empty.
    pub fn from_value(value: &Value) -> Self {
        let member = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        Self {
            value: member("value"),
            option_value: member("optionValue"),
        }
    }

    pub fn to_value(&self) -> Value {
        let mut record = Map::new();
        record.insert("value".into(), Value::String(self.value.clone()));
        record.insert("optionValue".into(), Value::String(self.option_value.clone()));
        Value::Object(record)
    }
}

/// Shape a name value for the given variant.
///
/// `fullName` wants a string: records are joined as `firstName lastName`.
/// `firstAndLastName` wants a record: strings holding JSON are parsed, other
/// strings are split at the first space into `firstName` and `lastName`.
/// Values of any other shape pass through untouched so the caller can reject
/// them.
pub fn preprocess_name_value(variant: NameVariant, value: &Value) -> Value {
    match variant {
        NameVariant::FullName => full_name(value),
        NameVariant::FirstAndLastName => first_and_last_name(value),
    }
}

fn full_name(value: &Value) -> Value {
    match value {
        Value::Null | Value::Bool(false) => Value::String(String::new()),
        Value::String(_) => value.clone(),
        Value::Object(record) => {
            let part = |key: &str| record.get(key).and_then(Value::as_str).unwrap_or_default();
            let mut name = part("firstName").to_string();
            let last = part("lastName");
            if !last.is_empty() {
                name.push(' ');
                name.push_str(last);
            }
            Value::String(name)
        }
        other => other.clone(),
    }
}

fn first_and_last_name(value: &Value) -> Value {
    match value {
        Value::Null => split_full_name(""),
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(parsed) => parsed,
            Err(_) => split_full_name(text),
        },
        other => other.clone(),
    }
}

fn split_full_name(text: &str) -> Value {
    let mut parts = text.split(' ').map(str::trim);
    let first = parts.next().unwrap_or_default();
    let rest: Vec<&str> = parts.collect();

    let mut record = Map::new();
    record.insert("firstName".into(), Value::String(first.to_string()));
    record.insert("lastName".into(), Value::String(rest.join(" ")));
    Value::Object(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn objective_value_round_trips_through_json() {
        let value = ObjectiveValue::new("phone", "+4412345");
        assert_eq!(
            value.to_value(),
            json!({"value": "phone", "optionValue": "+4412345"})
        );
        assert_eq!(ObjectiveValue::from_value(&value.to_value()), value);
    }

    #[test]
    fn objective_value_reads_partial_record() {
        let value = ObjectiveValue::from_value(&json!({"value": "link"}));
        assert_eq!(value, ObjectiveValue::new("link", ""));
        assert_eq!(ObjectiveValue::from_value(&Value::Null), ObjectiveValue::default());
    }

    #[test]
    fn full_name_keeps_strings() {
        let v = preprocess_name_value(NameVariant::FullName, &json!("Jane Doe"));
        assert_eq!(v, json!("Jane Doe"));
    }

    #[test]
    fn full_name_joins_record() {
        let v = preprocess_name_value(
            NameVariant::FullName,
            &json!({"firstName": "Jane", "lastName": "Doe"}),
        );
        assert_eq!(v, json!("Jane Doe"));

        let v = preprocess_name_value(NameVariant::FullName, &json!({"firstName": "Jane"}));
        assert_eq!(v, json!("Jane"));
    }

    #[test]
    fn full_name_of_unset_is_empty() {
        assert_eq!(preprocess_name_value(NameVariant::FullName, &Value::Null), json!(""));
    }

    #[test]
    fn full_name_passes_through_other_shapes() {
        assert_eq!(preprocess_name_value(NameVariant::FullName, &json!(42)), json!(42));
    }

    #[test]
    fn split_name_from_plain_string() {
        let v = preprocess_name_value(NameVariant::FirstAndLastName, &json!("John Johny Janardan"));
        assert_eq!(v, json!({"firstName": "John", "lastName": "Johny Janardan"}));
    }

    #[test]
    fn split_name_from_json_string() {
        let v = preprocess_name_value(
            NameVariant::FirstAndLastName,
            &json!(r#"{"firstName": "John", "lastName": "Doe"}"#),
        );
        assert_eq!(v, json!({"firstName": "John", "lastName": "Doe"}));
    }

    #[test]
    fn split_name_of_unset_is_empty_record() {
        let v = preprocess_name_value(NameVariant::FirstAndLastName, &Value::Null);
        assert_eq!(v, json!({"firstName": "", "lastName": ""}));
    }

    #[test]
    fn split_name_keeps_records() {
        let record = json!({"first": "Jane", "last": "Doe"});
        assert_eq!(
            preprocess_name_value(NameVariant::FirstAndLastName, &record),
            record
        );
    }

    #[test]
    fn split_name_json_scalar_is_not_a_record() {
        let v = preprocess_name_value(NameVariant::FirstAndLastName, &json!("42"));
        assert_eq!(v, json!(42));
    }
}
