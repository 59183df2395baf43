//! Value-shape validators, one per props type.
//!
//! Validators never fail: a value of the wrong shape yields `false` and the
//! caller decides what to do with it (block submission, report a defect).

use serde_json::Value;

use crate::types::PropsType;

/// Check that a runtime value has the shape `props_type` stores.
pub fn is_valid_value(props_type: PropsType, value: &Value) -> bool {
    match props_type {
        PropsType::Boolean => value.is_boolean(),
        PropsType::Multiselect | PropsType::TextList => is_string_list(value),
        PropsType::ObjectiveWithInput => value
            .as_object()
            .is_some_and(|record| record.contains_key("value")),
        PropsType::Select | PropsType::Text => value.is_string(),
        PropsType::Variants => value.is_object() || value.is_string(),
    }
}

fn is_string_list(value: &Value) -> bool {
    value
        .as_array()
        .is_some_and(|items| items.iter().all(Value::is_string))
}
