//! Conversion from serialized records to destination item maps.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use serde_json::Value;

use crate::error::GatewayError;

/// Convert a serialized record into a destination item map.
///
/// The top level must be a JSON object; nested values map onto the native
/// attribute kinds (S/N/BOOL/NULL/L/M).
pub fn to_item(record: &Value) -> Result<HashMap<String, AttributeValue>, GatewayError> {
    let object = record
        .as_object()
        .ok_or_else(|| GatewayError::NotAnItem(record.to_string()))?;
    Ok(object
        .iter()
        .map(|(key, value)| (key.clone(), to_attribute_value(value)))
        .collect())
}

pub fn to_attribute_value(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(items) => AttributeValue::L(items.iter().map(to_attribute_value).collect()),
        Value::Object(map) => AttributeValue::M(
            map.iter()
                .map(|(key, value)| (key.clone(), to_attribute_value(value)))
                .collect(),
        ),
    }
}
