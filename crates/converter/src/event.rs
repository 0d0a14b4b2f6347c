use serde::Deserialize;
use serde_json::Value;

/// One invocation event: an ordered batch of raw birth payload trees.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertEvent {
    pub birth_data: Vec<Value>,
}
