use serde::{Deserialize, Serialize};

/// Property data types supported by the destination modeling store.
///
/// `DateTime` source metrics land as `Integer` because timestamps are
/// persisted downstream as epoch values, not strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyDataType {
    Integer,
    Double,
    Boolean,
    String,
}

impl std::fmt::Display for PropertyDataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyDataType::Integer => write!(f, "INTEGER"),
            PropertyDataType::Double => write!(f, "DOUBLE"),
            PropertyDataType::Boolean => write!(f, "BOOLEAN"),
            PropertyDataType::String => write!(f, "STRING"),
        }
    }
}

/// Map a declared source data type through the fixed catalog.
///
/// Returns `None` for declared types outside the catalog — such metrics
/// still become properties, just without a resolved data type.
pub fn map_data_type(declared: &str) -> Option<PropertyDataType> {
    match declared {
        "Int4" | "Int8" | "Int16" | "Int32" | "Int64" => Some(PropertyDataType::Integer),
        "Float4" | "Double" => Some(PropertyDataType::Double),
        "Boolean" => Some(PropertyDataType::Boolean),
        "String" => Some(PropertyDataType::String),
        "DateTime" => Some(PropertyDataType::Integer),
        _ => None,
    }
}

/// Declared types the normalizer drops outright (composite/template types
/// have no scalar representation downstream).
pub const UNSUPPORTED_DATA_TYPES: &[&str] = &["Template"];

pub fn is_unsupported(declared: &str) -> bool {
    UNSUPPORTED_DATA_TYPES.contains(&declared)
}
