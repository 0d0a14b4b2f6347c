use serde::{Deserialize, Serialize};

use crate::datatype::PropertyDataType;

/// Parent name used for models at the top of the hierarchy.
pub const ROOT_MODEL: &str = "root";

/// Change marker stamped on every emitted record. No differential state is
/// computed; downstream treats the marker as "apply this record".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeFlag {
    Yes,
}

// ── Model records ─────────────────────────────────────────────

/// One normalized model definition, keyed by `assetModelName`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelRecord {
    pub asset_model_name: String,
    pub parent: String,
    pub asset_model_properties: Vec<ModelProperty>,
    /// Carried for the destination schema; the converter never populates it.
    pub asset_model_hierarchies: Vec<serde_json::Value>,
    pub change: ChangeFlag,
}

impl ModelRecord {
    pub fn new(name: impl Into<String>, parent: impl Into<String>) -> Self {
        Self {
            asset_model_name: name.into(),
            parent: parent.into(),
            asset_model_properties: Vec::new(),
            asset_model_hierarchies: Vec::new(),
            change: ChangeFlag::Yes,
        }
    }
}

/// One measurement property on a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelProperty {
    pub name: String,
    /// Absent when the declared source type is outside the catalog.
    pub data_type: Option<PropertyDataType>,
    #[serde(rename = "type")]
    pub kind: PropertyKind,
}

/// Property kind. Serializes as `{"measurement": {}}` — the only kind the
/// converter emits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyKind {
    Measurement(MeasurementSpec),
}

impl PropertyKind {
    pub fn measurement() -> Self {
        PropertyKind::Measurement(MeasurementSpec {})
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementSpec {}

// ── Asset records ─────────────────────────────────────────────

/// One normalized asset instance, keyed by `assetName` (its full path).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
    /// Full hierarchical path from the root asset group, `/`-joined.
    pub asset_name: String,
    pub model_name: String,
    /// Parent path; omitted for root asset groups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,
    pub tags: Vec<TagEntry>,
    pub change: ChangeFlag,
}

/// A resolved alias for one property of an asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagEntry {
    pub tag_name: String,
    pub tag_path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_record_shape() {
        let mut model = ModelRecord::new("PumpType_D0", ROOT_MODEL);
        model.asset_model_properties.push(ModelProperty {
            name: "Speed".into(),
            data_type: Some(PropertyDataType::Double),
            kind: PropertyKind::measurement(),
        });

        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(json["assetModelName"], "PumpType_D0");
        assert_eq!(json["parent"], "root");
        assert_eq!(json["change"], "YES");
        assert_eq!(json["assetModelHierarchies"], serde_json::json!([]));
        let prop = &json["assetModelProperties"][0];
        assert_eq!(prop["name"], "Speed");
        assert_eq!(prop["dataType"], "DOUBLE");
        assert_eq!(prop["type"], serde_json::json!({ "measurement": {} }));
    }

    #[test]
    fn unrecognized_data_type_serializes_null() {
        let prop = ModelProperty {
            name: "Odd".into(),
            data_type: None,
            kind: PropertyKind::measurement(),
        };
        let json = serde_json::to_value(&prop).unwrap();
        assert!(json["dataType"].is_null());
    }

    #[test]
    fn asset_record_omits_parent_at_root() {
        let root = AssetRecord {
            asset_name: "/Plant".into(),
            model_name: "__Group".into(),
            parent_name: None,
            tags: Vec::new(),
            change: ChangeFlag::Yes,
        };
        let json = serde_json::to_value(&root).unwrap();
        assert!(json.get("parentName").is_none());
        assert_eq!(json["assetName"], "/Plant");

        let child = AssetRecord {
            parent_name: Some("/Plant".into()),
            asset_name: "/Plant/Pump1".into(),
            ..root
        };
        let json = serde_json::to_value(&child).unwrap();
        assert_eq!(json["parentName"], "/Plant");
    }

    #[test]
    fn record_roundtrip() {
        let asset = AssetRecord {
            asset_name: "/Line/Pump1".into(),
            model_name: "PumpType_D1".into(),
            parent_name: Some("/Line".into()),
            tags: vec![TagEntry {
                tag_name: "Speed".into(),
                tag_path: "/Tag Providers/default/Pumps/P1/Speed".into(),
            }],
            change: ChangeFlag::Yes,
        };
        let json = serde_json::to_string(&asset).unwrap();
        let back: AssetRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, asset);
    }
}
