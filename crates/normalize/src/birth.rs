//! Typed view of the unified birth-message tag tree.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Discriminant marking a node as a typed unit instance.
pub const UDT_INSTANCE: &str = "UdtInstance";

/// Discriminant marking a member of the types container as a type definition.
pub const UDT_TYPE: &str = "UdtType";

/// One node of the tag tree. Only the fields the normalizer reads are
/// modeled; anything else in the payload passes through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opc_item_path: Option<OpcItemPath>,
    /// Per-instance substitutions for the type's templated source paths.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<IndexMap<String, serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<TagNode>,
}

impl TagNode {
    /// Classify a node: typed unit instance, or plain folder structure.
    pub fn kind(&self) -> NodeKind {
        match self.tag_type.as_deref() {
            Some(UDT_INSTANCE) => NodeKind::Instance,
            _ => NodeKind::Folder,
        }
    }
}

/// Live data-source binding of a metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpcItemPath {
    pub binding: String,
}

/// The two node states the asset walk distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Instance,
    Folder,
}

/// A named, reusable template of metrics that instances reference by id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeDefinition {
    pub name: String,
    pub metrics: Vec<TagNode>,
}

/// Mapping from type name to definition, in discovery order.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TypeRegistry {
    types: IndexMap<String, TypeDefinition>,
}

impl TypeRegistry {
    pub fn insert(&mut self, definition: TypeDefinition) {
        self.types.insert(definition.name.clone(), definition);
    }

    pub fn get(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.get(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }
}
