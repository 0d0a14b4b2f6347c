//! Birth-message aggregation: deep-merge partial payloads into one tree,
//! then split it into the type registry and the asset-group roots.

use serde_json::{Map, Value};
use tracing::debug;

use crate::birth::{TagNode, TypeDefinition, TypeRegistry, UDT_TYPE};
use crate::error::NormalizeError;

/// Reserved member whose children carry the type registry.
pub const TYPES_SENTINEL: &str = "_types_";

/// Top-level members never treated as asset groups.
pub const TAG_BLACKLIST: &[&str] = &["Sim Controls"];

/// Accumulates an ordered sequence of partial payload trees. Later
/// payloads win wherever shapes collide.
#[derive(Debug)]
pub struct MessageAggregator {
    raw: Value,
}

impl MessageAggregator {
    pub fn new() -> Self {
        Self {
            raw: Value::Object(Map::new()),
        }
    }

    /// Fold one partial payload into the accumulator.
    pub fn merge(&mut self, payload: Value) {
        deep_merge(&mut self.raw, payload);
    }

    /// The unified tree merged so far.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn into_raw(self) -> Value {
        self.raw
    }

    /// Split the unified tree into the type registry and asset-group roots.
    ///
    /// A missing root `tags` list is a fatal shape error — the run cannot
    /// proceed without the member list.
    pub fn partition(&self) -> Result<BirthPartition, NormalizeError> {
        let members = self
            .raw
            .get("tags")
            .and_then(Value::as_array)
            .ok_or(NormalizeError::MissingRootTags)?;

        let mut registry = TypeRegistry::default();
        let mut roots = Vec::new();

        for member in members {
            let node: TagNode = serde_json::from_value(member.clone())
                .map_err(|e| NormalizeError::InvalidNode(e.to_string()))?;

            if TAG_BLACKLIST.contains(&node.name.as_str()) {
                debug!(name = %node.name, "skipping blacklisted tag");
                continue;
            }

            if node.name == TYPES_SENTINEL {
                for type_node in node.tags {
                    if type_node.tag_type.as_deref() == Some(UDT_TYPE) {
                        registry.insert(TypeDefinition {
                            name: type_node.name.clone(),
                            metrics: type_node.tags,
                        });
                    }
                }
            } else {
                roots.push(node);
            }
        }

        Ok(BirthPartition { registry, roots })
    }
}

impl Default for MessageAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// The two collections derived from the unified tree.
#[derive(Debug, Clone)]
pub struct BirthPartition {
    pub registry: TypeRegistry,
    pub roots: Vec<TagNode>,
}

/// Recursive merge: mappings merge per key, lists of named members merge
/// by `name`, everything else is replaced by the later value.
fn deep_merge(base: &mut Value, update: Value) {
    match (base, update) {
        (Value::Object(base_map), Value::Object(update_map)) => {
            for (key, value) in update_map {
                match base_map.get_mut(&key) {
                    Some(slot) => deep_merge(slot, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (Value::Array(base_list), Value::Array(update_list)) => {
            merge_member_lists(base_list, update_list);
        }
        (slot, value) => *slot = value,
    }
}

/// Merge two member lists element-wise by `name`: first-seen order is kept,
/// later same-named members deep-merge into earlier ones, and unseen names
/// append. Lists whose elements are not all named fall back to replacement,
/// keeping strict later-wins for plain value arrays.
fn merge_member_lists(base: &mut Vec<Value>, update: Vec<Value>) {
    let mergeable = base.iter().chain(update.iter()).all(|v| member_name(v).is_some());
    if !mergeable {
        *base = update;
        return;
    }

    for member in update {
        let position = member_name(&member)
            .map(str::to_string)
            .and_then(|name| base.iter().position(|b| member_name(b) == Some(name.as_str())));
        match position {
            Some(i) => deep_merge(&mut base[i], member),
            None => base.push(member),
        }
    }
}

fn member_name(value: &Value) -> Option<&str> {
    value.as_object()?.get("name")?.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn merged(payloads: &[Value]) -> MessageAggregator {
        let mut aggregator = MessageAggregator::new();
        for payload in payloads {
            aggregator.merge(payload.clone());
        }
        aggregator
    }

    #[test]
    fn nested_mappings_merge_recursively() {
        let aggregator = merged(&[
            json!({ "meta": { "site": "north", "rev": 1 } }),
            json!({ "meta": { "rev": 2 } }),
        ]);
        assert_eq!(
            aggregator.raw(),
            &json!({ "meta": { "site": "north", "rev": 2 } })
        );
    }

    #[test]
    fn scalars_last_write_wins() {
        let aggregator = merged(&[json!({ "seq": 1 }), json!({ "seq": 7 })]);
        assert_eq!(aggregator.raw()["seq"], 7);
    }

    #[test]
    fn named_lists_union_by_name() {
        let aggregator = merged(&[
            json!({ "tags": [{ "name": "_types_" }, { "name": "Line1", "rev": 1 }] }),
            json!({ "tags": [{ "name": "Line1", "rev": 2 }, { "name": "Line2" }] }),
        ]);
        let tags = aggregator.raw()["tags"].as_array().unwrap();
        assert_eq!(tags.len(), 3);
        assert_eq!(tags[0]["name"], "_types_");
        assert_eq!(tags[1]["name"], "Line1");
        assert_eq!(tags[1]["rev"], 2);
        assert_eq!(tags[2]["name"], "Line2");
    }

    #[test]
    fn redelivered_payload_is_a_noop() {
        let payload = json!({
            "tags": [{ "name": "Line1", "tags": [{ "name": "Pump1", "tagType": "UdtInstance" }] }]
        });
        let once = merged(&[payload.clone()]);
        let twice = merged(&[payload.clone(), payload]);
        assert_eq!(once.raw(), twice.raw());
    }

    #[test]
    fn unnamed_lists_are_replaced() {
        let aggregator = merged(&[json!({ "order": [1, 2] }), json!({ "order": [3] })]);
        assert_eq!(aggregator.raw()["order"], json!([3]));
    }

    #[test]
    fn partition_missing_root_tags_is_fatal() {
        let aggregator = merged(&[json!({ "metrics": [] })]);
        assert!(matches!(
            aggregator.partition(),
            Err(NormalizeError::MissingRootTags)
        ));
    }

    #[test]
    fn partition_splits_types_and_roots() {
        let aggregator = merged(&[json!({
            "tags": [
                {
                    "name": "_types_",
                    "tags": [
                        { "name": "PumpType", "tagType": "UdtType", "tags": [] },
                        { "name": "Notes", "tagType": "Folder" },
                    ]
                },
                { "name": "Sim Controls", "tags": [] },
                { "name": "Area1", "tags": [] },
            ]
        })]);

        let partition = aggregator.partition().unwrap();
        assert_eq!(partition.registry.type_names().collect::<Vec<_>>(), ["PumpType"]);
        assert_eq!(partition.roots.len(), 1);
        assert_eq!(partition.roots[0].name, "Area1");
    }

    #[test]
    fn types_split_across_payloads_reassemble() {
        let aggregator = merged(&[
            json!({ "tags": [{ "name": "_types_", "tags": [{ "name": "PumpType", "tagType": "UdtType" }] }] }),
            json!({ "tags": [{ "name": "Pump1", "tagType": "UdtInstance", "typeId": "PumpType" }] }),
        ]);
        let partition = aggregator.partition().unwrap();
        assert_eq!(partition.registry.len(), 1);
        assert_eq!(partition.roots.len(), 1);
        assert_eq!(partition.roots[0].name, "Pump1");
    }
}
