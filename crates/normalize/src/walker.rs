//! The recursive asset-tree walk, driven iteratively over a work stack.

use tracing::debug;

use sparkwise_core::{AssetRecord, ChangeFlag, ModelProperty, TagEntry, ROOT_MODEL};

use crate::birth::{NodeKind, TagNode};
use crate::error::NormalizeError;
use crate::session::NormalizeSession;

struct WorkItem<'t> {
    node: &'t TagNode,
    depth: usize,
    parent_path: String,
}

impl NormalizeSession<'_> {
    /// Walk one asset-group root, emitting a path-qualified record per node.
    ///
    /// Depth-first pre-order over an explicit work stack, so adversarially
    /// deep trees cannot exhaust the call stack. Children are pushed in
    /// reverse to keep emission in input list order.
    pub fn walk_tree(&mut self, root: &TagNode) -> Result<(), NormalizeError> {
        let mut stack = vec![WorkItem {
            node: root,
            depth: 0,
            parent_path: String::new(),
        }];

        while let Some(WorkItem {
            node,
            depth,
            parent_path,
        }) = stack.pop()
        {
            let path = format!("{parent_path}/{}", node.name);
            debug!(path = %path, depth, "visiting node");

            let kind = node.kind();
            let model_name = self.resolve_model(node, kind, depth, &path)?;
            let record = self.build_asset(&path, node, &model_name, &parent_path)?;
            // Last write wins on a duplicate path; paths are expected
            // unique by construction.
            self.assets.insert(path.clone(), record);

            if kind == NodeKind::Folder {
                for child in node.tags.iter().rev() {
                    stack.push(WorkItem {
                        node: child,
                        depth: depth + 1,
                        parent_path: path.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Resolve the model backing a node, building derived models lazily.
    ///
    /// An instance's derived model is `<typeId>_D<depth>`, built once from
    /// the registry definition and cached; a folder takes the placeholder
    /// model for its depth.
    fn resolve_model(
        &mut self,
        node: &TagNode,
        kind: NodeKind,
        depth: usize,
        path: &str,
    ) -> Result<String, NormalizeError> {
        match kind {
            NodeKind::Instance => {
                let type_id =
                    node.type_id
                        .as_deref()
                        .ok_or_else(|| NormalizeError::MissingTypeId {
                            path: path.to_string(),
                        })?;
                let derived = format!("{type_id}_D{depth}");

                if !self.models.contains_key(&derived) {
                    let metrics = self
                        .registry
                        .get(type_id)
                        .ok_or_else(|| NormalizeError::UnknownType {
                            path: path.to_string(),
                            type_id: type_id.to_string(),
                        })?
                        .metrics
                        .clone();
                    self.build_model(&derived, &metrics, ROOT_MODEL)?;
                }

                Ok(derived)
            }
            NodeKind::Folder => {
                self.depth_models
                    .get(depth)
                    .cloned()
                    .ok_or(NormalizeError::DepthExceeded {
                        depth,
                        max: self.cfg.hierarchy_max_depth,
                    })
            }
        }
    }

    /// Flatten one node into its asset record, resolving tag aliases when
    /// the model carries properties and the node carries parameters.
    fn build_asset(
        &self,
        path: &str,
        node: &TagNode,
        model_name: &str,
        parent_path: &str,
    ) -> Result<AssetRecord, NormalizeError> {
        // resolve_model registered the model before we get here.
        let properties: &[ModelProperty] = self
            .models
            .get(model_name)
            .map_or(&[], |m| m.asset_model_properties.as_slice());

        let mut tags = Vec::new();
        if !properties.is_empty() {
            if let Some(parameters) = &node.parameters {
                let templates = self.templates.get(model_name);
                for property in properties {
                    let template = templates.and_then(|t| t.get(&property.name)).ok_or_else(
                        || NormalizeError::MissingTemplate {
                            model: model_name.to_string(),
                            property: property.name.clone(),
                        },
                    )?;
                    let tag_path = template.render(parameters, &self.cfg.tag_alias_prefix)?;
                    tags.push(TagEntry {
                        tag_name: property.name.clone(),
                        tag_path,
                    });
                }
            }
        }

        Ok(AssetRecord {
            asset_name: path.to_string(),
            model_name: model_name.to_string(),
            parent_name: (!parent_path.is_empty()).then(|| parent_path.to_string()),
            tags,
            change: ChangeFlag::Yes,
        })
    }
}
