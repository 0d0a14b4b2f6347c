//! Depth-indexed placeholder models hosting structural (non-typed) nodes.

use sparkwise_core::{ModelRecord, ROOT_MODEL};

/// Placeholder model name for a folder depth.
pub fn placeholder_name(depth: usize) -> String {
    match depth {
        0 => "__Group".to_string(),
        1 => "__Node".to_string(),
        _ => format!("__DeviceLevel{}", depth - 1),
    }
}

/// Mint one propertyless folder model per depth in `0..max_depth`, chained
/// so each depth's parent is the previous depth's model (depth 0 hangs off
/// the implicit root).
pub fn generate_placeholder_models(max_depth: usize) -> Vec<ModelRecord> {
    let mut models = Vec::with_capacity(max_depth);
    let mut parent = ROOT_MODEL.to_string();
    for depth in 0..max_depth {
        let name = placeholder_name(depth);
        models.push(ModelRecord::new(name.clone(), parent));
        parent = name;
    }
    models
}
