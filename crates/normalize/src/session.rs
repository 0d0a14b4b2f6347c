//! Per-invocation normalization state and the public entry point.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, info};

use sparkwise_core::config::NormalizeConfig;
use sparkwise_core::{
    is_unsupported, map_data_type, AssetRecord, ModelProperty, ModelRecord, PropertyKind,
};

use crate::aggregate::MessageAggregator;
use crate::birth::{TagNode, TypeRegistry};
use crate::error::NormalizeError;
use crate::placeholder::generate_placeholder_models;
use crate::template::SourceTemplate;

/// Everything one normalization pass produces: the two record sets bound
/// for the persistence gateway, plus the intermediates kept for debug
/// snapshots. Discarded after the invocation.
#[derive(Debug)]
pub struct NormalizeOutcome {
    pub raw_tree: Value,
    pub type_registry: TypeRegistry,
    pub asset_roots: Vec<TagNode>,
    pub models: Vec<ModelRecord>,
    pub assets: Vec<AssetRecord>,
}

/// Normalize an ordered batch of raw birth payloads.
///
/// Runs the full pass: aggregate, partition, seed placeholder models, walk
/// every asset-group root. Pure with respect to its inputs — re-running on
/// the same batch yields structurally identical output.
pub fn normalize(
    payloads: &[Value],
    cfg: &NormalizeConfig,
) -> Result<NormalizeOutcome, NormalizeError> {
    let mut aggregator = MessageAggregator::new();
    for payload in payloads {
        aggregator.merge(payload.clone());
    }

    let partition = aggregator.partition()?;
    info!(
        types = partition.registry.len(),
        roots = partition.roots.len(),
        "partitioned birth payloads"
    );

    let mut session = NormalizeSession::new(cfg, partition.registry.clone());
    session.seed_placeholder_models();
    for root in &partition.roots {
        session.walk_tree(root)?;
    }

    info!(
        models = session.models.len(),
        assets = session.assets.len(),
        "normalization pass complete"
    );

    Ok(NormalizeOutcome {
        raw_tree: aggregator.into_raw(),
        type_registry: partition.registry,
        asset_roots: partition.roots,
        models: session.models.into_values().collect(),
        assets: session.assets.into_values().collect(),
    })
}

/// Owns all mutable state of one pass: the model cache, the per-model
/// property templates, the depth-to-placeholder map, and the asset map.
/// Nothing here outlives the invocation.
pub struct NormalizeSession<'cfg> {
    pub(crate) cfg: &'cfg NormalizeConfig,
    pub(crate) registry: TypeRegistry,
    /// Model cache keyed by model name, in creation order.
    pub(crate) models: IndexMap<String, ModelRecord>,
    /// Unresolved source-path templates per model, per property.
    pub(crate) templates: HashMap<String, IndexMap<String, SourceTemplate>>,
    /// Placeholder model name per folder depth.
    pub(crate) depth_models: Vec<String>,
    /// Emitted asset records keyed by full path, in emission order.
    pub(crate) assets: IndexMap<String, AssetRecord>,
}

impl<'cfg> NormalizeSession<'cfg> {
    pub fn new(cfg: &'cfg NormalizeConfig, registry: TypeRegistry) -> Self {
        Self {
            cfg,
            registry,
            models: IndexMap::new(),
            templates: HashMap::new(),
            depth_models: Vec::new(),
            assets: IndexMap::new(),
        }
    }

    /// Seed the model cache with the generic folder models, one per depth
    /// up to the configured bound.
    pub fn seed_placeholder_models(&mut self) {
        for model in generate_placeholder_models(self.cfg.hierarchy_max_depth) {
            let name = model.asset_model_name.clone();
            self.depth_models.push(name.clone());
            self.templates.insert(name.clone(), IndexMap::new());
            self.models.insert(name, model);
        }
    }

    /// Build and register a model from a metric list.
    ///
    /// Metrics without a declared data type, and metrics whose declared
    /// type is in the unsupported set, are dropped. Declared types outside
    /// the catalog become properties with no data type. Each surviving
    /// metric's source-path binding is parsed once and recorded in the
    /// property-template map.
    pub(crate) fn build_model(
        &mut self,
        name: &str,
        metrics: &[TagNode],
        parent: &str,
    ) -> Result<(), NormalizeError> {
        let mut record = ModelRecord::new(name, parent);
        let mut templates = IndexMap::new();

        for metric in metrics {
            let Some(declared) = metric.data_type.as_deref() else {
                continue;
            };
            if is_unsupported(declared) {
                debug!(model = name, metric = %metric.name, declared, "dropping unsupported metric");
                continue;
            }

            let binding = metric
                .opc_item_path
                .as_ref()
                .map(|p| p.binding.as_str())
                .ok_or_else(|| NormalizeError::MissingBinding {
                    model: name.to_string(),
                    metric: metric.name.clone(),
                })?;
            templates.insert(metric.name.clone(), SourceTemplate::parse(binding)?);

            record.asset_model_properties.push(ModelProperty {
                name: metric.name.clone(),
                data_type: map_data_type(declared),
                kind: PropertyKind::measurement(),
            });
        }

        debug!(
            model = name,
            properties = record.asset_model_properties.len(),
            "built model"
        );
        self.templates.insert(name.to_string(), templates);
        self.models.insert(name.to_string(), record);
        Ok(())
    }
}
