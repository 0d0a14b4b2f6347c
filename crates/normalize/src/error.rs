use thiserror::Error;

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("merged birth payload has no `tags` list at the root")]
    MissingRootTags,

    #[error("invalid tag node: {0}")]
    InvalidNode(String),

    #[error("instance `{path}` carries no typeId")]
    MissingTypeId { path: String },

    #[error("instance `{path}` references unknown type `{type_id}`")]
    UnknownType { path: String, type_id: String },

    #[error("no placeholder model for folder depth {depth} (generated 0..{max})")]
    DepthExceeded { depth: usize, max: usize },

    #[error("metric `{metric}` on model `{model}` has no opcItemPath binding")]
    MissingBinding { model: String, metric: String },

    #[error("malformed source template `{template}`: {reason}")]
    MalformedTemplate { template: String, reason: String },

    #[error("parameter `{name}` missing while resolving `{template}`")]
    MissingParameter { name: String, template: String },

    #[error("model `{model}` has no registered template for property `{property}`")]
    MissingTemplate { model: String, property: String },

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
