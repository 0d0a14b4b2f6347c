//! Birth-message normalization engine.
//!
//! Aggregates partial birth payloads into one tag tree, extracts the type
//! registry, seeds depth-indexed placeholder models, and walks the asset
//! trees into flat, path-qualified model/asset record sets. Synchronous,
//! per-invocation state only; persistence lives in `sparkwise-gateway`.

pub mod aggregate;
pub mod birth;
pub mod error;
pub mod placeholder;
pub mod session;
pub mod snapshot;
pub mod template;

mod walker;

pub use aggregate::{BirthPartition, MessageAggregator};
pub use birth::{NodeKind, TagNode, TypeDefinition, TypeRegistry};
pub use error::NormalizeError;
pub use session::{normalize, NormalizeOutcome, NormalizeSession};
pub use snapshot::SnapshotWriter;
pub use template::SourceTemplate;
