//! Persistence gateway: paced, conditional bulk loads into the destination
//! table store. Duplicate keys are skipped and logged; any other write
//! failure aborts the batch (already-written records stay written).

pub mod error;
pub mod item;
pub mod store;
pub mod writer;

pub use error::GatewayError;
pub use item::{to_attribute_value, to_item};
pub use store::{ConditionalPut, DynamoStore, PutOutcome};
pub use writer::{RecordWriter, TableHandle, WriteSummary};
