//! Paced conditional-write loop over one record batch.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::error::GatewayError;
use crate::store::{ConditionalPut, PutOutcome};

/// A destination table plus the unique key field guarding its inserts.
#[derive(Debug, Clone)]
pub struct TableHandle {
    pub name: String,
    pub key_field: &'static str,
}

impl TableHandle {
    /// The model table, keyed by model name.
    pub fn models(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key_field: "assetModelName",
        }
    }

    /// The asset table, keyed by asset path.
    pub fn assets(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key_field: "assetName",
        }
    }
}

/// Outcome counts for one batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WriteSummary {
    pub created: usize,
    pub skipped: usize,
}

pub struct RecordWriter<S> {
    store: S,
    /// Delay between successive writes, to respect downstream rate limits.
    pace: Duration,
}

impl<S: ConditionalPut> RecordWriter<S> {
    pub fn new(store: S, pace: Duration) -> Self {
        Self { store, pace }
    }

    /// Write each record in order: duplicates are skipped and logged, any
    /// other failure propagates and aborts the batch. Records already
    /// written are not rolled back.
    pub async fn create_records<T: Serialize>(
        &self,
        table: &TableHandle,
        records: &[T],
    ) -> Result<WriteSummary, GatewayError> {
        let mut summary = WriteSummary::default();

        for record in records {
            let item = serde_json::to_value(record)?;
            match self
                .store
                .put_if_absent(&table.name, table.key_field, &item)
                .await?
            {
                PutOutcome::Created => {
                    summary.created += 1;
                    tokio::time::sleep(self.pace).await;
                }
                PutOutcome::AlreadyExists => {
                    summary.skipped += 1;
                    info!(
                        table = %table.name,
                        key = %item
                            .get(table.key_field)
                            .and_then(|v| v.as_str())
                            .unwrap_or("?"),
                        "ignoring existing record"
                    );
                }
            }
        }

        info!(
            table = %table.name,
            created = summary.created,
            skipped = summary.skipped,
            "record batch written"
        );
        Ok(summary)
    }
}
