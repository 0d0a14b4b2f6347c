//! The conditional-insert seam and its DynamoDB implementation.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use serde_json::Value;
use tracing::info;

use sparkwise_core::config::GatewayConfig;

use crate::error::GatewayError;
use crate::item::to_item;

/// Result of one conditional insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    Created,
    /// The unique key already exists downstream; the record was left as-is.
    AlreadyExists,
}

/// Seam between the write loop and the destination store, so the loop can
/// be exercised without AWS.
#[async_trait]
pub trait ConditionalPut {
    /// Insert `item` into `table` iff `key_field` is not already present.
    async fn put_if_absent(
        &self,
        table: &str,
        key_field: &str,
        item: &Value,
    ) -> Result<PutOutcome, GatewayError>;
}

/// DynamoDB-backed destination store.
pub struct DynamoStore {
    client: aws_sdk_dynamodb::Client,
}

impl DynamoStore {
    /// Build a store against the configured region, using the default AWS
    /// credential chain.
    pub async fn new(cfg: &GatewayConfig) -> Self {
        let region = aws_sdk_dynamodb::config::Region::new(cfg.region.clone());
        let aws_cfg = aws_config::defaults(BehaviorVersion::latest())
            .region(region)
            .load()
            .await;
        let client = aws_sdk_dynamodb::Client::new(&aws_cfg);

        info!(region = %cfg.region, "DynamoStore initialised");
        Self { client }
    }
}

#[async_trait]
impl ConditionalPut for DynamoStore {
    async fn put_if_absent(
        &self,
        table: &str,
        key_field: &str,
        item: &Value,
    ) -> Result<PutOutcome, GatewayError> {
        let result = self
            .client
            .put_item()
            .table_name(table)
            .set_item(Some(to_item(item)?))
            .condition_expression(format!("attribute_not_exists({key_field})"))
            .send()
            .await;

        match result {
            Ok(_) => Ok(PutOutcome::Created),
            Err(err) => {
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_conditional_check_failed_exception())
                {
                    Ok(PutOutcome::AlreadyExists)
                } else {
                    Err(GatewayError::Sdk(err.to_string()))
                }
            }
        }
    }
}
