use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("not configured: {0}")]
    NotConfigured(String),

    #[error("record is not a JSON object: {0}")]
    NotAnItem(String),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("AWS SDK error: {0}")]
    Sdk(String),
}
