use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaLoadError {
    #[error("failed to parse descriptor set JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("schema unit `{0}` is not part of the descriptor set")]
    UnknownUnit(String),
}
