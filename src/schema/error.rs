use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("schema `{0}` not registered")]
    NotRegistered(String),
    #[error("schema validation failed: {message}")]
    Validation { message: String, path: Vec<String> },
}
