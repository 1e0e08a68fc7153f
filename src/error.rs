use thiserror::Error;

use crate::schema::SchemaError;

pub type Result<T> = std::result::Result<T, FlowAiError>;

#[derive(Debug, Error)]
pub enum FlowAiError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid threshold: {0}")]
    InvalidThreshold(String),
    #[error("{0}")]
    TypeMismatch(String),
    #[error("task skipped: {0}")]
    Skipped(String),
    #[error("branch `{branch}` is not a downstream task of `{task_id}`")]
    InvalidBranch { task_id: String, branch: String },
    #[error("structured output rejected: {0}")]
    StructuredOutput(String),
    #[error("tool `{0}` not registered")]
    ToolNotRegistered(String),
    #[error("maximum tool rounds {0} exceeded")]
    MaxToolRounds(usize),
    #[error("provider error: {0}")]
    Provider(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("config error: {0}")]
    Config(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FlowAiError {
    pub fn is_skip(&self) -> bool {
        matches!(self, FlowAiError::Skipped(_))
    }
}

impl From<serde_json::Error> for FlowAiError {
    fn from(error: serde_json::Error) -> Self {
        FlowAiError::Serialization(error.to_string())
    }
}

impl From<SchemaError> for FlowAiError {
    fn from(error: SchemaError) -> Self {
        match error {
            SchemaError::Validation { message, path } if !path.is_empty() => {
                FlowAiError::StructuredOutput(format!("{} at `{}`", message, path.join(".")))
            }
            SchemaError::Validation { message, .. } => FlowAiError::StructuredOutput(message),
            other => FlowAiError::Config(other.to_string()),
        }
    }
}
