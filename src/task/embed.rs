use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use super::context::TaskContext;
use super::operator::{Operator, OperatorKind, TaskCallable};
use crate::embed::{DynEmbeddingProvider, EncodeOptions};
use crate::error::{FlowAiError, Result};
use crate::log_error;
use crate::utils::validation::ConfigValidator;

/// Embeds the text returned by the callable. The output is the vector as a
/// JSON array of numbers.
pub struct EmbedTask {
    task_id: String,
    provider: DynEmbeddingProvider,
    options: EncodeOptions,
    callable: TaskCallable,
}

impl EmbedTask {
    pub fn new(
        task_id: impl Into<String>,
        provider: DynEmbeddingProvider,
        callable: TaskCallable,
    ) -> Result<Self> {
        let task_id = task_id.into();
        ConfigValidator::validate_task_id(&task_id)?;
        Ok(Self {
            task_id,
            provider,
            options: EncodeOptions::default(),
            callable,
        })
    }

    pub fn with_options(mut self, options: EncodeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }
}

#[async_trait]
impl Operator for EmbedTask {
    fn task_id(&self) -> &str {
        &self.task_id
    }

    fn kind(&self) -> OperatorKind {
        OperatorKind::Embed
    }

    async fn execute(&self, ctx: &TaskContext) -> Result<Value> {
        info!(
            task_id = %self.task_id,
            model = %self.provider.model(),
            map_index = ?ctx.map_index(),
            "executing embedding"
        );

        let text = match (self.callable)(ctx.arg(), ctx)? {
            Value::String(text) => text,
            _ => {
                return Err(FlowAiError::TypeMismatch(
                    "Attribute text must be of type str".to_string(),
                ))
            }
        };
        debug!(task_id = %self.task_id, text = %text, "text ready");

        let vector = match self.provider.embed_one(&text, &self.options).await {
            Ok(vector) => vector,
            Err(err) => {
                log_error!(err, task_id = self.task_id.as_str());
                return Err(err);
            }
        };
        Ok(serde_json::to_value(vector)?)
    }
}
