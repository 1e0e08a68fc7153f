use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::context::TaskContext;
use crate::error::{FlowAiError, Result};

/// The user function an operator decorates. It receives the task argument
/// (the mapped element, or `Null`) and the task context.
pub type TaskCallable = Arc<dyn Fn(&Value, &TaskContext) -> Result<Value> + Send + Sync>;

pub fn callable<F>(function: F) -> TaskCallable
where
    F: Fn(&Value, &TaskContext) -> Result<Value> + Send + Sync + 'static,
{
    Arc::new(function)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorKind {
    Task,
    Agent,
    Llm,
    LlmBranch,
    Embed,
    Dedup,
}

impl OperatorKind {
    pub fn decorator_name(&self) -> &'static str {
        match self {
            OperatorKind::Task => "@task",
            OperatorKind::Agent => "@task.agent",
            OperatorKind::Llm => "@task.llm",
            OperatorKind::LlmBranch => "@task.llm_branch",
            OperatorKind::Embed => "@task.embed",
            OperatorKind::Dedup => "@task.dedup",
        }
    }
}

#[async_trait]
pub trait Operator: Send + Sync {
    fn task_id(&self) -> &str;

    fn kind(&self) -> OperatorKind;

    /// Runs the task with a context already scoped to it.
    async fn execute(&self, ctx: &TaskContext) -> Result<Value>;

    /// Scopes `ctx` to this task, executes it with `arg` and publishes the
    /// output as this task's XCom value.
    async fn run(&self, ctx: &TaskContext, arg: Value) -> Result<Value> {
        let task_ctx = ctx.for_task(self.task_id()).with_arg(arg);
        let output = self.execute(&task_ctx).await?;
        ctx.xcom_push(self.task_id(), output.clone());
        Ok(output)
    }
}

/// Turns a callable's return value into prompt text: strings verbatim,
/// anything else as JSON.
pub fn prompt_text(value: Value) -> Result<String> {
    match value {
        Value::String(text) => Ok(text),
        Value::Null => Err(FlowAiError::InvalidInput(
            "callable returned no prompt".to_string(),
        )),
        other => Ok(serde_json::to_string(&other)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prompt_text_serializes_structured_values() {
        assert_eq!(prompt_text(json!("hi")).unwrap(), "hi");
        assert_eq!(prompt_text(json!({"a": 1})).unwrap(), r#"{"a":1}"#);
        assert!(prompt_text(Value::Null).is_err());
    }

    #[test]
    fn decorator_names() {
        assert_eq!(OperatorKind::LlmBranch.decorator_name(), "@task.llm_branch");
        assert_eq!(OperatorKind::Embed.decorator_name(), "@task.embed");
    }
}
