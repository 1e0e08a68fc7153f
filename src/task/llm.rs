use async_trait::async_trait;
use serde_json::Value;

use super::agent::AgentTask;
use super::context::TaskContext;
use super::operator::{Operator, OperatorKind, TaskCallable};
use crate::agent::{Agent, OutputType};
use crate::error::{FlowAiError, Result};
use crate::llm::DynLlmClient;
use crate::schema::Schema;

/// Single LLM call: an [`AgentTask`] whose agent has no tools.
pub struct LlmTask {
    inner: AgentTask,
}

impl LlmTask {
    pub fn builder(task_id: impl Into<String>, model: DynLlmClient) -> LlmTaskBuilder {
        LlmTaskBuilder {
            task_id: task_id.into(),
            model,
            system_prompt: String::new(),
            output: OutputType::Text,
            temperature: None,
            callable: None,
        }
    }

    pub fn agent(&self) -> &Agent {
        self.inner.agent()
    }
}

pub struct LlmTaskBuilder {
    task_id: String,
    model: DynLlmClient,
    system_prompt: String,
    output: OutputType,
    temperature: Option<f32>,
    callable: Option<TaskCallable>,
}

impl LlmTaskBuilder {
    pub fn system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    /// Declares the structured output the model must return.
    pub fn output_schema(mut self, schema: Schema) -> Self {
        self.output = OutputType::Structured(schema);
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn callable(mut self, callable: TaskCallable) -> Self {
        self.callable = Some(callable);
        self
    }

    pub fn build(self) -> Result<LlmTask> {
        let callable = self.callable.ok_or_else(|| {
            FlowAiError::Config(format!("llm task `{}` has no callable", self.task_id))
        })?;
        let mut agent = Agent::builder(self.model)
            .system_prompt(self.system_prompt)
            .output_type(self.output);
        if let Some(temperature) = self.temperature {
            agent = agent.temperature(temperature);
        }
        let inner = AgentTask::new(self.task_id, agent.build()?, callable)?
            .with_kind(OperatorKind::Llm);
        Ok(LlmTask { inner })
    }
}

#[async_trait]
impl Operator for LlmTask {
    fn task_id(&self) -> &str {
        self.inner.task_id()
    }

    fn kind(&self) -> OperatorKind {
        OperatorKind::Llm
    }

    async fn execute(&self, ctx: &TaskContext) -> Result<Value> {
        self.inner.execute(ctx).await
    }
}
