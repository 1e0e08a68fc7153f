use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use super::context::TaskContext;
use super::operator::{prompt_text, Operator, OperatorKind, TaskCallable};
use crate::agent::Agent;
use crate::error::Result;
use crate::log_error;
use crate::utils::validation::ConfigValidator;

/// Runs the callable to build a prompt and hands it to an [`Agent`].
pub struct AgentTask {
    task_id: String,
    agent: Agent,
    callable: TaskCallable,
    kind: OperatorKind,
}

impl AgentTask {
    pub fn new(task_id: impl Into<String>, agent: Agent, callable: TaskCallable) -> Result<Self> {
        let task_id = task_id.into();
        ConfigValidator::validate_task_id(&task_id)?;
        Ok(Self {
            task_id,
            agent,
            callable,
            kind: OperatorKind::Agent,
        })
    }

    pub(crate) fn with_kind(mut self, kind: OperatorKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    /// Runs the agent and returns its raw text as well as the parsed output.
    pub(crate) async fn call_agent(&self, ctx: &TaskContext) -> Result<crate::agent::AgentRunResult> {
        info!(task_id = %self.task_id, map_index = ?ctx.map_index(), "executing agent call");

        let prompt = prompt_text((self.callable)(ctx.arg(), ctx)?)?;
        debug!(task_id = %self.task_id, prompt = %prompt, "prompt ready");

        match self.agent.run(&prompt).await {
            Ok(result) => {
                info!(
                    task_id = %self.task_id,
                    tool_calls = result.tool_calls,
                    result = %result.output,
                    "agent call finished"
                );
                Ok(result)
            }
            Err(err) => {
                log_error!(err, task_id = self.task_id.as_str());
                Err(err)
            }
        }
    }
}

#[async_trait]
impl Operator for AgentTask {
    fn task_id(&self) -> &str {
        &self.task_id
    }

    fn kind(&self) -> OperatorKind {
        self.kind
    }

    async fn execute(&self, ctx: &TaskContext) -> Result<Value> {
        Ok(self.call_agent(ctx).await?.output)
    }
}
