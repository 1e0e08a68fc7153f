use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use super::agent::AgentTask;
use super::context::TaskContext;
use super::operator::{Operator, OperatorKind, TaskCallable};
use crate::agent::{clean_response, Agent};
use crate::error::{FlowAiError, Result};
use crate::llm::DynLlmClient;
use crate::schema::Schema;

/// Lets the model pick which downstream task(s) run next.
///
/// The output is the chosen task id, or an array of ids when
/// `allow_multiple_branches` is set. Skipping the branches that were not
/// chosen is left to the orchestrator.
pub struct LlmBranchTask {
    inner: AgentTask,
    downstream: Vec<String>,
    allow_multiple_branches: bool,
}

impl LlmBranchTask {
    pub fn builder(task_id: impl Into<String>, model: DynLlmClient) -> LlmBranchTaskBuilder {
        LlmBranchTaskBuilder {
            task_id: task_id.into(),
            model,
            system_prompt: String::new(),
            downstream: Vec::new(),
            allow_multiple_branches: false,
            callable: None,
        }
    }

    pub fn downstream(&self) -> &[String] {
        &self.downstream
    }

    pub fn allow_multiple_branches(&self) -> bool {
        self.allow_multiple_branches
    }

    /// Runs the model and returns the chosen downstream task ids.
    pub async fn decide(&self, ctx: &TaskContext) -> Result<Vec<String>> {
        let result = self.inner.call_agent(ctx).await?;
        let choices = self.parse_choices(&result.raw)?;
        info!(task_id = %self.inner.task_id(), branches = ?choices, "branch chosen");
        Ok(choices)
    }

    fn parse_choices(&self, raw: &str) -> Result<Vec<String>> {
        let cleaned = clean_response(raw);
        let labels: Vec<String> = match serde_json::from_str::<Value>(&cleaned) {
            Ok(Value::String(label)) => vec![label],
            Ok(Value::Array(items)) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(label) => label,
                    other => other.to_string(),
                })
                .collect(),
            _ => cleaned
                .split(',')
                .map(|label| label.trim().trim_matches('"').to_string())
                .filter(|label| !label.is_empty())
                .collect(),
        };

        if labels.is_empty() {
            return Err(FlowAiError::StructuredOutput(
                "model did not choose a branch".to_string(),
            ));
        }

        let mut chosen: Vec<String> = Vec::with_capacity(labels.len());
        for label in labels {
            let target = self
                .downstream
                .iter()
                .find(|candidate| candidate.eq_ignore_ascii_case(label.trim()))
                .ok_or_else(|| FlowAiError::InvalidBranch {
                    task_id: self.inner.task_id().to_string(),
                    branch: label.clone(),
                })?;
            if !chosen.contains(target) {
                chosen.push(target.clone());
            }
        }

        if chosen.len() > 1 && !self.allow_multiple_branches {
            return Err(FlowAiError::StructuredOutput(format!(
                "expected a single branch, got {}",
                chosen.len()
            )));
        }
        Ok(chosen)
    }
}

pub struct LlmBranchTaskBuilder {
    task_id: String,
    model: DynLlmClient,
    system_prompt: String,
    downstream: Vec<String>,
    allow_multiple_branches: bool,
    callable: Option<TaskCallable>,
}

impl LlmBranchTaskBuilder {
    pub fn system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    pub fn downstream<I, S>(mut self, task_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.downstream = task_ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn allow_multiple_branches(mut self, allow: bool) -> Self {
        self.allow_multiple_branches = allow;
        self
    }

    pub fn callable(mut self, callable: TaskCallable) -> Self {
        self.callable = Some(callable);
        self
    }

    pub fn build(self) -> Result<LlmBranchTask> {
        if self.downstream.is_empty() {
            return Err(FlowAiError::InvalidInput(format!(
                "branch task `{}` has no downstream tasks",
                self.task_id
            )));
        }
        let callable = self.callable.ok_or_else(|| {
            FlowAiError::Config(format!("branch task `{}` has no callable", self.task_id))
        })?;

        let choices = Schema::enumeration(self.downstream.iter().cloned());
        let schema = if self.allow_multiple_branches {
            Schema::array(choices)
        } else {
            choices
        };
        let system_prompt = format!(
            "{}\n\nChoose the next step. Reply with only JSON matching this schema: {}",
            self.system_prompt.trim(),
            schema.describe()
        );

        let agent = Agent::builder(self.model)
            .system_prompt(system_prompt)
            .build()?;
        let inner = AgentTask::new(self.task_id, agent, callable)?
            .with_kind(OperatorKind::LlmBranch);
        Ok(LlmBranchTask {
            inner,
            downstream: self.downstream,
            allow_multiple_branches: self.allow_multiple_branches,
        })
    }
}

#[async_trait]
impl Operator for LlmBranchTask {
    fn task_id(&self) -> &str {
        self.inner.task_id()
    }

    fn kind(&self) -> OperatorKind {
        OperatorKind::LlmBranch
    }

    async fn execute(&self, ctx: &TaskContext) -> Result<Value> {
        let mut choices = self.decide(ctx).await?;
        if self.allow_multiple_branches {
            Ok(Value::Array(choices.into_iter().map(Value::String).collect()))
        } else {
            Ok(Value::String(choices.remove(0)))
        }
    }
}
