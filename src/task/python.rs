use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::context::TaskContext;
use super::operator::{Operator, OperatorKind, TaskCallable};
use crate::error::Result;
use crate::utils::validation::ConfigValidator;

/// Plain task: the callable's return value is the task output.
pub struct FnTask {
    task_id: String,
    callable: TaskCallable,
}

impl FnTask {
    pub fn new(task_id: impl Into<String>, callable: TaskCallable) -> Result<Self> {
        let task_id = task_id.into();
        ConfigValidator::validate_task_id(&task_id)?;
        Ok(Self { task_id, callable })
    }
}

#[async_trait]
impl Operator for FnTask {
    fn task_id(&self) -> &str {
        &self.task_id
    }

    fn kind(&self) -> OperatorKind {
        OperatorKind::Task
    }

    async fn execute(&self, ctx: &TaskContext) -> Result<Value> {
        debug!(task_id = %self.task_id, map_index = ?ctx.map_index(), "executing task");
        (self.callable)(ctx.arg(), ctx)
    }
}
