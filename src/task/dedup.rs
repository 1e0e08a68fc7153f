use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use super::context::TaskContext;
use super::operator::{Operator, OperatorKind};
use crate::dedup::Deduplicator;
use crate::error::{FlowAiError, Result};
use crate::utils::validation::ConfigValidator;

/// Where a [`DedupTask`] finds its records and vectors.
#[derive(Clone, Debug)]
pub enum DedupSource {
    /// The task argument is `{"records": [...], "vectors": [[...], ...]}`.
    Argument,
    /// XCom values of two upstream tasks.
    Upstream {
        records_task: String,
        vectors_task: String,
    },
}

#[derive(Deserialize)]
struct DedupInput {
    records: Vec<String>,
    vectors: Vec<Vec<f32>>,
}

/// Semantic deduplication as one pipeline step. The output is the list of
/// `{canonical, group}` objects.
pub struct DedupTask {
    task_id: String,
    deduplicator: Deduplicator,
    source: DedupSource,
}

impl DedupTask {
    pub fn new(task_id: impl Into<String>, deduplicator: Deduplicator) -> Result<Self> {
        let task_id = task_id.into();
        ConfigValidator::validate_task_id(&task_id)?;
        Ok(Self {
            task_id,
            deduplicator,
            source: DedupSource::Argument,
        })
    }

    pub fn from_upstream(
        mut self,
        records_task: impl Into<String>,
        vectors_task: impl Into<String>,
    ) -> Self {
        self.source = DedupSource::Upstream {
            records_task: records_task.into(),
            vectors_task: vectors_task.into(),
        };
        self
    }

    fn load_input(&self, ctx: &TaskContext) -> Result<DedupInput> {
        match &self.source {
            DedupSource::Argument => decode(ctx.arg().clone(), "task argument"),
            DedupSource::Upstream {
                records_task,
                vectors_task,
            } => {
                let records = pull(ctx, records_task)?;
                let vectors = pull(ctx, vectors_task)?;
                Ok(DedupInput {
                    records: decode(records, records_task)?,
                    vectors: decode(vectors, vectors_task)?,
                })
            }
        }
    }
}

fn pull(ctx: &TaskContext, task_id: &str) -> Result<Value> {
    ctx.xcom_pull(task_id).ok_or_else(|| {
        FlowAiError::InvalidInput(format!("upstream task `{}` has no output", task_id))
    })
}

fn decode<T: serde::de::DeserializeOwned>(value: Value, source: &str) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|e| FlowAiError::InvalidInput(format!("malformed {}: {}", source, e)))
}

#[async_trait]
impl Operator for DedupTask {
    fn task_id(&self) -> &str {
        &self.task_id
    }

    fn kind(&self) -> OperatorKind {
        OperatorKind::Dedup
    }

    async fn execute(&self, ctx: &TaskContext) -> Result<Value> {
        let input = self.load_input(ctx)?;
        let groups = self
            .deduplicator
            .deduplicate(&input.records, &input.vectors)?;
        info!(
            task_id = %self.task_id,
            records = input.records.len(),
            groups = groups.len(),
            "deduplication step finished"
        );
        Ok(serde_json::to_value(groups)?)
    }
}
