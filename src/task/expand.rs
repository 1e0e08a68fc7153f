use futures::stream::{self, StreamExt};
use serde_json::Value;
use tracing::info;

use super::context::TaskContext;
use super::operator::Operator;
use crate::error::Result;

pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Dynamic task mapping: one instance of `operator` per element of `args`.
///
/// Outputs keep the order of `args`. Instances that were skipped are left out;
/// any other failure fails the whole mapping. The collected list is published
/// as the operator's XCom value.
pub async fn expand<O>(operator: &O, args: Vec<Value>, ctx: &TaskContext) -> Result<Vec<Value>>
where
    O: Operator + ?Sized,
{
    expand_with_concurrency(operator, args, ctx, DEFAULT_MAX_CONCURRENCY).await
}

pub async fn expand_with_concurrency<O>(
    operator: &O,
    args: Vec<Value>,
    ctx: &TaskContext,
    max_concurrency: usize,
) -> Result<Vec<Value>>
where
    O: Operator + ?Sized,
{
    let base = ctx.for_task(operator.task_id());
    let results: Vec<Result<Value>> = stream::iter(args.into_iter().enumerate())
        .map(|(index, arg)| {
            let instance = base.with_arg(arg).with_map_index(index);
            async move { operator.execute(&instance).await }
        })
        .buffered(max_concurrency.max(1))
        .collect()
        .await;

    let mut outputs = Vec::with_capacity(results.len());
    for (index, result) in results.into_iter().enumerate() {
        match result {
            Ok(value) => outputs.push(value),
            Err(err) if err.is_skip() => {
                info!(task_id = %operator.task_id(), map_index = index, reason = %err, "mapped instance skipped");
            }
            Err(err) => return Err(err),
        }
    }

    ctx.xcom_push(operator.task_id(), Value::Array(outputs.clone()));
    Ok(outputs)
}
