use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::RwLock;
use serde_json::Value;

/// What a running task sees: its identity, its argument, run parameters and
/// the outputs (XCom values) of tasks that already ran in the same run.
///
/// Clones share the XCom store, so a context can be handed to mapped task
/// instances while they all publish into one place.
#[derive(Clone, Debug)]
pub struct TaskContext {
    run_id: String,
    task_id: String,
    map_index: Option<usize>,
    arg: Value,
    params: Value,
    xcom: Arc<RwLock<HashMap<String, Value>>>,
}

impl TaskContext {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            task_id: String::new(),
            map_index: None,
            arg: Value::Null,
            params: Value::Null,
            xcom: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Context for a manual run, with a time based run id.
    pub fn manual() -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self::new(format!("manual__{}-{}", now.as_secs(), now.subsec_nanos()))
    }

    pub fn with_params(mut self, params: Value) -> Self {
        self.params = params;
        self
    }

    /// Same run, different task. Argument and map index are reset.
    pub fn for_task(&self, task_id: impl Into<String>) -> Self {
        Self {
            run_id: self.run_id.clone(),
            task_id: task_id.into(),
            map_index: None,
            arg: Value::Null,
            params: self.params.clone(),
            xcom: Arc::clone(&self.xcom),
        }
    }

    pub fn with_arg(&self, arg: Value) -> Self {
        let mut ctx = self.clone();
        ctx.arg = arg;
        ctx
    }

    pub fn with_map_index(mut self, index: usize) -> Self {
        self.map_index = Some(index);
        self
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn map_index(&self) -> Option<usize> {
        self.map_index
    }

    pub fn arg(&self) -> &Value {
        &self.arg
    }

    pub fn params(&self) -> &Value {
        &self.params
    }

    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    pub fn xcom_push(&self, task_id: impl Into<String>, value: Value) {
        self.xcom.write().insert(task_id.into(), value);
    }

    pub fn xcom_pull(&self, task_id: &str) -> Option<Value> {
        self.xcom.read().get(task_id).cloned()
    }
}

impl Default for TaskContext {
    fn default() -> Self {
        Self::manual()
    }
}
