use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// A tool call as the model writes it: `{"tool": "<name>", "input": {...}}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    #[serde(rename = "tool")]
    pub name: String,
    #[serde(default)]
    pub input: Value,
}

impl ToolInvocation {
    pub fn new<T: Into<String>>(name: T, input: Value) -> Self {
        Self {
            name: name.into(),
            input,
        }
    }
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str {
        ""
    }
    async fn call(&self, input: Value) -> Result<Value>;
}

type ToolFn = dyn Fn(Value) -> Result<Value> + Send + Sync;

/// Tool backed by a synchronous closure.
pub struct FunctionTool {
    name: String,
    description: String,
    function: Arc<ToolFn>,
}

impl FunctionTool {
    pub fn new<F>(name: impl Into<String>, description: impl Into<String>, function: F) -> Self
    where
        F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            function: Arc::new(function),
        }
    }
}

#[async_trait]
impl Tool for FunctionTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn call(&self, input: Value) -> Result<Value> {
        (self.function)(input)
    }
}
