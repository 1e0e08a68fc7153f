use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{error, info, info_span, Instrument};

use super::tool::Tool;
use crate::error::Result;

/// Logs every call of the wrapped tool, with its input and result, inside a
/// span named after the tool.
pub struct LoggedTool {
    inner: Arc<dyn Tool>,
}

impl LoggedTool {
    pub fn wrap(inner: Arc<dyn Tool>) -> Arc<dyn Tool> {
        Arc::new(Self { inner })
    }
}

#[async_trait]
impl Tool for LoggedTool {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn description(&self) -> &str {
        self.inner.description()
    }

    async fn call(&self, input: Value) -> Result<Value> {
        let span = info_span!("tool_call", tool = %self.inner.name());
        async move {
            info!(input = %input, "calling tool");
            match self.inner.call(input).await {
                Ok(output) => {
                    info!(output = %output, "tool finished");
                    Ok(output)
                }
                Err(err) => {
                    error!(error = %err, "tool failed");
                    Err(err)
                }
            }
        }
        .instrument(span)
        .await
    }
}
