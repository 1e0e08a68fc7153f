use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use flowai::{DynLlmClient, FlowAiError, LlmClient, LlmRequest, LlmResponse};

/// Replays canned responses in order and records every request it receives.
#[derive(Clone, Default)]
pub struct ScriptedClient {
    responses: Arc<Mutex<VecDeque<String>>>,
    requests: Arc<Mutex<Vec<LlmRequest>>>,
}

impl ScriptedClient {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Arc::new(Mutex::new(responses.into_iter().map(Into::into).collect())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().clone()
    }

    pub fn shared(&self) -> DynLlmClient {
        Arc::new(self.clone())
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn complete(&self, request: LlmRequest) -> flowai::Result<LlmResponse> {
        self.requests.lock().push(request);
        let content = self
            .responses
            .lock()
            .pop_front()
            .ok_or_else(|| FlowAiError::Provider("no scripted response left".to_string()))?;
        Ok(LlmResponse {
            content,
            metadata: None,
        })
    }

    fn clone_dyn(&self) -> DynLlmClient {
        Arc::new(self.clone())
    }
}
