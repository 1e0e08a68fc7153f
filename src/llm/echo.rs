use std::sync::Arc;

use async_trait::async_trait;

use super::client::{DynLlmClient, LlmClient};
use super::types::{LlmRequest, LlmResponse};
use crate::error::Result;

/// Answers with the prompt it was given. Useful for wiring pipelines offline.
#[derive(Default, Clone)]
pub struct LocalEchoClient;

#[async_trait]
impl LlmClient for LocalEchoClient {
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse> {
        let mut content = String::new();
        if let Some(system) = &request.system {
            content.push_str(&format!("[System:{}] ", system.trim()));
        }
        content.push_str(&request.user);
        Ok(LlmResponse {
            content,
            metadata: request.metadata,
        })
    }

    fn clone_dyn(&self) -> DynLlmClient {
        Arc::new(LocalEchoClient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn echo_prefixes_system_prompt() {
        let request = LlmRequest::new("hello").with_system("  be brief ");
        let response = LocalEchoClient.complete(request).await.unwrap();
        assert_eq!(response.content, "[System:be brief] hello");
    }
}
