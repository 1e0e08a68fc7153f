use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::instrument;

use super::client::{DynLlmClient, LlmClient};
use super::types::{LlmRequest, LlmResponse};
use crate::error::{FlowAiError, Result};

/// Chat completions client for OpenAI-compatible endpoints.
#[derive(Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn with_base_url<S1, S2, S3>(base_url: S1, api_key: S2, model: S3) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    #[instrument(skip(self, request), fields(model = %self.model))]
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse> {
        let url = format!("{}/chat/completions", self.base_url);
        let mut messages = Vec::new();
        if let Some(system) = &request.system {
            messages.push(json!({
                "role": "system",
                "content": system
            }));
        }
        messages.push(json!({
            "role": "user",
            "content": request.user
        }));
        for turn in &request.history {
            messages.push(json!({
                "role": turn.role,
                "content": turn.content
            }));
        }

        let body = json!({
            "model": self.model,
            "messages": messages,
            "temperature": request.temperature,
        });

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| FlowAiError::Provider(format!("chat request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(FlowAiError::Provider(format!(
                "chat request failed with status {}: {}",
                status, detail
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| FlowAiError::Provider(format!("invalid chat response: {}", e)))?;
        let content = payload["choices"]
            .get(0)
            .and_then(|choice| choice["message"]["content"].as_str())
            .ok_or_else(|| FlowAiError::Provider("missing message content".to_string()))?;

        Ok(LlmResponse {
            content: content.to_string(),
            metadata: Some(payload["usage"].clone()),
        })
    }

    fn clone_dyn(&self) -> DynLlmClient {
        Arc::new(self.clone())
    }
}
