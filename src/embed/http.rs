use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{normalize, EmbeddingProvider, EncodeOptions};
use crate::error::{FlowAiError, Result};

/// OpenAI-compatible `/embeddings` endpoint (OpenAI, Ollama, vLLM, ...).
pub struct HttpEmbeddingProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl HttpEmbeddingProvider {
    pub fn new<S1, S2>(base_url: S1, model: S2) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
            model: model.into(),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: Option<usize>,
    embedding: Vec<f32>,
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    fn model(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, texts, options), fields(model = %self.model, count = texts.len()))]
    async fn embed(&self, texts: &[String], options: &EncodeOptions) -> Result<Vec<Vec<f32>>> {
        let url = format!("{}/embeddings", self.base_url);
        let mut request = self.client.post(&url).json(&EmbeddingRequest {
            model: &self.model,
            input: texts,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FlowAiError::Provider(format!("embedding request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FlowAiError::Provider(format!(
                "embedding API error {}: {}",
                status, body
            )));
        }

        let mut payload: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| FlowAiError::Provider(format!("invalid embedding response: {}", e)))?;
        if payload.data.len() != texts.len() {
            return Err(FlowAiError::Provider(format!(
                "embedding API returned {} vectors for {} texts",
                payload.data.len(),
                texts.len()
            )));
        }

        payload.data.sort_by_key(|item| item.index.unwrap_or(usize::MAX));
        Ok(payload
            .data
            .into_iter()
            .map(|item| {
                let mut vector = item.embedding;
                if options.normalize_embeddings {
                    normalize(&mut vector);
                }
                vector
            })
            .collect())
    }
}
