//! Embedding provider seam used by [`crate::task::EmbedTask`] and the CLI.

mod hashing;
#[cfg(feature = "openai-client")]
mod http;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{FlowAiError, Result};

pub use hashing::HashingEmbedder;
#[cfg(feature = "openai-client")]
pub use http::HttpEmbeddingProvider;

pub const DEFAULT_EMBED_MODEL: &str = "all-MiniLM-L12-v2";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeOptions {
    #[serde(default = "default_normalize")]
    pub normalize_embeddings: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            normalize_embeddings: true,
        }
    }
}

fn default_normalize() -> bool {
    true
}

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    fn model(&self) -> &str;

    /// Embeds a batch of texts. The output is index-aligned with `texts`.
    async fn embed(&self, texts: &[String], options: &EncodeOptions) -> Result<Vec<Vec<f32>>>;

    async fn embed_one(&self, text: &str, options: &EncodeOptions) -> Result<Vec<f32>> {
        let mut vectors = self.embed(&[text.to_string()], options).await?;
        if vectors.len() != 1 {
            return Err(FlowAiError::Provider(format!(
                "model `{}` returned {} embeddings for one text",
                self.model(),
                vectors.len()
            )));
        }
        Ok(vectors.remove(0))
    }
}

pub type DynEmbeddingProvider = Arc<dyn EmbeddingProvider>;

/// Scales `vector` to unit length in place. Zero vectors are left untouched.
pub fn normalize(vector: &mut [f32]) {
    let norm = vector
        .iter()
        .map(|&value| f64::from(value) * f64::from(value))
        .sum::<f64>()
        .sqrt();
    if norm == 0.0 {
        return;
    }
    for value in vector.iter_mut() {
        *value = (f64::from(*value) / norm) as f32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_scales_to_unit_length() {
        let mut vector = vec![3.0, 4.0];
        normalize(&mut vector);
        assert!((vector[0] - 0.6).abs() < 1e-6);
        assert!((vector[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn normalize_keeps_zero_vector() {
        let mut vector = vec![0.0, 0.0, 0.0];
        normalize(&mut vector);
        assert_eq!(vector, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn encode_options_default_to_normalized() {
        let options: EncodeOptions = serde_json::from_str("{}").unwrap();
        assert!(options.normalize_embeddings);
        assert_eq!(options, EncodeOptions::default());
    }
}
