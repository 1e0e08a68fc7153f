use async_trait::async_trait;

use super::{normalize, EmbeddingProvider, EncodeOptions};
use crate::error::Result;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Deterministic offline embedder: lower-cased word tokens hashed into a
/// fixed number of buckets.
#[derive(Clone, Debug)]
pub struct HashingEmbedder {
    dimension: usize,
    model: String,
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Self {
        let dimension = dimension.max(1);
        Self {
            dimension,
            model: format!("hashing-{}", dimension),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn encode(&self, text: &str, options: &EncodeOptions) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        let lowered = text.to_lowercase();
        for token in lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty())
        {
            let bucket = (fnv1a(token.as_bytes()) % self.dimension as u64) as usize;
            vector[bucket] += 1.0;
        }
        if options.normalize_embeddings {
            normalize(&mut vector);
        }
        vector
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(384)
    }
}

#[async_trait]
impl EmbeddingProvider for HashingEmbedder {
    fn model(&self) -> &str {
        &self.model
    }

    async fn embed(&self, texts: &[String], options: &EncodeOptions) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.encode(text, options)).collect())
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, &byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedup::cosine_similarity;

    #[test]
    fn encoding_is_deterministic_and_case_insensitive() {
        let embedder = HashingEmbedder::new(64);
        let options = EncodeOptions::default();
        let a = embedder.encode("The weather is beautiful", &options);
        let b = embedder.encode("the WEATHER is beautiful!", &options);
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn empty_text_yields_zero_vector() {
        let embedder = HashingEmbedder::new(16);
        let vector = embedder.encode("   ", &EncodeOptions::default());
        assert!(vector.iter().all(|&value| value == 0.0));
    }

    #[test]
    fn shared_words_increase_similarity() {
        let embedder = HashingEmbedder::default();
        let options = EncodeOptions::default();
        let base = embedder.encode("beautiful day today", &options);
        let close = embedder.encode("it is a beautiful day today", &options);
        let far = embedder.encode("an unrelated sentence about databases", &options);
        let near_score = cosine_similarity(&base, &close).unwrap();
        let far_score = cosine_similarity(&base, &far).unwrap();
        assert!(near_score > far_score);
    }

    #[test]
    fn unnormalized_counts_repeated_tokens() {
        let embedder = HashingEmbedder::new(8);
        let options = EncodeOptions {
            normalize_embeddings: false,
        };
        let vector = embedder.encode("echo echo echo", &options);
        assert_eq!(vector.iter().sum::<f32>(), 3.0);
    }
}
