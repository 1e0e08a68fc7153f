use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::config::DedupConfig;
use crate::dedup::DuplicateGroup;
use crate::embed::{EncodeOptions, HashingEmbedder};
use crate::error::{FlowAiError, Result};

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)
        .map_err(|e| FlowAiError::InvalidInput(format!("failed to read `{}`: {}", path.display(), e)))?;
    serde_json::from_str(&content)
        .map_err(|e| FlowAiError::InvalidInput(format!("`{}` is not valid JSON input: {}", path.display(), e)))
}

/// Parses a vector written as a JSON array, e.g. `[1, 0, 0.5]`.
pub fn parse_vector(raw: &str) -> Result<Vec<f32>> {
    serde_json::from_str(raw)
        .map_err(|e| FlowAiError::InvalidInput(format!("`{}` is not a numeric array: {}", raw, e)))
}

/// Embeds records offline with the hashing embedder.
pub fn embed_offline(records: &[String], dimension: usize) -> Vec<Vec<f32>> {
    let embedder = HashingEmbedder::new(dimension);
    let options = EncodeOptions::default();
    records
        .iter()
        .map(|record| embedder.encode(record, &options))
        .collect()
}

pub fn dedup_records(
    records: &[String],
    vectors: Option<Vec<Vec<f32>>>,
    config: &DedupConfig,
    dimension: usize,
) -> Result<Vec<DuplicateGroup>> {
    let vectors = match vectors {
        Some(vectors) => vectors,
        None => embed_offline(records, dimension),
    };
    config.deduplicator()?.deduplicate(records, &vectors)
}
