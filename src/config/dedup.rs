use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dedup::{DedupStrategy, Deduplicator, DEFAULT_THRESHOLD};
use crate::error::{FlowAiError, Result};

/// Deduplication settings as stored in a JSON file.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DedupConfig {
    pub threshold: f64,
    pub strategy: DedupStrategy,
}

/// File shape with the threshold still unparsed.
#[derive(Deserialize)]
struct RawDedupConfig {
    #[serde(default)]
    threshold: Option<Value>,
    #[serde(default)]
    strategy: DedupStrategy,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            strategy: DedupStrategy::default(),
        }
    }
}

impl DedupConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            FlowAiError::Config(format!("failed to read `{}`: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let raw: RawDedupConfig = serde_json::from_str(content)
            .map_err(|e| FlowAiError::Config(format!("invalid dedup config: {}", e)))?;
        let threshold = match raw.threshold {
            None => DEFAULT_THRESHOLD,
            Some(Value::Number(number)) => number.as_f64().ok_or_else(|| {
                FlowAiError::InvalidThreshold(format!("threshold {} is not an f64", number))
            })?,
            Some(other) => {
                return Err(FlowAiError::InvalidThreshold(format!(
                    "threshold must be a number, got {}",
                    other
                )))
            }
        };
        let config = Self {
            threshold,
            strategy: raw.strategy,
        };
        config.deduplicator()?;
        Ok(config)
    }

    pub fn deduplicator(&self) -> Result<Deduplicator> {
        Ok(Deduplicator::new(self.threshold)?.with_strategy(self.strategy))
    }
}
