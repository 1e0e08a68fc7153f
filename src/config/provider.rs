use serde::{Deserialize, Serialize};

use super::env::EnvConfig;
use crate::embed::DEFAULT_EMBED_MODEL;
use crate::error::Result;
use crate::utils::validation::ConfigValidator;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";

pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const CHAT_MODEL_ENV: &str = "FLOWAI_MODEL";
pub const EMBED_MODEL_ENV: &str = "FLOWAI_EMBED_MODEL";

/// Connection settings for OpenAI-compatible chat and embedding endpoints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProviderSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_chat_model")]
    pub model: String,
    #[serde(default = "default_embed_model")]
    pub embed_model: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_chat_model() -> String {
    DEFAULT_CHAT_MODEL.to_string()
}

fn default_embed_model() -> String {
    DEFAULT_EMBED_MODEL.to_string()
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            model: default_chat_model(),
            embed_model: default_embed_model(),
        }
    }
}

impl ProviderSettings {
    pub fn from_env() -> Result<Self> {
        let api_key = match EnvConfig::get_env_optional(API_KEY_ENV) {
            Some(raw) => Some(EnvConfig::get_api_key(&raw, API_KEY_ENV)?),
            None => None,
        };
        let settings = Self {
            base_url: EnvConfig::get_env_optional(BASE_URL_ENV).unwrap_or_else(default_base_url),
            api_key,
            model: EnvConfig::get_env_optional(CHAT_MODEL_ENV).unwrap_or_else(default_chat_model),
            embed_model: EnvConfig::get_env_optional(EMBED_MODEL_ENV)
                .unwrap_or_else(default_embed_model),
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        ConfigValidator::validate_url(&self.base_url)?;
        ConfigValidator::validate_model_name(&self.model)?;
        ConfigValidator::validate_model_name(&self.embed_model)?;
        if let Some(key) = &self.api_key {
            ConfigValidator::validate_api_key(key)?;
        }
        Ok(())
    }

    #[cfg(feature = "openai-client")]
    pub fn chat_client(&self) -> Result<crate::llm::DynLlmClient> {
        let api_key = self.require_api_key()?;
        Ok(std::sync::Arc::new(crate::llm::OpenAiClient::with_base_url(
            self.base_url.clone(),
            api_key,
            self.model.clone(),
        )))
    }

    #[cfg(feature = "openai-client")]
    pub fn embedding_provider(&self) -> crate::embed::DynEmbeddingProvider {
        let mut provider =
            crate::embed::HttpEmbeddingProvider::new(self.base_url.clone(), self.embed_model.clone());
        if let Some(key) = &self.api_key {
            provider = provider.with_api_key(key.clone());
        }
        std::sync::Arc::new(provider)
    }

    #[cfg(feature = "openai-client")]
    fn require_api_key(&self) -> Result<String> {
        self.api_key.clone().ok_or_else(|| {
            crate::error::FlowAiError::Config(format!("{} is required for chat models", API_KEY_ENV))
        })
    }
}
