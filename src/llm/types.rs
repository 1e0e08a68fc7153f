use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LlmMessage {
    pub role: String,
    pub content: String,
}

impl LlmMessage {
    pub fn assistant<T: Into<String>>(content: T) -> Self {
        Self {
            role: "assistant".into(),
            content: content.into(),
        }
    }

    pub fn user<T: Into<String>>(content: T) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LlmRequest {
    #[serde(default)]
    pub system: Option<String>,
    pub user: String,
    /// Turns exchanged after `user`, oldest first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<LlmMessage>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default)]
    pub metadata: Option<Value>,
}

impl LlmRequest {
    pub fn new<T: Into<String>>(user: T) -> Self {
        Self {
            system: None,
            user: user.into(),
            history: Vec::new(),
            temperature: default_temperature(),
            metadata: None,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

pub(crate) fn default_temperature() -> f32 {
    0.2
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LlmResponse {
    pub content: String,
    #[serde(default)]
    pub metadata: Option<Value>,
}
