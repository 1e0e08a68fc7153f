use std::sync::Arc;

use async_trait::async_trait;

use super::types::{LlmRequest, LlmResponse};
use crate::error::Result;

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse>;

    fn clone_dyn(&self) -> Arc<dyn LlmClient>;
}

pub type DynLlmClient = Arc<dyn LlmClient>;
