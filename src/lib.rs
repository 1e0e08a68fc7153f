pub mod agent;
pub mod cli;
pub mod config;
pub mod dedup;
pub mod embed;
pub mod error;
pub mod llm;
pub mod schema;
pub mod task;
pub mod tools;
pub mod utils;

pub use agent::{Agent, AgentBuilder, AgentRunResult, OutputType};
pub use config::{DedupConfig, EnvConfig, ProviderSettings};
pub use dedup::{
    cosine_similarity, deduplicate, DedupStrategy, Deduplicator, DuplicateGroup,
    DEFAULT_THRESHOLD,
};
pub use embed::{
    DynEmbeddingProvider, EmbeddingProvider, EncodeOptions, HashingEmbedder, DEFAULT_EMBED_MODEL,
};
#[cfg(feature = "openai-client")]
pub use embed::HttpEmbeddingProvider;
pub use error::{FlowAiError, Result};
pub use llm::{DynLlmClient, LlmClient, LlmMessage, LlmRequest, LlmResponse, LocalEchoClient};
#[cfg(feature = "openai-client")]
pub use llm::OpenAiClient;
pub use schema::{register_schema, validate_schema, Schema, SchemaKind, SchemaRegistry};
pub use task::{
    callable, expand, provider_info, AgentTask, DedupTask, EmbedTask, FnTask, LlmBranchTask,
    LlmTask, Operator, OperatorKind, TaskCallable, TaskContext,
};
pub use tools::{FunctionTool, LoggedTool, Tool, ToolInvocation, ToolRegistry};
pub use utils::{logging, validation};
