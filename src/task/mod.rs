//! Task operators: the callable runs first, its return value becomes the
//! prompt or text handed to an agent, an LLM or an embedding model.

pub mod agent;
pub mod branch;
pub mod context;
pub mod dedup;
pub mod embed;
pub mod expand;
pub mod llm;
pub mod operator;
pub mod provider;
pub mod python;

pub use agent::AgentTask;
pub use branch::{LlmBranchTask, LlmBranchTaskBuilder};
pub use context::TaskContext;
pub use dedup::{DedupSource, DedupTask};
pub use embed::EmbedTask;
pub use expand::{expand, expand_with_concurrency, DEFAULT_MAX_CONCURRENCY};
pub use llm::{LlmTask, LlmTaskBuilder};
pub use operator::{callable, prompt_text, Operator, OperatorKind, TaskCallable};
pub use provider::{provider_info, ProviderInfo, TaskDecoratorInfo};
pub use python::FnTask;
