#[allow(clippy::module_inception)]
pub mod agent;
pub mod output;

pub use agent::{Agent, AgentBuilder, AgentRunResult, OutputType, DEFAULT_MAX_TOOL_ROUNDS};
pub use output::{clean_response, parse_structured};
