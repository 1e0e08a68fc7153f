pub mod logged;
pub mod registry;
pub mod tool;

pub use logged::LoggedTool;
pub use registry::ToolRegistry;
pub use tool::{FunctionTool, Tool, ToolInvocation};
