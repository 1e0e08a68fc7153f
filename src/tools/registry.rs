use std::collections::BTreeMap;
use std::sync::Arc;

use super::logged::LoggedTool;
use super::tool::Tool;

/// Tools an agent may call, keyed by name.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).map(Arc::clone)
    }

    pub fn names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// `name: description` lines for the system prompt.
    pub fn catalogue(&self) -> String {
        self.tools
            .values()
            .map(|tool| format!("- {}: {}", tool.name(), tool.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Re-wraps every tool so its calls are logged.
    pub fn logged(self) -> Self {
        let tools = self
            .tools
            .into_iter()
            .map(|(name, tool)| (name, LoggedTool::wrap(tool)))
            .collect();
        Self { tools }
    }
}
