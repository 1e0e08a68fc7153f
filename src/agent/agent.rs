use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use super::output::{clean_response, parse_structured};
use crate::error::{FlowAiError, Result};
use crate::llm::{DynLlmClient, LlmMessage, LlmRequest};
use crate::schema::Schema;
use crate::tools::{Tool, ToolInvocation, ToolRegistry};
use crate::utils::validation::ConfigValidator;

pub const DEFAULT_MAX_TOOL_ROUNDS: usize = 8;

#[derive(Clone, Debug, PartialEq)]
pub enum OutputType {
    Text,
    Structured(Schema),
}

#[derive(Clone, Debug)]
pub struct AgentRunResult {
    pub output: Value,
    pub tool_calls: usize,
    pub raw: String,
}

/// A model bound to a system prompt, an output type and a set of tools.
#[derive(Clone)]
pub struct Agent {
    model: DynLlmClient,
    system_prompt: String,
    output: OutputType,
    tools: ToolRegistry,
    max_tool_rounds: usize,
    temperature: f32,
}

impl Agent {
    pub fn builder(model: DynLlmClient) -> AgentBuilder {
        AgentBuilder::new(model)
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn output_type(&self) -> &OutputType {
        &self.output
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub async fn run(&self, prompt: &str) -> Result<AgentRunResult> {
        let mut request = LlmRequest::new(prompt)
            .with_system(self.compose_system_prompt())
            .with_temperature(self.temperature);
        let mut tool_calls = 0usize;

        loop {
            let response = self.model.complete(request.clone()).await?;
            let cleaned = clean_response(&response.content);

            if let Some((tool, invocation)) = self.requested_tool(&cleaned)? {
                if tool_calls >= self.max_tool_rounds {
                    return Err(FlowAiError::MaxToolRounds(self.max_tool_rounds));
                }
                tool_calls += 1;
                let result = tool.call(invocation.input).await?;
                request.history.push(LlmMessage::assistant(response.content));
                request.history.push(LlmMessage::user(format!(
                    "Tool `{}` returned: {}",
                    invocation.name, result
                )));
                continue;
            }

            let output = match &self.output {
                OutputType::Text => Value::String(response.content.clone()),
                OutputType::Structured(schema) => parse_structured(&cleaned, schema)?,
            };
            debug!(tool_calls, "agent run finished");
            return Ok(AgentRunResult {
                output,
                tool_calls,
                raw: response.content,
            });
        }
    }

    /// A reply is a tool call when it names a registered tool. An unknown name
    /// is only an error for text agents whose reply is exactly
    /// `{"tool": .., "input": ..}`; otherwise the reply is treated as output.
    fn requested_tool(&self, cleaned: &str) -> Result<Option<(Arc<dyn Tool>, ToolInvocation)>> {
        if self.tools.is_empty() {
            return Ok(None);
        }
        let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(cleaned) else {
            return Ok(None);
        };
        let Some(name) = fields.get("tool").and_then(Value::as_str) else {
            return Ok(None);
        };

        match self.tools.get(name) {
            Some(tool) => {
                info!(tool = %name, "model requested tool");
                let input = fields.get("input").cloned().unwrap_or(Value::Null);
                Ok(Some((tool, ToolInvocation::new(name, input))))
            }
            None => {
                let invocation_shape = fields
                    .keys()
                    .all(|key| key == "tool" || key == "input");
                if matches!(self.output, OutputType::Text) && invocation_shape {
                    return Err(FlowAiError::ToolNotRegistered(name.to_string()));
                }
                Ok(None)
            }
        }
    }

    fn compose_system_prompt(&self) -> String {
        let mut system = self.system_prompt.trim().to_string();
        if !self.tools.is_empty() {
            system.push_str(
                "\n\nTo call a tool, reply with only {\"tool\": \"<name>\", \"input\": <json>}. Available tools:\n",
            );
            system.push_str(&self.tools.catalogue());
        }
        if let OutputType::Structured(schema) = &self.output {
            system.push_str("\n\nReply with only JSON matching this schema: ");
            system.push_str(&schema.describe());
        }
        system
    }
}

pub struct AgentBuilder {
    model: DynLlmClient,
    system_prompt: String,
    output: OutputType,
    tools: ToolRegistry,
    max_tool_rounds: usize,
    temperature: f32,
}

impl AgentBuilder {
    pub fn new(model: DynLlmClient) -> Self {
        Self {
            model,
            system_prompt: String::new(),
            output: OutputType::Text,
            tools: ToolRegistry::new(),
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
            temperature: crate::llm::types::default_temperature(),
        }
    }

    pub fn system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    pub fn output_type(mut self, output: OutputType) -> Self {
        self.output = output;
        self
    }

    pub fn output_schema(self, schema: Schema) -> Self {
        self.output_type(OutputType::Structured(schema))
    }

    pub fn tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.register(tool);
        self
    }

    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    pub fn max_tool_rounds(mut self, rounds: usize) -> Self {
        self.max_tool_rounds = rounds;
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn build(self) -> Result<Agent> {
        ConfigValidator::validate_temperature(f64::from(self.temperature))?;
        Ok(Agent {
            model: self.model,
            system_prompt: self.system_prompt,
            output: self.output,
            tools: self.tools.logged(),
            max_tool_rounds: self.max_tool_rounds,
            temperature: self.temperature,
        })
    }
}
