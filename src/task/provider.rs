use serde::{Deserialize, Serialize};

use super::operator::OperatorKind;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TaskDecoratorInfo {
    pub name: String,
    pub class_name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProviderInfo {
    pub package_name: String,
    pub name: String,
    pub description: String,
    pub versions: Vec<String>,
    pub task_decorators: Vec<TaskDecoratorInfo>,
}

/// Package metadata and the task operators it contributes.
pub fn provider_info() -> ProviderInfo {
    let decorators = [
        (OperatorKind::Agent, "flowai::task::AgentTask"),
        (OperatorKind::Llm, "flowai::task::LlmTask"),
        (OperatorKind::LlmBranch, "flowai::task::LlmBranchTask"),
        (OperatorKind::Embed, "flowai::task::EmbedTask"),
    ];

    ProviderInfo {
        package_name: env!("CARGO_PKG_NAME").to_string(),
        name: "FlowAI".to_string(),
        description: "Task operators for building LLM workflows and agents in DAG pipelines"
            .to_string(),
        versions: vec![env!("CARGO_PKG_VERSION").to_string()],
        task_decorators: decorators
            .iter()
            .map(|(kind, class_name)| TaskDecoratorInfo {
                name: kind
                    .decorator_name()
                    .trim_start_matches("@task.")
                    .to_string(),
                class_name: class_name.to_string(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_ai_decorator() {
        let info = provider_info();
        let names: Vec<&str> = info
            .task_decorators
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(names, vec!["agent", "llm", "llm_branch", "embed"]);
        assert_eq!(info.package_name, "flowai");

        let value = serde_json::to_value(&info).unwrap();
        assert!(value.get("task-decorators").is_some());
    }
}
