mod common;

use serde_json::{json, Value};

use common::ScriptedClient;
use flowai::{callable, FlowAiError, LlmBranchTask, Operator, OperatorKind, TaskContext};

fn router(client: &ScriptedClient, allow_multiple: bool) -> LlmBranchTask {
    LlmBranchTask::builder("route_ticket", client.shared())
        .system_prompt("Route the support ticket.")
        .downstream(["handle_billing", "handle_bug", "handle_feature_request"])
        .allow_multiple_branches(allow_multiple)
        .callable(callable(|arg, _| Ok(arg.clone())))
        .build()
        .expect("branch task builds")
}

#[tokio::test]
async fn single_branch_is_returned_as_task_id() -> anyhow::Result<()> {
    let client = ScriptedClient::new(["handle_bug"]);
    let task = router(&client, false);
    assert_eq!(task.kind(), OperatorKind::LlmBranch);

    let run = TaskContext::manual();
    let output = task.run(&run, json!("The app crashes on login")).await?;
    assert_eq!(output, json!("handle_bug"));
    assert_eq!(run.xcom_pull("route_ticket"), Some(json!("handle_bug")));

    let system = client.requests()[0].system.clone().unwrap_or_default();
    assert!(system.starts_with("Route the support ticket."));
    assert!(system.contains("handle_feature_request"));
    Ok(())
}

#[tokio::test]
async fn quoted_and_fenced_answers_are_accepted() -> anyhow::Result<()> {
    let client = ScriptedClient::new(["```json\n\"HANDLE_BILLING\"\n```"]);
    let task = router(&client, false);
    let choices = task.decide(&TaskContext::manual().with_arg(json!("refund"))).await?;
    assert_eq!(choices, vec!["handle_billing".to_string()]);
    Ok(())
}

#[tokio::test]
async fn multiple_branches_when_allowed() -> anyhow::Result<()> {
    let client = ScriptedClient::new([r#"["handle_bug", "handle_billing", "handle_bug"]"#]);
    let task = router(&client, true);
    let output = task
        .run(&TaskContext::manual(), json!("Charged twice and the app crashed"))
        .await?;
    assert_eq!(output, json!(["handle_bug", "handle_billing"]));
    Ok(())
}

#[tokio::test]
async fn multiple_branches_rejected_by_default() -> anyhow::Result<()> {
    let client = ScriptedClient::new(["handle_bug, handle_billing"]);
    let task = router(&client, false);
    let err = task
        .run(&TaskContext::manual(), json!("two problems"))
        .await
        .unwrap_err();
    assert!(matches!(err, FlowAiError::StructuredOutput(_)), "{err}");
    Ok(())
}

#[tokio::test]
async fn repeated_single_branch_counts_once() -> anyhow::Result<()> {
    let client = ScriptedClient::new(["handle_bug, Handle_Bug"]);
    let task = router(&client, false);
    let output = task
        .run(&TaskContext::manual(), json!("crash on login"))
        .await?;
    assert_eq!(output, json!("handle_bug"));
    Ok(())
}

#[tokio::test]
async fn unknown_branch_is_invalid() -> anyhow::Result<()> {
    let client = ScriptedClient::new(["handle_sales"]);
    let task = router(&client, false);
    let err = task
        .run(&TaskContext::manual(), json!("pricing question"))
        .await
        .unwrap_err();
    match err {
        FlowAiError::InvalidBranch { task_id, branch } => {
            assert_eq!(task_id, "route_ticket");
            assert_eq!(branch, "handle_sales");
        }
        other => panic!("unexpected error: {other}"),
    }
    Ok(())
}

#[test]
fn branch_task_needs_downstream_tasks() {
    let client = ScriptedClient::new(Vec::<String>::new());
    let err = LlmBranchTask::builder("route", client.shared())
        .callable(callable(|_, _| Ok(Value::Null)))
        .build()
        .err()
        .expect("build should fail");
    assert!(matches!(err, FlowAiError::InvalidInput(_)));
}
