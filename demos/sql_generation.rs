use flowai::utils::LoggingConfig;
use flowai::{
    callable, expand, FlowAiError, FnTask, LlmTask, Operator, ProviderSettings, Schema,
    TaskContext,
};
use serde_json::{json, Value};

const SYSTEM_PROMPT: &str = "You convert analytics requests plus a simplified schema into \
parameterized SQL for the given dialect.
- Use safe identifiers and date handling idioms for the dialect.
- Prefer parameterized filters (e.g., :start_date, :end_date) where applicable.
- Return:
  - dialect: the input dialect
  - sql: a single valid query
  - notes: assumptions or caveats made";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    LoggingConfig::init();

    let model = ProviderSettings::from_env()?.chat_client()?;
    let run = TaskContext::new("sql_generation");

    let get_requests = FnTask::new(
        "get_requests",
        callable(|_, _| {
            Ok(json!([
                {
                    "dialect": "postgres",
                    "schema": {
                        "tables": {
                            "orders": {"columns": [
                                {"name": "order_id", "type": "int"},
                                {"name": "customer_id", "type": "int"},
                                {"name": "order_date", "type": "timestamp"},
                                {"name": "total_amount", "type": "numeric"}
                            ]},
                            "customers": {"columns": [
                                {"name": "customer_id", "type": "int"},
                                {"name": "country", "type": "text"}
                            ]}
                        }
                    },
                    "request": "Total revenue by country for the last 30 days"
                },
                {
                    "dialect": "snowflake",
                    "schema": {
                        "tables": {
                            "events": {"columns": [
                                {"name": "user_id", "type": "varchar"},
                                {"name": "event_type", "type": "varchar"},
                                {"name": "event_time", "type": "timestamp"}
                            ]}
                        }
                    },
                    "request": "Daily active users for the last 14 days"
                }
            ]))
        }),
    )?;

    let generated_sql = Schema::object([
        ("dialect", Schema::string()),
        ("sql", Schema::string()),
        ("notes", Schema::string()),
    ])
    .with_name("GeneratedSQL");

    let generate_sql = LlmTask::builder("generate_sql", model)
        .system_prompt(SYSTEM_PROMPT)
        .output_schema(generated_sql)
        .callable(callable(|payload, _| {
            if payload.is_null() {
                return Err(FlowAiError::Skipped("No payload provided".to_string()));
            }
            Ok(json!(format!(
                "Dialect: {}\nSchema: {}\nRequest: {}",
                payload["dialect"].as_str().unwrap_or_default(),
                payload["schema"],
                payload["request"].as_str().unwrap_or_default()
            )))
        }))
        .build()?;

    let requests = get_requests.run(&run, Value::Null).await?;
    let statements = expand(
        &generate_sql,
        requests.as_array().cloned().unwrap_or_default(),
        &run,
    )
    .await?;

    println!("{}", serde_json::to_string_pretty(&statements)?);
    Ok(())
}
