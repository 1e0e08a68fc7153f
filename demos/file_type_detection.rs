use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use flowai::utils::LoggingConfig;
use flowai::{
    callable, FlowAiError, FnTask, LlmBranchTask, LlmTask, Operator, ProviderSettings, Schema,
    SchemaKind, TaskContext,
};
use serde_json::{json, Value};

const DETECT_PROMPT: &str = "You are a file type detection expert. Analyze the provided file \
path and content sample to determine the file type (json, csv, tsv, xlsx or unknown), your \
confidence (0-1), the delimiter for CSV-like files, any issues such as misnamed files, and a \
recommendation for processing. Consider both the file extension and the actual content.";

const ROUTE_PROMPT: &str = "Pick the conversion step for the detected file. JSON files go to \
translate_json, delimited text files go to translate_csv.";

const SAMPLE_BYTES: usize = 1024;
const SAMPLE_LINES: usize = 20;

fn detection_schema() -> Schema {
    let properties: HashMap<String, Schema> = [
        (
            "file_type",
            Schema::enumeration(["json", "csv", "tsv", "xlsx", "unknown"]),
        ),
        ("confidence", Schema::new(SchemaKind::Number)),
        ("delimiter", Schema::new(SchemaKind::Any)),
        ("detected_issues", Schema::array(Schema::string())),
        ("recommendation", Schema::string()),
    ]
    .into_iter()
    .map(|(name, schema)| (name.to_string(), schema))
    .collect();

    Schema::new(SchemaKind::Object {
        properties,
        required: vec![
            "file_type".to_string(),
            "confidence".to_string(),
            "recommendation".to_string(),
        ],
        additional: false,
    })
    .with_name("FileTypeDetection")
}

fn sample_file(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(content) => {
            let mut sample = String::new();
            for line in content.lines().take(SAMPLE_LINES) {
                if sample.len() >= SAMPLE_BYTES {
                    break;
                }
                sample.push_str(line);
                sample.push('\n');
            }
            sample.chars().take(1000).collect()
        }
        Err(err) => format!("Error reading file: {}", err),
    }
}

fn converted_path(path: &str) -> String {
    let stem = Path::new(path).with_extension("");
    format!("{}_converted.csv", stem.display())
}

fn file_path_of(ctx: &TaskContext) -> flowai::Result<String> {
    ctx.xcom_pull("get_file_path")
        .and_then(|value| value.as_str().map(str::to_string))
        .ok_or_else(|| FlowAiError::InvalidInput("no file path".to_string()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    LoggingConfig::init();

    let model = ProviderSettings::from_env()?.chat_client()?;

    let default_path = std::env::temp_dir().join("misnamed_file.txt");
    fs::write(
        &default_path,
        "id|name|city\n1|Ada|London\n2|Grace|New York\n3|Linus|Helsinki\n",
    )?;
    let file_path: PathBuf = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or(default_path);

    let run = TaskContext::new("infer_file_type")
        .with_params(json!({"file_path": file_path.display().to_string()}));

    let get_file_path = FnTask::new(
        "get_file_path",
        callable(|_, ctx| {
            ctx.param("file_path")
                .cloned()
                .ok_or_else(|| FlowAiError::InvalidInput("file_path param is missing".to_string()))
        }),
    )?;

    let detect_file_type = LlmTask::builder("detect_file_type", model.clone())
        .system_prompt(DETECT_PROMPT)
        .output_schema(detection_schema())
        .callable(callable(|_, ctx| {
            let path = file_path_of(ctx)?;
            let sample = sample_file(Path::new(&path));
            let extension = Path::new(&path)
                .extension()
                .map(|ext| format!(".{}", ext.to_string_lossy()))
                .unwrap_or_default();
            Ok(json!({
                "file_path": path,
                "extension": extension,
                "sample_lines": sample.lines().count(),
                "content_sample": sample,
            }))
        }))
        .build()?;

    let route_file = LlmBranchTask::builder("route_file", model)
        .system_prompt(ROUTE_PROMPT)
        .downstream(["translate_json", "translate_csv"])
        .callable(callable(|_, ctx| {
            let detection = ctx
                .xcom_pull("detect_file_type")
                .ok_or_else(|| FlowAiError::InvalidInput("no detection result".to_string()))?;
            let confidence = detection["confidence"].as_f64().unwrap_or_default();
            if confidence < 0.8 {
                return Err(FlowAiError::Skipped(
                    "Low confidence in file type detection".to_string(),
                ));
            }
            if detection["file_type"] == json!("unknown") {
                return Err(FlowAiError::Skipped("Unknown file type".to_string()));
            }
            Ok(detection)
        }))
        .build()?;

    let translate_json = FnTask::new(
        "translate_json",
        callable(|_, ctx| {
            let path = file_path_of(ctx)?;
            let content = fs::read_to_string(&path)
                .map_err(|e| FlowAiError::InvalidInput(e.to_string()))?;
            let rows: Vec<serde_json::Map<String, Value>> = serde_json::from_str(&content)?;
            let mut columns: Vec<String> = rows.iter().flat_map(|row| row.keys().cloned()).collect();
            columns.sort();
            columns.dedup();

            let mut csv = columns.join(",");
            csv.push('\n');
            for row in &rows {
                let cells: Vec<String> = columns
                    .iter()
                    .map(|column| match row.get(column) {
                        Some(Value::String(text)) => text.clone(),
                        Some(Value::Null) | None => String::new(),
                        Some(other) => other.to_string(),
                    })
                    .collect();
                csv.push_str(&cells.join(","));
                csv.push('\n');
            }

            let output = converted_path(&path);
            fs::write(&output, csv).map_err(|e| FlowAiError::InvalidInput(e.to_string()))?;
            Ok(json!(output))
        }),
    )?;

    let translate_csv = FnTask::new(
        "translate_csv",
        callable(|_, ctx| {
            let path = file_path_of(ctx)?;
            let delimiter = ctx
                .xcom_pull("detect_file_type")
                .and_then(|detection| detection["delimiter"].as_str().map(str::to_string))
                .filter(|delimiter| !delimiter.is_empty())
                .unwrap_or_else(|| "\t".to_string());
            let content = fs::read_to_string(&path)
                .map_err(|e| FlowAiError::InvalidInput(e.to_string()))?;
            let csv: String = content
                .lines()
                .map(|line| line.split(delimiter.as_str()).collect::<Vec<_>>().join(","))
                .collect::<Vec<_>>()
                .join("\n");

            let output = converted_path(&path);
            fs::write(&output, csv).map_err(|e| FlowAiError::InvalidInput(e.to_string()))?;
            Ok(json!(output))
        }),
    )?;

    get_file_path.run(&run, Value::Null).await?;
    let detection = detect_file_type.run(&run, Value::Null).await?;
    println!("detection: {}", serde_json::to_string_pretty(&detection)?);

    let branch = match route_file.run(&run, Value::Null).await {
        Ok(branch) => branch,
        Err(err) if err.is_skip() => {
            println!("skipped: {}", err);
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let converted = match branch.as_str() {
        Some("translate_json") => translate_json.run(&run, Value::Null).await?,
        _ => translate_csv.run(&run, Value::Null).await?,
    };
    println!("converted file: {}", converted);
    Ok(())
}
