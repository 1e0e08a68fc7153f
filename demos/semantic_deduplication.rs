use std::sync::Arc;

use flowai::utils::LoggingConfig;
use flowai::{
    callable, expand, Deduplicator, EmbedTask, FnTask, HashingEmbedder, Operator, TaskContext,
};
use serde_json::{json, Value};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    LoggingConfig::init();

    let run = TaskContext::new("semantic_deduplication");

    let get_records = FnTask::new(
        "get_records",
        callable(|_, _| {
            Ok(json!([
                "The quick brown fox jumps over the lazy dog",
                "the quick brown fox jumps over the lazy dog!",
                "A fast brown fox leaps over a sleepy dog",
                "The weather is beautiful today",
                "It is a beautiful day today",
                "An unrelated sentence about databases",
            ]))
        }),
    )?;
    let records = get_records.run(&run, Value::Null).await?;

    // Swap in `ProviderSettings::embedding_provider` for a hosted model.
    let embed_record = EmbedTask::new(
        "embed_record",
        Arc::new(HashingEmbedder::default()),
        callable(|text, _| Ok(text.clone())),
    )?;
    let texts = records.as_array().cloned().unwrap_or_default();
    expand(&embed_record, texts, &run).await?;

    let deduplicate = flowai::DedupTask::new("deduplicate", Deduplicator::new(0.9)?)?
        .from_upstream("get_records", "embed_record");
    let groups = deduplicate.run(&run, Value::Null).await?;

    println!("{}", serde_json::to_string_pretty(&groups)?);
    Ok(())
}
