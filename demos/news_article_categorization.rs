use flowai::utils::LoggingConfig;
use flowai::{
    callable, expand, FlowAiError, FnTask, LlmTask, Operator, ProviderSettings, Schema,
    TaskContext,
};
use serde_json::{json, Value};

const SYSTEM_PROMPT: &str = "You are a precise news desk editor. Classify the article into one \
category from this set: politics, technology, sports, finance, entertainment, other.

Provide:
- category: one of the allowed labels
- rationale: one or two sentences explaining the choice

Base your decision strictly on the provided title and body.";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    LoggingConfig::init();

    let model = ProviderSettings::from_env()?.chat_client()?;
    let run = TaskContext::new("news_article_categorization");

    let get_articles = FnTask::new(
        "get_articles",
        callable(|_, _| {
            Ok(json!([
                {
                    "title": "Central bank signals potential rate cut in Q4",
                    "body": "The central bank hinted that rate reductions may come later this year amid cooling inflation."
                },
                {
                    "title": "Championship final ends in dramatic penalty shootout",
                    "body": "Fans were treated to a nail-biting finish as the underdogs clinched the title on penalties."
                },
                {
                    "title": "Tech giant unveils new AI chip for datacenters",
                    "body": "The chip promises improved inference throughput and energy efficiency for enterprise workloads."
                },
                {
                    "title": "Blockbuster sequel tops weekend box office",
                    "body": "The franchise returned to theaters with record-breaking ticket sales across major markets."
                },
                {
                    "title": "Senate advances bipartisan cybersecurity bill",
                    "body": "Lawmakers moved forward with legislation aiming to bolster national cyber defenses."
                }
            ]))
        }),
    )?;

    let article_category = Schema::object([
        (
            "category",
            Schema::enumeration([
                "politics",
                "technology",
                "sports",
                "finance",
                "entertainment",
                "other",
            ]),
        ),
        ("rationale", Schema::string()),
    ])
    .with_name("ArticleCategory");

    let categorize_article = LlmTask::builder("categorize_article", model)
        .system_prompt(SYSTEM_PROMPT)
        .output_schema(article_category)
        .callable(callable(|article, _| {
            if article.is_null() {
                return Err(FlowAiError::Skipped("No article provided".to_string()));
            }
            Ok(json!(format!(
                "Title: {}\nBody: {}",
                article["title"].as_str().unwrap_or_default(),
                article["body"].as_str().unwrap_or_default()
            )))
        }))
        .build()?;

    let articles = get_articles.run(&run, Value::Null).await?;
    let categories = expand(
        &categorize_article,
        articles.as_array().cloned().unwrap_or_default(),
        &run,
    )
    .await?;

    println!("{}", serde_json::to_string_pretty(&categories)?);
    Ok(())
}
