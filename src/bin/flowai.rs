use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use flowai::cli::{dedup_records, parse_vector, read_json};
use flowai::utils::LoggingConfig;
use flowai::{cosine_similarity, provider_info, DedupConfig, DedupStrategy};

#[derive(Parser)]
#[command(name = "flowai", version, about = "FlowAI CLI", author)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Group near-duplicate records by embedding similarity
    Dedup {
        /// JSON array of strings
        #[arg(long)]
        records: PathBuf,
        /// JSON array of vectors, index-aligned with the records
        #[arg(long)]
        vectors: Option<PathBuf>,
        /// JSON dedup config (`threshold`, `strategy`)
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        threshold: Option<f64>,
        #[arg(long, value_enum)]
        strategy: Option<StrategyArg>,
        /// Dimension of the offline embedder used when no vectors are given
        #[arg(long, default_value_t = 384)]
        dim: usize,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Cosine similarity of two JSON vectors
    Similarity {
        #[arg(long)]
        a: String,
        #[arg(long)]
        b: String,
    },
    /// Show package metadata and the task operators it provides
    Providers,
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    Canonical,
    Connected,
}

impl From<StrategyArg> for DedupStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Canonical => DedupStrategy::Canonical,
            StrategyArg::Connected => DedupStrategy::Connected,
        }
    }
}

fn main() -> anyhow::Result<()> {
    LoggingConfig::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Dedup {
            records,
            vectors,
            config,
            threshold,
            strategy,
            dim,
            output,
        } => handle_dedup(records, vectors, config, threshold, strategy, dim, output)?,
        Command::Similarity { a, b } => handle_similarity(&a, &b)?,
        Command::Providers => handle_providers()?,
    }
    Ok(())
}

fn handle_dedup(
    records: PathBuf,
    vectors: Option<PathBuf>,
    config: Option<PathBuf>,
    threshold: Option<f64>,
    strategy: Option<StrategyArg>,
    dim: usize,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut settings = match config {
        Some(path) => DedupConfig::from_path(&path)?,
        None => DedupConfig::default(),
    };
    if let Some(threshold) = threshold {
        settings.threshold = threshold;
    }
    if let Some(strategy) = strategy {
        settings.strategy = strategy.into();
    }

    let records: Vec<String> = read_json(&records)?;
    let vectors: Option<Vec<Vec<f32>>> = match vectors {
        Some(path) => Some(read_json(&path)?),
        None => None,
    };

    let groups = dedup_records(&records, vectors, &settings, dim)?;
    tracing::info!(records = records.len(), groups = groups.len(), "dedup finished");

    let content = serde_json::to_string_pretty(&groups)?;
    if let Some(path) = output {
        fs::write(&path, content)?;
        println!("Groups written to `{}`", path.display());
    } else {
        println!("{content}");
    }
    Ok(())
}

fn handle_similarity(a: &str, b: &str) -> anyhow::Result<()> {
    let score = cosine_similarity(&parse_vector(a)?, &parse_vector(b)?)?;
    println!("{score:.6}");
    Ok(())
}

fn handle_providers() -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&provider_info())?);
    Ok(())
}
