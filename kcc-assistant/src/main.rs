//! KCC Query Assistant Entry Point
//!
//! Loads the KCC knowledge base once, then answers farming questions either
//! from `--query` or line by line from stdin.

mod shell;

use std::path::PathBuf;

use clap::Parser;
use kcc_rag::{
    load_resources, IndexBackend, LoaderOptions, QueryConfig, ResourcePaths, SharedResources,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "kcc-assistant")]
#[command(about = "Answer farming questions from the KCC dataset, falling back to web search")]
#[command(version)]
struct Args {
    /// Directory holding faiss_index.index and text_data.pkl
    #[arg(long, short)]
    data_dir: Option<PathBuf>,

    /// Answer a single question and exit
    #[arg(long, short)]
    query: Option<String>,

    /// Nearest neighbours to retrieve
    #[arg(long, default_value_t = 3)]
    top_k: usize,

    /// Largest best-match distance answered from the dataset
    #[arg(long, default_value_t = 1.0)]
    threshold: f32,

    /// Web results shown on fallback
    #[arg(long, default_value_t = 2)]
    max_web_results: usize,

    /// sentence-transformers model the index was built with
    #[arg(long, default_value = kcc_rag::embedding::DEFAULT_MODEL)]
    model: String,

    /// Directory for downloaded model files
    #[arg(long)]
    model_cache: Option<PathBuf>,

    /// Search an in-memory HNSW graph instead of the exact flat index
    #[arg(long)]
    hnsw: bool,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kcc_assistant=info,kcc_rag=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(args) {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = QueryConfig::default()
        .with_top_k(args.top_k)
        .with_distance_threshold(args.threshold)
        .with_max_web_results(args.max_web_results);
    config.validate()?;

    let options = LoaderOptions {
        model_name: args.model,
        model_cache_dir: args.model_cache,
        backend: if args.hnsw {
            IndexBackend::Hnsw
        } else {
            IndexBackend::Flat
        },
        ..LoaderOptions::default()
    };

    let shared = SharedResources::new();
    let paths = ResourcePaths::discover(args.data_dir.as_deref())?;

    tracing::info!("Loading KCC resources");
    if let Err(e) = shared.load_with(|| load_resources(&paths, &options)) {
        anyhow::bail!("Failed to load AI resources, refusing queries: {}", e);
    }

    let style = if args.json {
        shell::OutputStyle::Json
    } else {
        shell::OutputStyle::Text
    };

    match args.query {
        Some(query) => {
            let output = shell::respond(&shared, &query, &config, style)?;
            println!("{}", output);
            Ok(())
        }
        None => shell::interactive(&shared, &config, style),
    }
}
