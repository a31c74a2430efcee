use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docvec::{
    config::Config, context::AppContext, logging, models::SearchResult, query::DEFAULT_LIMIT,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "docvec")]
#[command(about = "Index HTML and CSV documents into a vector store and search them")]
#[command(version)]
struct Cli {
    /// Settings file (defaults to $DOCVEC_CONFIG, config/settings.toml, ~/.config/docvec/settings.toml)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Index a directory (defaults to index.data_dir)
    Index {
        #[arg(value_name = "DIR")]
        dir: Option<PathBuf>,
        /// Show a progress bar
        #[arg(long)]
        progress: bool,
    },
    /// Search indexed documents
    Search {
        #[arg(value_name = "QUERY")]
        query: String,
        /// Number of results
        #[arg(short = 'n', long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,
    },
    /// Show collection status
    Status,
}

fn print_results(query: &str, results: &[SearchResult]) {
    println!("Search Results for {:?}:", query);
    if results.is_empty() {
        println!("  (no results)");
        return;
    }
    for (rank, result) in results.iter().enumerate() {
        println!("{:>2}. [{:.4}] {}", rank + 1, result.score, result.source);
        println!("    {}", result.content);
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load().context("Failed to load configuration")?,
    };

    let log_guard = logging::init_logging(&config.index.log_dir)?;
    info!("Logging to {}", log_guard.log_file.display());
    let mut ctx = AppContext::from_config(config).await?;

    match cli.command {
        Some(Commands::Index { dir, progress }) => {
            let dir = dir.unwrap_or_else(|| ctx.config.index.data_dir.clone());
            ctx.indexer.set_progress(progress);

            let report = ctx.indexer.index_directory(&dir).await?;
            println!("{}", report);
            for (path, error) in report.failures() {
                println!("  failed: {}: {}", path.display(), error);
            }
        }
        Some(Commands::Search { query, limit }) => {
            let results = ctx.query.search(&query, limit).await;
            print_results(&query, &results);
        }
        Some(Commands::Status) => {
            let collection = ctx.indexer.collection();
            println!("Collection:  {}", collection.name());
            println!("Documents:   {}", ctx.store.count(collection).await);
            println!("Metric:      {}", ctx.store.metric());
            println!("Embeddings:  {}", ctx.store.embedder_name());
            println!("Persist dir: {}", ctx.config.index.persist_dir.display());
        }
        None => {
            let query = ctx.config.search.default_query.clone();
            let results = ctx.query.search(&query, ctx.config.search.default_limit).await;
            print_results(&query, &results);
        }
    }

    Ok(())
}
