use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::{info, warn};

use trendlens::config::Config;
use trendlens::corpus::{self, store};
use trendlens::output::terminal;
use trendlens::pipeline::{acquire, analyze};
use trendlens::sources::arxiv::{ArxivClient, ARXIV_SOURCE};
use trendlens::topics::download;
use trendlens::topics::embeddings::SentenceEmbedder;
use trendlens::topics::traits::TextEmbedder;

/// Trendlens: temporal corpus analysis for research-paper topics.
///
/// Builds a month-by-month corpus of arXiv papers for a query, then reports
/// which title terms are growing and which topic clusters are emerging.
#[derive(Parser)]
#[command(name = "trendlens", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build (or rebuild) the corpus for a query
    Fetch {
        /// Search phrase, matched against titles and abstracts
        query: String,

        /// Calendar years to cover, ending this year (default: TRENDLENS_DEFAULT_YEARS)
        #[arg(long)]
        years: Option<u32>,

        /// Cap on papers kept per month (default: TRENDLENS_MAX_PER_MONTH)
        #[arg(long)]
        max_per_month: Option<usize>,
    },

    /// Analyze the corpus for a query, fetching it first if needed
    Analyze {
        /// Search phrase the corpus was built for
        query: String,

        /// Calendar years covered by the corpus (default: TRENDLENS_DEFAULT_YEARS)
        #[arg(long)]
        years: Option<u32>,

        /// Length of the term lists (default: 20)
        #[arg(long, default_value = "20")]
        top_n: usize,

        /// Number of topic clusters (default: TRENDLENS_CLUSTERS)
        #[arg(long)]
        clusters: Option<usize>,

        /// Distinct years treated as the recent period (default: 1)
        #[arg(long, default_value = "1")]
        window: usize,

        /// Print the report as JSON instead of the terminal summary
        #[arg(long)]
        json: bool,

        /// Rebuild the corpus even if one exists
        #[arg(long)]
        refetch: bool,
    },

    /// Download the sentence embedding model (~90 MB)
    DownloadModel,

    /// Show corpus files and model status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Logs go to stderr so `analyze --json` output stays clean
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("trendlens=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load().context("Invalid configuration")?;

    match cli.command {
        Commands::Fetch {
            query,
            years,
            max_per_month,
        } => {
            let years = years.unwrap_or(config.default_years);
            let max_per_month = max_per_month.unwrap_or(config.max_per_month);
            let report = fetch_corpus(&config, &query, years, max_per_month, true).await?;
            terminal::display_acquisition(&report);
        }

        Commands::Analyze {
            query,
            years,
            top_n,
            clusters,
            window,
            json,
            refetch,
        } => {
            let years = years.unwrap_or(config.default_years);
            let path = corpus::corpus_path(&config.data_dir, ARXIV_SOURCE, &query, years);

            if refetch || !path.exists() {
                if !json {
                    println!("No corpus at {}, fetching first...", path.display());
                }
                let report =
                    fetch_corpus(&config, &query, years, config.max_per_month, !json).await?;
                if !json {
                    terminal::display_acquisition(&report);
                }
            }

            let papers: Arc<[trendlens::corpus::models::Paper]> = store::load(&path)
                .with_context(|| format!("Failed to load corpus {}", path.display()))?
                .into();

            let embedder = load_embedder(&config)?;

            let options = analyze::AnalysisOptions {
                top_n,
                window,
                clusters: clusters.unwrap_or(config.clusters),
                growth: config.growth,
                emergence: config.emergence,
            };

            let report = analyze::run(
                embedder.as_ref().map(|e| e as &dyn TextEmbedder),
                papers,
                &options,
            )
            .await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                terminal::display_analysis(&query, &report);
            }
        }

        Commands::DownloadModel => {
            println!("Downloading model to {}", config.model_dir.display());
            download::download_model(&config.model_dir).await?;
            println!("\n{}", "Model ready.".green());
        }

        Commands::Status => {
            trendlens::status::show(&config.data_dir, &config.model_dir)?;
        }
    }

    Ok(())
}

/// Run acquisition against arXiv for `query`, replacing any existing corpus.
async fn fetch_corpus(
    config: &Config,
    query: &str,
    years: u32,
    max_per_month: usize,
    show_progress: bool,
) -> Result<acquire::AcquisitionReport> {
    let client = ArxivClient::new(&config.arxiv_url, config.client.clone())
        .context("Failed to build arXiv client")?;
    let path = corpus::corpus_path(&config.data_dir, ARXIV_SOURCE, query, years);

    let options = acquire::AcquireOptions {
        years,
        max_per_month,
        page_size: config.page_size,
        today: chrono::Utc::now().date_naive(),
        show_progress,
    };

    info!(query = query, years = years, "Fetching corpus");
    acquire::run(&client, query, &path, &options).await
}

/// Load the embedding model once, if it has been downloaded.
fn load_embedder(config: &Config) -> Result<Option<SentenceEmbedder>> {
    if !download::embedding_files_present(&config.model_dir) {
        warn!(
            model_dir = %config.model_dir.display(),
            "Embedding model not found, topics will be skipped. Run `trendlens download-model`."
        );
        return Ok(None);
    }

    let dir = download::embedding_model_dir(&config.model_dir);
    let embedder = SentenceEmbedder::load(&dir)?;
    Ok(Some(embedder))
}
