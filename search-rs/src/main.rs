//! search-rs: command-line site search
//!
//! Runs one search session against the configured backend and prints the
//! rendered results.

use clap::Parser;
use search_rs::{SearchApiClient, SearchConfig, SearchDriver, SearchView};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "search-rs", version, about = "Search the site from the command line")]
struct Cli {
    /// Search term; an empty or missing term performs no request
    term: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the backend base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Override the page size
    #[arg(short, long)]
    limit: Option<usize>,

    /// Number of pages to load (first page plus load-more requests)
    #[arg(short, long, default_value_t = 1)]
    pages: usize,

    /// Print the session as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = SearchConfig::load(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url {
        config.backend.base_url = base_url;
    }
    if let Some(limit) = cli.limit {
        config.session.page_size = limit;
    }
    config.validate()?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("search_rs={}", config.logging.level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting search-rs v{}", env!("CARGO_PKG_VERSION"));

    let client = SearchApiClient::from_config(&config.backend)?;
    let mut driver = SearchDriver::from_config(Arc::new(client), &config.session)?;

    let term = cli.term.unwrap_or_default();
    driver.search(&term).await;

    for _ in 1..cli.pages {
        if !driver.load_next_page().await {
            break;
        }
    }

    let session = driver.session();
    if let Some(message) = session.error_message() {
        warn!("Search ended with an error: {}", message);
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
    } else {
        print!("{}", SearchView::from_session(session).render_text());
    }

    Ok(())
}
