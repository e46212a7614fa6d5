// Main entry point for the leadharvest binary

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use email_extract::EmailSet;
use fetch_proxy::FetchProxyClient;
use serp_crawler::{ChromiumSession, CrawlRequest, PaginatedCrawler, SearchEngine};

#[derive(Parser)]
#[command(name = "leadharvest")]
#[command(about = "Discover pages via SERP crawling and harvest contact emails")]
#[command(version)]
struct Cli {
    /// Search query
    #[arg(short, long)]
    query: String,

    /// Search engine (google, bing)
    #[arg(short, long, default_value = "google")]
    engine: String,

    /// Maximum result pages to visit
    #[arg(short, long, default_value_t = 10)]
    max_pages: u32,

    /// Write the deduplicated URL list to this file after every page
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Output file for harvested emails
    #[arg(short, long, default_value = "emails.txt")]
    output: PathBuf,

    /// Concurrent proxy fetches
    #[arg(long, default_value_t = 8)]
    concurrency: usize,

    /// Scrape-proxy base URL (falls back to SCRAPE_PROXY_URL)
    #[arg(long)]
    proxy_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,serp_crawler=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Resolve the engine before touching the browser; bad names fail fast.
    let engine = SearchEngine::from_name(&cli.engine)?;

    let proxy_url = cli
        .proxy_url
        .or_else(|| std::env::var("SCRAPE_PROXY_URL").ok())
        .context("no scrape proxy configured (use --proxy-url or SCRAPE_PROXY_URL)")?;
    let mut proxy = FetchProxyClient::new(proxy_url);
    if let Ok(key) = std::env::var("SCRAPE_PROXY_API_KEY") {
        proxy = proxy.with_api_key(key);
    }

    let mut request = CrawlRequest::new(&cli.query, engine).with_max_pages(cli.max_pages);
    if let Some(path) = &cli.snapshot {
        request = request.with_snapshot(path);
    }

    tracing::info!(query = %cli.query, engine = %engine, max_pages = cli.max_pages, "starting crawl");

    let session = ChromiumSession::launch()
        .await
        .context("failed to launch headless browser")?;
    let report = PaginatedCrawler::new(session).crawl(&request).await;

    // Surface a crawl error instead of swallowing it; partial results are
    // still worth fetching when any URLs came back.
    if let Some(error) = report.error {
        if report.urls.is_empty() {
            return Err(anyhow::Error::new(error).context("crawl failed before collecting any URLs"));
        }
        tracing::warn!(
            error = %error,
            urls = report.urls.len(),
            "crawl ended early, continuing with partial URL list"
        );
    }
    if report.urls.is_empty() {
        bail!("crawl completed but found no result URLs");
    }

    tracing::info!(
        urls = report.urls.len(),
        pages_visited = report.pages_visited,
        "crawl finished, fetching page content"
    );

    let outcomes = proxy.fetch_all(&report.urls, cli.concurrency).await;

    let mut emails = EmailSet::new();
    let mut fetch_failures = 0usize;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(body) => emails.harvest(body),
            Err(_) => fetch_failures += 1,
        }
    }

    tracing::info!(
        emails = emails.len(),
        fetched = outcomes.len() - fetch_failures,
        fetch_failures,
        "email extraction complete"
    );

    let mut body = emails.into_vec().join("\n");
    if !body.is_empty() {
        body.push('\n');
    }
    tokio::fs::write(&cli.output, body)
        .await
        .with_context(|| format!("failed to write {}", cli.output.display()))?;

    tracing::info!(output = %cli.output.display(), "done");
    Ok(())
}
