//! CLI commands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use crate::config::Config;
use crate::images::{EntityOutcome, ImageDownloader};
use crate::models::ListingEntry;
use crate::report;
use crate::scrape::{self, HttpFetcher};
use crate::table;

#[derive(Parser)]
#[command(name = "dexacquire")]
#[command(about = "Pokédex data acquisition and visualization pipeline")]
#[command(version)]
pub struct Cli {
    /// Directory for the table, images, progress file and reports
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Config file (defaults to ./dexacquire.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape the listing and every detail page into the CSV table
    Scrape {
        /// Limit number of entities (0 = all)
        #[arg(short, long, default_value = "0")]
        limit: usize,
    },

    /// Download artwork/sprite images for every listed entity
    Images {
        /// Limit number of entities (0 = all)
        #[arg(short, long, default_value = "0")]
        limit: usize,
    },

    /// Render all statistical figures from the persisted table
    Report,

    /// Run the full pipeline: scrape, images, report
    Run {
        /// Limit number of entities (0 = all)
        #[arg(short, long, default_value = "0")]
        limit: usize,
    },
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    match cli.command {
        Commands::Scrape { limit } => {
            let fetcher = HttpFetcher::new(&config);
            let entries = fetch_entries(&fetcher, &config, limit).await?;
            scrape_table(&fetcher, &config, &entries).await
        }
        Commands::Images { limit } => {
            let fetcher = HttpFetcher::new(&config);
            let entries = fetch_entries(&fetcher, &config, limit).await?;
            download_images(&fetcher, &config, &entries).await
        }
        Commands::Report => render_reports(&config),
        Commands::Run { limit } => {
            let fetcher = HttpFetcher::new(&config);
            let entries = fetch_entries(&fetcher, &config, limit).await?;
            scrape_table(&fetcher, &config, &entries).await?;
            download_images(&fetcher, &config, &entries).await?;
            render_reports(&config)
        }
    }
}

async fn fetch_entries(
    fetcher: &HttpFetcher,
    config: &Config,
    limit: usize,
) -> anyhow::Result<Vec<ListingEntry>> {
    let mut entries = scrape::fetch_listing(fetcher, config).await?;
    if limit > 0 {
        entries.truncate(limit);
    }
    println!(
        "{} {} entities listed",
        style("✓").green(),
        entries.len()
    );
    Ok(entries)
}

async fn scrape_table(
    fetcher: &HttpFetcher,
    config: &Config,
    entries: &[ListingEntry],
) -> anyhow::Result<()> {
    let bar = entity_bar(entries.len() as u64);
    let outcome = scrape::crawl_details(fetcher, entries, config.request_delay(), |entry| {
        bar.set_message(entry.display_name.clone());
        bar.inc(1);
    })
    .await;
    bar.finish_and_clear();

    for (entry, error) in &outcome.failures {
        println!(
            "  {} {}: {}",
            style("!").yellow(),
            entry.display_name,
            error
        );
    }

    let built = table::build(entries, &outcome.records);
    for mismatch in &built.mismatches {
        println!("  {} {}", style("!").yellow(), mismatch);
    }

    let table_path = config.table_path();
    let count = table::write_verified(&table_path, &built.rows)?;
    println!(
        "{} {} rows written to {} ({} fetch failures, {} join mismatches)",
        style("✓").green(),
        count,
        table_path.display(),
        outcome.failures.len(),
        built.mismatches.len()
    );
    Ok(())
}

async fn download_images(
    fetcher: &HttpFetcher,
    config: &Config,
    entries: &[ListingEntry],
) -> anyhow::Result<()> {
    let bar = entity_bar(entries.len() as u64);
    let mut downloader = ImageDownloader::new(fetcher, config)?;
    let summary = downloader
        .run(entries, |entry, outcome| {
            bar.set_message(match outcome {
                EntityOutcome::Skipped => format!("{} (skipped)", entry.display_name),
                _ => entry.display_name.clone(),
            });
            bar.inc(1);
        })
        .await?;
    bar.finish_and_clear();

    println!(
        "{} images: {} downloaded, {} skipped, {} without artwork, {} failed",
        style("✓").green(),
        summary.downloaded,
        summary.skipped,
        summary.no_image,
        summary.failed.len()
    );
    if !summary.failed.is_empty() {
        println!(
            "  {} failures logged to {}",
            style("!").yellow(),
            config.failure_log_path().display()
        );
    }
    Ok(())
}

fn render_reports(config: &Config) -> anyhow::Result<()> {
    let table_path = config.table_path();
    let rows = table::read(&table_path)?;
    if rows.is_empty() {
        warn!(path = %table_path.display(), "table is empty");
    }

    let summary = report::render_all(&rows, &config.reports_path(), &config.images_path())?;
    println!(
        "{} {} figures rendered to {}",
        style("✓").green(),
        summary.rendered.len(),
        config.reports_path().display()
    );
    for (name, error) in &summary.failures {
        println!("  {} {} failed: {}", style("!").yellow(), name, error);
    }
    if !summary.failures.is_empty() {
        anyhow::bail!("{} figure(s) failed to render", summary.failures.len());
    }
    Ok(())
}

fn entity_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    bar
}
