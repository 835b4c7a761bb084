//! Image download service.
//!
//! Walks the listing sequentially and drives each entity through a
//! small state machine: skip when already downloaded, otherwise fetch
//! the detail page, locate an artwork or sprite reference, download and
//! write the bytes. Transient failures are retried on a bounded budget;
//! exhaustion is logged and the run continues with the next entity.

use std::path::PathBuf;
use std::time::Duration;

use scraper::{Html, Selector};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{Error, FetchError};
use crate::models::{entity_key, image_filename, ListingEntry};
use crate::progress::ProgressLog;
use crate::scrape::{Fetcher, RetryPolicy};

/// Terminal state of one entity in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityOutcome {
    /// Already in the progress set or the file already exists; no
    /// network call was made.
    Skipped,
    /// Image bytes written and progress recorded.
    Downloaded,
    /// Page has no artwork or sprite reference. Recorded as done so it
    /// is never retried, but no file is written.
    NoImage,
    /// Every attempt failed; logged and the run moved on.
    Failed,
}

/// Counters and failure list for a whole run.
#[derive(Debug, Default)]
pub struct ImageRunSummary {
    pub downloaded: usize,
    pub skipped: usize,
    pub no_image: usize,
    pub failed: Vec<String>,
}

impl ImageRunSummary {
    pub fn total(&self) -> usize {
        self.downloaded + self.skipped + self.no_image + self.failed.len()
    }
}

pub struct ImageDownloader<'a> {
    fetcher: &'a dyn Fetcher,
    images_dir: PathBuf,
    failure_log: PathBuf,
    sprite_base_url: String,
    progress: ProgressLog,
    retry: RetryPolicy,
    entity_delay: Duration,
}

impl<'a> ImageDownloader<'a> {
    pub fn new(fetcher: &'a dyn Fetcher, config: &Config) -> Result<Self, Error> {
        Ok(Self {
            fetcher,
            images_dir: config.images_path(),
            failure_log: config.failure_log_path(),
            sprite_base_url: config.sprite_base_url.clone(),
            progress: ProgressLog::load(config.progress_path())?,
            retry: config.retry_policy(),
            entity_delay: config.request_delay(),
        })
    }

    /// Run the downloader over the whole listing. `observer` is called
    /// with each entity and its terminal state, for progress display.
    pub async fn run(
        &mut self,
        entries: &[ListingEntry],
        mut observer: impl FnMut(&ListingEntry, EntityOutcome),
    ) -> Result<ImageRunSummary, Error> {
        std::fs::create_dir_all(&self.images_dir)?;
        let mut summary = ImageRunSummary::default();

        for entry in entries {
            let key = entity_key(&entry.display_name);
            let path = self.images_dir.join(image_filename(&entry.display_name));

            if self.progress.contains(&key) || path.exists() {
                summary.skipped += 1;
                observer(entry, EntityOutcome::Skipped);
                continue;
            }

            let outcome = match self.retry.run(|| download_once(self.fetcher, entry, &self.sprite_base_url)).await {
                Ok(Some(bytes)) => {
                    std::fs::write(&path, &bytes)?;
                    self.progress.record(&key)?;
                    summary.downloaded += 1;
                    EntityOutcome::Downloaded
                }
                Ok(None) => {
                    info!(name = %entry.display_name, "no artwork or sprite found");
                    self.progress.record(&key)?;
                    summary.no_image += 1;
                    EntityOutcome::NoImage
                }
                Err(e) => {
                    warn!(
                        name = %entry.display_name,
                        attempts = self.retry.max_attempts(),
                        error = %e,
                        "giving up on image"
                    );
                    summary.failed.push(key);
                    EntityOutcome::Failed
                }
            };
            observer(entry, outcome);

            // Fixed pacing between entities regardless of outcome.
            tokio::time::sleep(self.entity_delay).await;
        }

        self.write_failure_log(&summary.failed)?;
        info!(
            downloaded = summary.downloaded,
            skipped = summary.skipped,
            no_image = summary.no_image,
            failed = summary.failed.len(),
            "image run finished"
        );
        Ok(summary)
    }

    /// One key per line; an empty run truncates any stale log.
    fn write_failure_log(&self, failed: &[String]) -> std::io::Result<()> {
        let mut contents = failed.join("\n");
        if !contents.is_empty() {
            contents.push('\n');
        }
        std::fs::write(&self.failure_log, contents)
    }
}

/// One attempt: fetch the detail page, find an image reference,
/// download its bytes. `Ok(None)` means the page genuinely has no
/// image — a terminal success, not retried.
async fn download_once(
    fetcher: &dyn Fetcher,
    entry: &ListingEntry,
    sprite_base_url: &str,
) -> Result<Option<Vec<u8>>, FetchError> {
    let html = fetcher.fetch_text(&entry.detail_url).await?;
    let Some(image_url) = find_image_url(&html, sprite_base_url) else {
        return Ok(None);
    };
    let bytes = fetcher.fetch_bytes(&image_url).await?;
    Ok(Some(bytes))
}

/// Locate the image for a detail page: official artwork first
/// (`a[rel="lightbox"]`), sprite fallback (`img[src*="/sprites/"]`).
/// Protocol-relative and root-relative sprite references are
/// normalized to absolute URLs.
pub fn find_image_url(html: &str, sprite_base_url: &str) -> Option<String> {
    let artwork_sel = Selector::parse(r#"a[rel="lightbox"]"#).expect("static selector");
    let sprite_sel = Selector::parse(r#"img[src*="/sprites/"]"#).expect("static selector");

    let document = Html::parse_document(html);

    if let Some(href) = document
        .select(&artwork_sel)
        .next()
        .and_then(|a| a.value().attr("href"))
    {
        return Some(href.to_string());
    }

    let src = document
        .select(&sprite_sel)
        .next()
        .and_then(|img| img.value().attr("src"))?;

    if let Some(rest) = src.strip_prefix("//") {
        Some(format!("https://{}", rest))
    } else if src.starts_with('/') {
        Some(format!("{}{}", sprite_base_url, src))
    } else {
        Some(src.to_string())
    }
}
