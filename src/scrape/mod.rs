//! Scraping pipeline: index listing, per-entity detail pages.
//!
//! The crawl is deliberately sequential — one request at a time with a
//! fixed inter-request delay. Network latency dominates; there is
//! nothing here worth parallelizing against a rate-limited host.

mod detail;
mod fetcher;
mod listing;
mod retry;

pub use detail::{fetch_detail_page, parse_detail};
pub use fetcher::{Fetcher, HttpFetcher};
pub use listing::{fetch_listing, parse_listing};
pub use retry::RetryPolicy;

use std::time::Duration;

use tracing::{info, warn};

use crate::error::Error;
use crate::models::{ListingEntry, PokemonRecord};

/// Result of crawling every listed detail page.
#[derive(Debug, Default)]
pub struct CrawlOutcome {
    /// Records in listing order, one per successfully parsed page.
    pub records: Vec<PokemonRecord>,
    /// Entries whose page could not be fetched or parsed.
    pub failures: Vec<(ListingEntry, Error)>,
}

/// Fetch and parse the detail page of every listing entry, in order.
///
/// One bad page does not abort the crawl: the failure is recorded and
/// the loop moves on. `observer` is called before each entity, for
/// progress display.
pub async fn crawl_details(
    fetcher: &dyn Fetcher,
    entries: &[ListingEntry],
    delay: Duration,
    mut observer: impl FnMut(&ListingEntry),
) -> CrawlOutcome {
    let mut outcome = CrawlOutcome::default();

    for entry in entries {
        observer(entry);

        match fetch_detail_page(fetcher, &entry.detail_url).await {
            Ok(html) => match parse_detail(&html, &entry.detail_url) {
                Ok(record) => outcome.records.push(record),
                Err(e) => {
                    warn!(name = %entry.display_name, url = %entry.detail_url, error = %e,
                        "failed to parse detail page");
                    outcome.failures.push((entry.clone(), e.into()));
                }
            },
            Err(e) => {
                warn!(name = %entry.display_name, url = %entry.detail_url, error = %e,
                    "failed to fetch detail page");
                outcome.failures.push((entry.clone(), e.into()));
            }
        }

        tokio::time::sleep(delay).await;
    }

    info!(
        records = outcome.records.len(),
        failures = outcome.failures.len(),
        "detail crawl finished"
    );
    outcome
}
