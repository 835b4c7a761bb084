//! Index listing: every entity name and its detail-page link.

use scraper::{Html, Selector};
use tracing::info;
use url::Url;

use crate::config::Config;
use crate::error::{Error, ParseError};
use crate::models::ListingEntry;

use super::Fetcher;

/// Fetch the index page and extract the deduplicated listing.
///
/// The fetch goes through the same bounded retry policy as the image
/// stage, so a transient index failure does not kill a run outright.
pub async fn fetch_listing(fetcher: &dyn Fetcher, config: &Config) -> Result<Vec<ListingEntry>, Error> {
    let retry = config.retry_policy();
    let html = retry.run(|| fetcher.fetch_text(&config.index_url)).await?;
    let entries = parse_listing(&html, &config.base_url, &config.index_url)?;
    info!(count = entries.len(), "listing fetched");
    Ok(entries)
}

/// Extract `(display_name, detail_url)` pairs from index markup.
///
/// Deduplicated by display name, first occurrence wins, order preserved.
/// Relative links are resolved against `base_url`.
pub fn parse_listing(html: &str, base_url: &str, index_url: &str) -> Result<Vec<ListingEntry>, ParseError> {
    let anchor_sel = Selector::parse("a.ent-name").expect("static selector");
    let base = Url::parse(base_url).map_err(|_| ParseError::InvalidUrl {
        value: base_url.to_string(),
    })?;

    let document = Html::parse_document(html);
    let mut entries: Vec<ListingEntry> = Vec::new();
    let mut seen: std::collections::HashSet<String> = std::collections::HashSet::new();

    for anchor in document.select(&anchor_sel) {
        let name: String = anchor.text().collect::<String>().trim().to_string();
        if name.is_empty() {
            continue;
        }
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let detail_url = base
            .join(href)
            .map_err(|_| ParseError::InvalidUrl {
                value: href.to_string(),
            })?
            .to_string();

        if seen.insert(name.clone()) {
            entries.push(ListingEntry {
                display_name: name,
                detail_url,
            });
        }
    }

    if entries.is_empty() {
        return Err(ParseError::NoListingEntries {
            url: index_url.to_string(),
        });
    }

    Ok(entries)
}
