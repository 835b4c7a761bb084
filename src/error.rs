//! Error taxonomy for the acquisition pipeline.
//!
//! The library surfaces typed errors (`FetchError`, `ParseError`, `JoinError`);
//! the CLI boundary collapses them into `anyhow` for reporting.

use thiserror::Error;

/// Network-level failure: the request itself failed or the server
/// answered with a non-success status.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request for {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("failed to read body of {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// A detail or index page did not have the structure we expect.
///
/// Extraction is all-or-nothing: any missing element fails the whole
/// record rather than producing a partially populated one.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("missing {field} on {url}")]
    MissingElement { field: &'static str, url: String },

    #[error("could not parse {field} value {value:?} on {url}")]
    InvalidNumber {
        field: &'static str,
        value: String,
        url: String,
    },

    #[error("no listing entries found on {url}")]
    NoListingEntries { url: String },

    #[error("could not resolve link {value:?}")]
    InvalidUrl { value: String },
}

/// A listing row whose detail page header does not match its listing
/// name, so it has no row in the final table. Collected and reported,
/// never silently dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("listing entry {display_name:?} ({detail_url}) has no matching detail record")]
pub struct JoinError {
    pub display_name: String,
    pub detail_url: String,
}

/// Unified library error.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("table error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
