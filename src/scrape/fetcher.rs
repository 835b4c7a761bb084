//! Page fetching behind a trait so the pipeline can run against an
//! in-memory fake in tests.

use std::time::Duration;

use async_trait::async_trait;

use crate::config::Config;
use crate::error::FetchError;

/// Synchronous-in-spirit page fetcher: one request per call, body fully
/// consumed before returning.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch a page and return its markup.
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError>;

    /// Fetch a binary resource (image bytes).
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Real HTTP fetcher over reqwest.
///
/// A fixed delay is applied after every request; together with the
/// sequential crawl loop this bounds the request rate.
pub struct HttpFetcher {
    client: reqwest::Client,
    request_delay: Duration,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.request_timeout())
            .gzip(true)
            .brotli(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            request_delay: config.request_delay(),
        }
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self.get(url).await?;
        let body = response.text().await.map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })?;
        tokio::time::sleep(self.request_delay).await;
        Ok(body)
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.get(url).await?;
        let body = response.bytes().await.map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })?;
        tokio::time::sleep(self.request_delay).await;
        Ok(body.to_vec())
    }
}
