//! Bounded retry with a fixed inter-attempt delay.
//!
//! Shared by the listing fetch and the image stage. No jitter and no
//! adaptive backoff: the host is throttled by the fixed crawl delay, so
//! retries only need to ride out transient failures.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        // A zero budget would never run the operation.
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Run `op` until it succeeds or the attempt budget is exhausted.
    /// The last error is returned on exhaustion.
    pub async fn run<T, E, F, Fut>(&self, mut op: F) -> Result<T, E>
    where
        E: std::fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.max_attempts => {
                    debug!(attempt, max = self.max_attempts, error = %e, "attempt failed, retrying");
                    tokio::time::sleep(self.delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
