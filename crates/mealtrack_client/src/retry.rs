use rand::{RngExt, rng};
use std::time::Duration;

/// Retry policy for idempotent store reads: exponential backoff with full
/// jitter.
#[derive(Clone, Debug)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(150),
        }
    }
}

impl RetryPolicy {
    /// Run `f` until it succeeds or the retry budget is spent; the last
    /// error is returned unmodified.
    pub async fn retry_async<F, Fut, T, E>(&self, mut f: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
    {
        let mut attempt = 0u32;
        loop {
            match f().await {
                Ok(v) => return Ok(v),
                Err(e) => {
                    attempt += 1;
                    if attempt > self.max_retries {
                        return Err(e);
                    }
                    let ceiling = self.base_delay * (1u32 << attempt);
                    let jitter = rng().random_range(0..ceiling.as_millis().max(1) as u64);
                    tokio::time::sleep(Duration::from_millis(jitter)).await;
                }
            }
        }
    }
}
