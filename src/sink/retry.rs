//! Bounded constant-backoff retry for persistence operations.

use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::error::{Error, Result};

/// How often and how patiently a sink retries a failed write.
///
/// The backoff is constant: every retry waits the same amount. The default
/// matches the zone program's guidance of two retries three minutes apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Pause before each retry.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            backoff: Duration::from_secs(180),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff: Duration) -> Self {
        Self {
            max_retries,
            backoff,
        }
    }

    /// Total attempts, counting the first one.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }
}

/// Run `op` until it succeeds or the retry budget is spent.
///
/// Cancellation is honored before the first attempt and during every
/// backoff pause; a [`Error::Cancelled`] from `op` itself passes through
/// without consuming a retry. Once the budget is spent the last error is
/// returned as-is.
pub async fn run_with_retry<T, F, Fut>(
    policy: RetryPolicy,
    cancel: &CancellationToken,
    mut op: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 1;
    loop {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_cancelled() => return Err(e),
            Err(e) => {
                if attempt > policy.max_retries {
                    return Err(e);
                }
                warn!(
                    "Attempt {attempt}/{} failed, retrying in {:?}: {e}",
                    policy.max_attempts(),
                    policy.backoff
                );
                tokio::select! {
                    _ = cancel.cancelled() => return Err(Error::Cancelled),
                    _ = tokio::time::sleep(policy.backoff) => {}
                }
                attempt += 1;
            }
        }
    }
}
