//! Timeout configuration for catalog operations.

use std::future::Future;
use std::time::Duration;

/// Timeout configuration for a catalog operation.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeoutConfig {
    /// Budget for a single attempt.
    pub attempt: Duration,
    /// Total budget including retries and backoff.
    pub total: Duration,
}

impl TimeoutConfig {
    /// Create a new timeout configuration.
    pub fn new(attempt: Duration, total: Duration) -> Self {
        Self {
            attempt: attempt.min(total),
            total,
        }
    }

    /// Create from a single total timeout.
    pub fn from_total(total: Duration) -> Self {
        Self {
            attempt: total,
            total,
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self::from_total(Duration::from_millis(1000))
    }
}

/// Await `future` for at most `limit`; `None` when the limit passed first.
#[cfg(not(target_arch = "wasm32"))]
pub(crate) async fn within<F: Future>(limit: Duration, future: F) -> Option<F::Output> {
    tokio::time::timeout(limit, future).await.ok()
}

/// spin-sdk gives guests no timer future to race against, so the limit is
/// left to the host's outbound request timeout.
// TODO: enforce `limit` once spin-sdk exposes a sleep pollable to guests.
#[cfg(target_arch = "wasm32")]
pub(crate) async fn within<F: Future>(_limit: Duration, future: F) -> Option<F::Output> {
    Some(future.await)
}

/// Wait out a retry backoff.
#[cfg(not(target_arch = "wasm32"))]
pub(crate) async fn pause(delay: Duration) {
    tokio::time::sleep(delay).await;
}

/// Retries go out immediately on Spin.
#[cfg(target_arch = "wasm32")]
pub(crate) async fn pause(_delay: Duration) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attempt_never_exceeds_total() {
        let config = TimeoutConfig::new(Duration::from_secs(5), Duration::from_secs(2));
        assert_eq!(config.attempt, Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_within_limit() {
        let fast = within(Duration::from_millis(100), async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            7
        });
        assert_eq!(fast.await, Some(7));

        let slow = within(Duration::from_millis(100), tokio::time::sleep(Duration::from_secs(1)));
        assert_eq!(slow.await, None);
    }
}
