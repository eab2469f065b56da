//! Bounded retry with a backoff range per failure kind.

use async_trait::async_trait;
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Why a single upstream attempt failed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, TLS, timeout or body read failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// HTTP 403 from the anti-bot layer.
    #[error("blocked by upstream (HTTP 403)")]
    Blocked,

    /// Any other non-2xx status.
    #[error("upstream answered HTTP {0}")]
    Status(u16),

    /// The body could not be parsed as JSON.
    #[error("malformed response body (HTTP {status}): {snippet}")]
    Malformed { status: u16, snippet: String },
}

/// Randomized wait, uniformly drawn from `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    pub min: Duration,
    pub max: Duration,
}

impl Backoff {
    pub const fn from_millis(min: u64, max: u64) -> Self {
        Self { min: Duration::from_millis(min), max: Duration::from_millis(max) }
    }

    pub const fn from_secs(min: u64, max: u64) -> Self {
        Self::from_millis(min * 1000, max * 1000)
    }

    /// Picks a wait inside the range.
    pub fn pick(&self) -> Duration {
        let min = self.min.as_millis() as u64;
        let max = (self.max.as_millis() as u64).max(min);
        Duration::from_millis(rand::rng().random_range(min..=max))
    }

    pub fn contains(&self, wait: Duration) -> bool {
        wait >= self.min && wait <= self.max
    }
}

pub const MAX_ATTEMPTS: u32 = 3;
pub const TRANSPORT_BACKOFF: Backoff = Backoff::from_secs(2, 6);
pub const BLOCKED_BACKOFF: Backoff = Backoff::from_secs(20, 60);
pub const MALFORMED_BACKOFF: Backoff = Backoff::from_secs(5, 10);

/// Attempt cap and per-cause waits for one fetch call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub transport: Backoff,
    pub blocked: Backoff,
    pub malformed: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            transport: TRANSPORT_BACKOFF,
            blocked: BLOCKED_BACKOFF,
            malformed: MALFORMED_BACKOFF,
        }
    }
}

impl RetryPolicy {
    /// Returns the backoff range for a failure.
    pub fn backoff_for(&self, error: &FetchError) -> Backoff {
        match error {
            FetchError::Transport(_) | FetchError::Status(_) => self.transport,
            FetchError::Blocked => self.blocked,
            FetchError::Malformed { .. } => self.malformed,
        }
    }
}

/// Sleeps between attempts. Swapped out in tests.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real sleeper backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Runs `op` until it succeeds or the policy's attempts are spent.
///
/// `op` receives the 1-based attempt number. No wait follows the final
/// attempt; its error is returned as-is.
pub async fn retry<T, F, Fut>(
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
    mut op: F,
) -> Result<T, FetchError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let attempts = policy.max_attempts.max(1);

    for attempt in 1..attempts {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) => {
                let wait = policy.backoff_for(&e).pick();
                warn!("Attempt {}/{} failed: {}. Retrying in {:?}", attempt, attempts, e, wait);
                sleeper.sleep(wait).await;
            }
        }
    }

    debug!("Final attempt {}/{}", attempts, attempts);
    op(attempts).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSleeper {
        waits: Mutex<Vec<Duration>>,
    }

    impl RecordingSleeper {
        fn waits(&self) -> Vec<Duration> {
            self.waits.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.waits.lock().unwrap().push(duration);
        }
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.transport, Backoff::from_secs(2, 6));
        assert_eq!(policy.blocked, Backoff::from_secs(20, 60));
        assert_eq!(policy.malformed, Backoff::from_secs(5, 10));
    }

    #[test]
    fn test_backoff_pick_stays_in_range() {
        let backoff = Backoff::from_secs(2, 6);
        for _ in 0..200 {
            assert!(backoff.contains(backoff.pick()));
        }

        let fixed = Backoff::from_millis(250, 250);
        assert_eq!(fixed.pick(), Duration::from_millis(250));
    }

    #[test]
    fn test_backoff_for_each_kind() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_for(&FetchError::Transport("reset".into())), TRANSPORT_BACKOFF);
        assert_eq!(policy.backoff_for(&FetchError::Blocked), BLOCKED_BACKOFF);
        assert_eq!(policy.backoff_for(&FetchError::Status(429)), TRANSPORT_BACKOFF);
        let malformed = FetchError::Malformed { status: 200, snippet: "<html>".into() };
        assert_eq!(policy.backoff_for(&malformed), MALFORMED_BACKOFF);
    }

    #[tokio::test]
    async fn test_success_first_attempt_never_sleeps() {
        let sleeper = RecordingSleeper::default();
        let result = retry(&RetryPolicy::default(), &sleeper, |_| async { Ok(42) }).await;

        assert_eq!(result.unwrap(), 42);
        assert!(sleeper.waits().is_empty());
    }

    #[tokio::test]
    async fn test_repeated_block_stops_after_three_attempts() {
        let sleeper = RecordingSleeper::default();
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = retry(&RetryPolicy::default(), &sleeper, |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(FetchError::Blocked) }
        })
        .await;

        assert!(matches!(result, Err(FetchError::Blocked)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        let waits = sleeper.waits();
        assert_eq!(waits.len(), 2);
        assert!(waits.iter().all(|w| BLOCKED_BACKOFF.contains(*w)));
    }

    #[tokio::test]
    async fn test_waits_follow_failure_kind() {
        let sleeper = RecordingSleeper::default();

        let result = retry(&RetryPolicy::default(), &sleeper, |attempt| async move {
            match attempt {
                1 => Err(FetchError::Transport("connection reset".into())),
                2 => Err(FetchError::Malformed { status: 200, snippet: "oops".into() }),
                _ => Ok(attempt),
            }
        })
        .await;

        assert_eq!(result.unwrap(), 3);
        let waits = sleeper.waits();
        assert_eq!(waits.len(), 2);
        assert!(TRANSPORT_BACKOFF.contains(waits[0]));
        assert!(MALFORMED_BACKOFF.contains(waits[1]));
    }

    #[tokio::test]
    async fn test_zero_attempts_still_tries_once() {
        let sleeper = RecordingSleeper::default();
        let policy = RetryPolicy { max_attempts: 0, ..RetryPolicy::default() };
        let calls = AtomicU32::new(0);

        let result = retry(&policy, &sleeper, |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok("done") }
        })
        .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(FetchError::Blocked.to_string(), "blocked by upstream (HTTP 403)");
        assert_eq!(FetchError::Status(500).to_string(), "upstream answered HTTP 500");
        let err = FetchError::Malformed { status: 502, snippet: "Bad gateway".into() };
        assert!(err.to_string().contains("HTTP 502"));
        assert!(err.to_string().contains("Bad gateway"));
    }
}
