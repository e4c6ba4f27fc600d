//! # Retry Wrapper
//!
//! Exponential-backoff retry for database mutations.
//!
//! ## Backoff Schedule
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  attempt 1 fails  → sleep 2s                                │
//! │  attempt 2 fails  → sleep 4s                                │
//! │  attempt 3 fails  → propagate the last error                │
//! │                                                             │
//! │  (max_attempts = 3; delay = 2^attempt seconds)              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every failure is retried identically: no jitter, no circuit breaker, no
//! retryable/fatal classification. A uniqueness violation therefore burns
//! all three attempts before surfacing — a known inefficiency, kept until
//! failure classification is worth its complexity.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Default number of attempts for mutating operations.
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;

/// Runs `op`, retrying on failure up to `max_attempts` total attempts with
/// exponential backoff between them. The final failure propagates unchanged.
///
/// `max_attempts` of zero is treated as one attempt.
///
/// ## Example
/// ```rust,no_run
/// use acme_db::retry::{with_retry, DEFAULT_RETRY_ATTEMPTS};
///
/// # async fn demo() -> Result<(), String> {
/// let value = with_retry(DEFAULT_RETRY_ATTEMPTS, || async {
///     Ok::<_, String>(42)
/// })
/// .await?;
/// assert_eq!(value, 42);
/// # Ok(())
/// # }
/// ```
pub async fn with_retry<T, E, F, Fut>(max_attempts: u32, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= max_attempts => {
                warn!(attempt, error = %e, "operation failed; attempts exhausted");
                return Err(e);
            }
            Err(e) => {
                let delay = Duration::from_secs(1u64 << attempt);
                warn!(
                    attempt,
                    delay_secs = delay.as_secs(),
                    error = %e,
                    "operation failed; backing off"
                );
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    // start_paused: tokio's clock auto-advances through the backoff sleeps,
    // so these tests finish in microseconds.

    #[tokio::test(start_paused = true)]
    async fn test_success_first_try() {
        let calls = AtomicU32::new(0);

        let result: Result<u32, String> = with_retry(3, || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(7)
        })
        .await;

        assert_eq!(result, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_on_last_attempt() {
        let calls = AtomicU32::new(0);

        let result: Result<&str, String> = with_retry(3, || async {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n < 3 {
                Err(format!("transient failure {}", n))
            } else {
                Ok("recovered")
            }
        })
        .await;

        assert_eq!(result, Ok("recovered"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_propagates_last_error() {
        let calls = AtomicU32::new(0);

        let result: Result<(), String> = with_retry(3, || async {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            Err(format!("failure {}", n))
        })
        .await;

        assert_eq!(result, Err("failure 3".to_string()));
        // Invoked exactly max_attempts times.
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_is_exponential() {
        let start = tokio::time::Instant::now();

        let _: Result<(), String> =
            with_retry(3, || async { Err("always fails".to_string()) }).await;

        // 2^1 + 2^2 = 6 seconds of (virtual) backoff.
        assert_eq!(start.elapsed().as_secs(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_attempts_still_runs_once() {
        let calls = AtomicU32::new(0);

        let result: Result<u32, String> = with_retry(0, || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(1)
        })
        .await;

        assert_eq!(result, Ok(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
