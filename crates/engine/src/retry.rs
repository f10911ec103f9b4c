//! Retry loop honoring upstream `Retry-After` hints.
//!
//! Every pipeline stage that calls a flaky generation provider shares
//! this convention: when a retryable failure carries a `Retry-After`
//! hint, wait out the computed delay before the next attempt. The
//! delay policy itself lives in [`fable_core::backoff`]; this module
//! owns the loop and its cancellation behavior.
//!
//! The command dispatcher deliberately does not use this: failed
//! user-facing updates surface immediately, and retrying them is the
//! client's decision.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use fable_core::backoff::compute_delay;

use crate::client::EngineError;

/// Errors that can tell the retry loop how to treat them.
pub trait RetryHint {
    /// Whether another attempt could plausibly succeed.
    fn is_retryable(&self) -> bool;

    /// The upstream `Retry-After` hint, verbatim, if one was supplied.
    fn retry_after(&self) -> Option<&str>;
}

impl RetryHint for EngineError {
    fn is_retryable(&self) -> bool {
        match self {
            // Rate limiting and transient unavailability.
            EngineError::Api { status, .. } => matches!(*status, 429 | 502 | 503 | 504),
            EngineError::Request(_) => true,
            EngineError::NotFound(_) | EngineError::Rejected(_) => false,
        }
    }

    fn retry_after(&self) -> Option<&str> {
        match self {
            EngineError::Api { retry_after, .. } => retry_after.as_deref(),
            _ => None,
        }
    }
}

/// Tunable parameters for [`retry_with_hint`].
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay used when the upstream supplied no (usable) hint.
    pub default_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            default_delay: Duration::from_secs(1),
        }
    }
}

/// Run `op` until it succeeds, retrying hint-aware failures.
///
/// Non-retryable errors and the final attempt's error are returned
/// as-is. Cancellation during a wait returns the error that triggered
/// the wait.
pub async fn retry_with_hint<T, E, F, Fut>(
    policy: &RetryPolicy,
    cancel: &CancellationToken,
    mut op: F,
) -> Result<T, E>
where
    E: RetryHint + std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
{
    let mut attempt = 0u32;

    loop {
        attempt += 1;

        let error = match op().await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        if !error.is_retryable() || attempt >= policy.max_attempts {
            return Err(error);
        }

        let delay = compute_delay(error.retry_after(), policy.default_delay);
        tracing::warn!(
            attempt,
            delay_ms = delay.as_millis() as u64,
            error = %error,
            "Upstream call failed, retrying after hinted delay",
        );

        tokio::select! {
            _ = cancel.cancelled() => return Err(error),
            _ = tokio::time::sleep(delay) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    #[derive(Debug)]
    struct FakeError {
        retryable: bool,
        hint: Option<String>,
    }

    impl std::fmt::Display for FakeError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("fake upstream error")
        }
    }

    impl RetryHint for FakeError {
        fn is_retryable(&self) -> bool {
            self.retryable
        }
        fn retry_after(&self) -> Option<&str> {
            self.hint.as_deref()
        }
    }

    fn policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            default_delay: Duration::from_millis(500),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_after_hinted_wait() {
        let calls = AtomicU32::new(0);
        let start = Instant::now();

        let result: Result<u32, FakeError> =
            retry_with_hint(&policy(), &CancellationToken::new(), || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n == 0 {
                        Err(FakeError {
                            retryable: true,
                            hint: Some("2".to_string()),
                        })
                    } else {
                        Ok(7)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        // The "2" seconds hint was honored (auto-advanced under paused time).
        assert!(Instant::now() - start >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_at_the_attempt_cap() {
        let calls = AtomicU32::new(0);

        let result: Result<(), FakeError> =
            retry_with_hint(&policy(), &CancellationToken::new(), || {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(FakeError {
                        retryable: true,
                        hint: None,
                    })
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn non_retryable_errors_return_immediately() {
        let calls = AtomicU32::new(0);

        let result: Result<(), FakeError> =
            retry_with_hint(&policy(), &CancellationToken::new(), || {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(FakeError {
                        retryable: false,
                        hint: None,
                    })
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_stops_the_wait() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result: Result<(), FakeError> = retry_with_hint(&policy(), &cancel, || async {
            Err(FakeError {
                retryable: true,
                hint: Some("3600".to_string()),
            })
        })
        .await;

        assert!(result.is_err());
    }

    #[test]
    fn engine_api_rate_limit_is_retryable_with_hint() {
        let err = EngineError::Api {
            status: 429,
            retry_after: Some("2".to_string()),
            body: "rate limited".to_string(),
        };
        assert!(err.is_retryable());
        assert_eq!(err.retry_after(), Some("2"));
    }

    #[test]
    fn rejected_update_is_not_retryable() {
        let err = EngineError::Rejected("bad update".to_string());
        assert!(!err.is_retryable());
    }
}
