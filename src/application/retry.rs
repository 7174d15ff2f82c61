use std::{
    future::Future,
    time::{Duration, Instant},
};

use anyhow::Result;
use tracing::{info, warn};

use crate::{config::config_model::Retry, domain::errors::is_retryable};

/// Fixed-delay retry for datastore work. Only failures that
/// [`is_retryable`] accepts are retried; everything else is returned after
/// the first attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn backoff(&self) -> Duration {
        self.backoff
    }

    /// Runs `work` until it succeeds, fails with a non-retryable error, or
    /// `max_attempts` attempts have been made. `work` receives the 1-based
    /// attempt number. The last error is returned unchanged.
    pub async fn execute<T, F, Fut>(&self, operation: &str, mut work: F) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;

        loop {
            attempt += 1;
            let start = Instant::now();
            info!(
                operation,
                attempt,
                max_attempts = self.max_attempts,
                "datastore attempt started"
            );

            match work(attempt).await {
                Ok(value) => {
                    let elapsed_ms = start.elapsed().as_millis() as u64;
                    info!(operation, attempt, elapsed_ms, "datastore attempt succeeded");
                    return Ok(value);
                }
                Err(err) => {
                    let retryable = is_retryable(&err);
                    if !retryable || attempt >= self.max_attempts {
                        warn!(
                            operation,
                            attempt,
                            retryable,
                            error = %err,
                            "datastore attempt failed, giving up"
                        );
                        return Err(err);
                    }

                    warn!(
                        operation,
                        attempt,
                        backoff_ms = self.backoff.as_millis() as u64,
                        error = %err,
                        "datastore attempt failed, retrying"
                    );
                    tokio::time::sleep(self.backoff).await;
                }
            }
        }
    }
}

impl From<&Retry> for RetryPolicy {
    fn from(config: &Retry) -> Self {
        Self::new(config.max_attempts, Duration::from_millis(config.backoff_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::{DataAccessError, TransientKind};

    fn policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, Duration::ZERO)
    }

    fn connection_lost() -> anyhow::Error {
        DataAccessError::transient(TransientKind::Connection, "connection reset by peer")
    }

    #[tokio::test]
    async fn returns_first_success_without_retrying() {
        let mut calls = 0;

        let value = policy(3)
            .execute("fetch", |_| {
                calls += 1;
                async { Ok(42) }
            })
            .await
            .unwrap();

        assert_eq!(value, 42);
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn recovers_after_transient_failures() {
        for failures in 0..3u32 {
            let mut calls = 0;

            let value = policy(3)
                .execute("save", |attempt| {
                    calls += 1;
                    async move {
                        if attempt <= failures {
                            Err(connection_lost())
                        } else {
                            Ok(attempt)
                        }
                    }
                })
                .await
                .unwrap();

            assert_eq!(calls, failures + 1);
            assert_eq!(value, failures + 1);
        }
    }

    #[tokio::test]
    async fn exhausts_attempts_and_returns_last_error() {
        let mut calls = 0;

        let err = policy(4)
            .execute("save", |attempt| {
                calls += 1;
                async move {
                    Err::<(), _>(DataAccessError::transient(
                        TransientKind::Transaction,
                        format!("attempt {attempt} rolled back"),
                    ))
                }
            })
            .await
            .unwrap_err();

        assert_eq!(calls, 4);
        assert!(is_retryable(&err));
        assert!(err.to_string().contains("attempt 4 rolled back"));
    }

    #[tokio::test]
    async fn non_transient_failure_is_not_retried() {
        let mut calls = 0;

        let err = policy(5)
            .execute("save", |_| {
                calls += 1;
                async { Err::<(), _>(DataAccessError::persistence("ctx", "unique violation")) }
            })
            .await
            .unwrap_err();

        assert_eq!(calls, 1);
        assert!(!is_retryable(&err));
    }

    #[tokio::test]
    async fn zero_attempts_still_runs_once() {
        let mut calls = 0;

        let result = policy(0)
            .execute("fetch", |_| {
                calls += 1;
                async { Err::<(), _>(connection_lost()) }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn waits_the_fixed_backoff_between_attempts() {
        let backoff = Duration::from_millis(20);
        let policy = RetryPolicy::new(3, backoff);
        let start = Instant::now();

        let result = policy
            .execute("fetch", |_| async { Err::<(), _>(connection_lost()) })
            .await;

        assert!(result.is_err());
        assert!(start.elapsed() >= backoff * 2);
    }

    #[test]
    fn builds_from_config() {
        let policy = RetryPolicy::from(&Retry {
            max_attempts: 5,
            backoff_ms: 250,
        });

        assert_eq!(policy.max_attempts(), 5);
        assert_eq!(policy.backoff(), Duration::from_millis(250));
    }
}
