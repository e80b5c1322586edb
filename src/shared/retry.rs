//! Retry with exponential backoff
//!
//! Used for writes where a single transient failure should not be fatal,
//! such as the revenue-history upsert after a room or tariff change.

use std::future::Future;
use std::time::Duration;
use tracing::{info, warn};

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first one).
    pub max_attempts: u32,
    /// Initial delay between retries.
    pub initial_delay: Duration,
    /// Multiplier applied to the delay after each retry.
    pub backoff_multiplier: f64,
    /// Maximum delay between retries (cap).
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(200),
            backoff_multiplier: 2.0,
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryConfig {
    /// Single attempt, no waiting.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Wait before retry number `retry` (1-based), capped at `max_delay`.
    pub fn delay_before_retry(&self, retry: u32) -> Duration {
        let exponent = i32::try_from(retry.saturating_sub(1)).unwrap_or(i32::MAX);
        let secs = self.initial_delay.as_secs_f64() * self.backoff_multiplier.powi(exponent);
        // `min` also maps NaN and infinity onto the cap
        Duration::from_secs_f64(secs.min(self.max_delay.as_secs_f64()).max(0.0))
    }
}

/// Run `operation` until it succeeds, fails permanently or runs out of
/// attempts, sleeping with exponential backoff between transient failures.
///
/// ```ignore
/// let saved = retry_with_backoff(
///     RetryConfig::default(),
///     || repos.revenue().upsert(record.clone()),
///     DomainError::is_transient,
///     "upsert_revenue_record",
/// ).await;
/// ```
pub async fn retry_with_backoff<F, Fut, T, E>(
    config: RetryConfig,
    mut operation: F,
    should_retry: impl Fn(&E) -> bool,
    operation_name: &str,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        let err = match operation().await {
            Ok(value) if attempt == 1 => return Ok(value),
            Ok(value) => {
                info!(operation = operation_name, attempt, "Succeeded after retry");
                return Ok(value);
            }
            Err(err) => err,
        };

        let transient = should_retry(&err);
        if !transient || attempt >= max_attempts {
            warn!(
                operation = operation_name,
                attempt,
                transient,
                error = %err,
                "Giving up"
            );
            return Err(err);
        }

        let wait = config.delay_before_retry(attempt);
        warn!(
            operation = operation_name,
            attempt,
            max_attempts,
            error = %err,
            retry_in_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
            "Transient failure, retrying"
        );
        tokio::time::sleep(wait).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    use crate::shared::errors::DomainError;

    fn fast(max_attempts: u32) -> RetryConfig {
        RetryConfig {
            max_attempts,
            initial_delay: Duration::from_millis(1),
            backoff_multiplier: 2.0,
            max_delay: Duration::from_millis(4),
        }
    }

    #[tokio::test]
    async fn retries_transient_errors_until_success() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result = retry_with_backoff(
            fast(3),
            move || async move {
                if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(DomainError::Persistence("busy".into()))
                } else {
                    Ok(42)
                }
            },
            DomainError::is_transient,
            "test",
        )
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn permanent_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: Result<(), _> = retry_with_backoff(
            fast(5),
            move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(DomainError::Validation("nope".into()))
            },
            DomainError::is_transient,
            "test",
        )
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: Result<(), _> = retry_with_backoff(
            fast(2),
            move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(DomainError::Persistence("down".into()))
            },
            DomainError::is_transient,
            "test",
        )
        .await;

        assert!(matches!(result, Err(DomainError::Persistence(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn delay_doubles_up_to_the_cap() {
        let config = RetryConfig::default();
        assert_eq!(config.delay_before_retry(1), Duration::from_millis(200));
        assert_eq!(config.delay_before_retry(2), Duration::from_millis(400));
        assert_eq!(config.delay_before_retry(3), Duration::from_millis(800));
        assert_eq!(config.delay_before_retry(10), Duration::from_secs(5));
        assert_eq!(config.delay_before_retry(u32::MAX), Duration::from_secs(5));
    }
}
