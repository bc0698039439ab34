//! Retry policy and a generic retry-with-policy combinator.
//!
//! Attempts run strictly one after another. Delays go through
//! `tokio::time::sleep`, so tests drive them with a paused clock.

use crate::config::SearchConfig;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Delay schedule between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Same delay before every retry
    Fixed(Duration),

    /// `base * 2^retry`, capped
    Exponential { base: Duration, cap: Duration },
}

impl Backoff {
    /// Delay before the given retry (0 = the delay before the second attempt).
    pub fn delay(&self, retry: u32) -> Duration {
        match *self {
            Backoff::Fixed(delay) => delay,
            Backoff::Exponential { base, cap } => {
                let factor = 2u32.saturating_pow(retry);
                base.saturating_mul(factor).min(cap)
            }
        }
    }
}

/// How many times to try and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first; 0 is treated as 1
    pub max_attempts: u32,
    pub backoff: Backoff,
}

impl RetryPolicy {
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::Fixed(delay),
        }
    }

    fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::fixed(3, Duration::from_millis(2_000))
    }
}

impl From<&SearchConfig> for RetryPolicy {
    fn from(config: &SearchConfig) -> Self {
        Self::fixed(
            config.max_attempts,
            Duration::from_millis(config.retry_delay_ms),
        )
    }
}

/// A successful value and how many retries it took.
#[derive(Debug, Clone, PartialEq)]
pub struct Retried<T> {
    pub value: T,
    pub retries: u32,
}

/// Every attempt failed; carries the last error.
#[derive(Debug)]
pub struct RetryExhausted<E> {
    pub attempts: u32,
    pub last_error: E,
}

/// Run `op` until it succeeds or the policy runs out of attempts.
///
/// `op` receives the 1-based attempt index. Failed attempts are logged at
/// warn with `label`.
pub async fn retry_with_policy<T, E, F, Fut>(
    policy: &RetryPolicy,
    label: &str,
    mut op: F,
) -> Result<Retried<T>, RetryExhausted<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let max_attempts = policy.attempts();
    let mut attempt = 1;

    loop {
        match op(attempt).await {
            Ok(value) => {
                return Ok(Retried {
                    value,
                    retries: attempt - 1,
                })
            }
            Err(e) => {
                tracing::warn!("{label} attempt {attempt}/{max_attempts} failed: {e}");
                if attempt >= max_attempts {
                    return Err(RetryExhausted {
                        attempts: attempt,
                        last_error: e,
                    });
                }
                let delay = policy.backoff.delay(attempt - 1);
                tracing::debug!("Retrying {label} in {delay:?}");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    #[test]
    fn test_fixed_backoff_is_constant() {
        let backoff = Backoff::Fixed(Duration::from_millis(2000));
        assert_eq!(backoff.delay(0), Duration::from_millis(2000));
        assert_eq!(backoff.delay(5), Duration::from_millis(2000));
    }

    #[test]
    fn test_backoff_exponential() {
        let backoff = Backoff::Exponential {
            base: Duration::from_millis(1000),
            cap: Duration::from_secs(30),
        };
        assert_eq!(backoff.delay(0), Duration::from_millis(1000));
        assert_eq!(backoff.delay(1), Duration::from_millis(2000));
        assert_eq!(backoff.delay(2), Duration::from_millis(4000));
        assert_eq!(backoff.delay(3), Duration::from_millis(8000));
    }

    #[test]
    fn test_backoff_capped_at_30s() {
        let backoff = Backoff::Exponential {
            base: Duration::from_millis(1000),
            cap: Duration::from_secs(30),
        };
        assert_eq!(backoff.delay(10), Duration::from_secs(30));
        assert_eq!(backoff.delay(40), Duration::from_secs(30));
    }

    #[test]
    fn test_policy_from_search_config() {
        let policy = RetryPolicy::from(&SearchConfig::default());
        assert_eq!(policy, RetryPolicy::default());
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.backoff, Backoff::Fixed(Duration::from_millis(2000)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_try_success_has_no_retries_or_delay() {
        let start = Instant::now();
        let result: Result<Retried<&str>, RetryExhausted<String>> =
            retry_with_policy(&RetryPolicy::default(), "test", |_| async { Ok("done") }).await;

        let retried = result.unwrap();
        assert_eq!(retried.value, "done");
        assert_eq!(retried.retries, 0);
        assert!(start.elapsed() < Duration::from_millis(2000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_on_last_attempt_after_two_delays() {
        let calls = AtomicU32::new(0);
        let start = Instant::now();

        let result = retry_with_policy(&RetryPolicy::default(), "test", |attempt| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt < 3 {
                    Err(format!("transient {attempt}"))
                } else {
                    Ok(attempt)
                }
            }
        })
        .await;

        let retried = result.unwrap();
        assert_eq!(retried.value, 3);
        assert_eq!(retried.retries, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(start.elapsed() >= Duration::from_millis(4000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_returns_last_error() {
        let calls = AtomicU32::new(0);
        let start = Instant::now();

        let result: Result<Retried<()>, _> =
            retry_with_policy(&RetryPolicy::default(), "test", |attempt| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move { Err(format!("failure {attempt}")) }
            })
            .await;

        let exhausted = result.unwrap_err();
        assert_eq!(exhausted.attempts, 3);
        assert_eq!(exhausted.last_error, "failure 3");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // Two delays, none after the final attempt
        assert!(start.elapsed() >= Duration::from_millis(4000));
        assert!(start.elapsed() < Duration::from_millis(6000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_max_attempts_still_tries_once() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::fixed(0, Duration::from_millis(2000));

        let result: Result<Retried<()>, _> = retry_with_policy(&policy, "test", |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err("nope") }
        })
        .await;

        assert_eq!(result.unwrap_err().attempts, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
