//! Exponential backoff around blocking filesystem calls.

use std::io::{self, ErrorKind};
use std::path::Path;
use std::time::Duration;

use pentasync_core::RetryConfig;

/// How often and how patiently a failing filesystem call is repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_millis(config.base_delay_ms),
        }
    }
}

/// Errors worth another attempt. Everything else fails immediately.
pub fn is_transient(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::Interrupted | ErrorKind::WouldBlock | ErrorKind::TimedOut
    )
}

impl RetryPolicy {
    /// Single attempt, no waiting.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
        }
    }

    /// Delay before retry number `attempt + 1`: `base * 2^attempt`,
    /// saturating at [`Duration::MAX`].
    pub fn delay(&self, attempt: u32) -> Duration {
        self.base_delay
            .checked_mul(2_u32.pow(attempt.min(10)))
            .unwrap_or(Duration::MAX)
    }

    /// Run `op`, retrying transient failures. `what` and `path` only feed
    /// the log line.
    pub fn run<T>(
        &self,
        what: &str,
        path: &Path,
        mut op: impl FnMut() -> io::Result<T>,
    ) -> io::Result<T> {
        let mut attempt = 0;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(err) if is_transient(&err) && attempt + 1 < self.max_attempts => {
                    let delay = self.delay(attempt);
                    tracing::warn!(
                        "{what} {} failed ({err}); retrying in {delay:?}",
                        path.display()
                    );
                    std::thread::sleep(delay);
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::cell::Cell;

    fn fast(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(1),
        }
    }

    #[rstest]
    #[case(0, 50)]
    #[case(1, 100)]
    #[case(2, 200)]
    #[case(3, 400)]
    fn delay_doubles(#[case] attempt: u32, #[case] millis: u64) {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay(attempt), Duration::from_millis(millis));
    }

    #[test]
    fn huge_base_delay_saturates() {
        let policy = RetryPolicy::from(&RetryConfig {
            max_attempts: 3,
            base_delay_ms: u64::MAX,
        });
        assert_eq!(policy.delay(0), Duration::from_millis(u64::MAX));
        assert_eq!(policy.delay(4), Duration::MAX);
    }

    #[test]
    fn transient_errors_are_retried_until_success() {
        let calls = Cell::new(0);
        let result = fast(3).run("write", Path::new("x"), || {
            calls.set(calls.get() + 1);
            if calls.get() < 3 {
                Err(io::Error::from(ErrorKind::Interrupted))
            } else {
                Ok(42)
            }
        });
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn attempts_are_bounded() {
        let calls = Cell::new(0);
        let err = fast(2)
            .run("rename", Path::new("x"), || -> io::Result<()> {
                calls.set(calls.get() + 1);
                Err(io::Error::from(ErrorKind::TimedOut))
            })
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TimedOut);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn permanent_errors_fail_fast() {
        let calls = Cell::new(0);
        let err = fast(5)
            .run("delete", Path::new("x"), || -> io::Result<()> {
                calls.set(calls.get() + 1);
                Err(io::Error::from(ErrorKind::PermissionDenied))
            })
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
        assert_eq!(calls.get(), 1);
    }
}
