//! Bounded retry for remote operations.

use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::PublishError;

/// Fixed number of attempts with a fixed pause between them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

/// Returned when every attempt failed
#[derive(Debug)]
pub struct RetryExhausted {
    pub attempts: u32,
    pub last_error: PublishError,
}

impl RetryPolicy {
    /// `max_attempts` is clamped to at least one attempt
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        RetryPolicy {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `op` until it succeeds or the attempt budget is spent.
    ///
    /// `op` receives the 1-based attempt number. The pause is only taken
    /// between attempts, never after the last one.
    pub fn run<T, F>(&self, label: &str, mut op: F) -> Result<T, RetryExhausted>
    where
        F: FnMut(u32) -> crate::error::Result<T>,
    {
        let mut attempt = 1;
        loop {
            debug!(%label, attempt, max_attempts = self.max_attempts, "attempting");
            match op(attempt) {
                Ok(value) => return Ok(value),
                Err(e) if attempt >= self.max_attempts => {
                    warn!(%label, attempt, error = %e, "giving up");
                    return Err(RetryExhausted {
                        attempts: attempt,
                        last_error: e,
                    });
                }
                Err(e) => {
                    warn!(%label, attempt, error = %e, "attempt failed, retrying");
                    if !self.delay.is_zero() {
                        thread::sleep(self.delay);
                    }
                    attempt += 1;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::new(3, Duration::from_secs(2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, Duration::ZERO)
    }

    #[test]
    fn test_succeeds_first_time() {
        let mut calls = 0;
        let result = instant(3).run("push", |_| {
            calls += 1;
            Ok::<_, PublishError>(42)
        });
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_succeeds_after_failures() {
        let mut seen = Vec::new();
        let result = instant(3).run("push", |attempt| {
            seen.push(attempt);
            if attempt < 3 {
                Err(PublishError::remote("timeout"))
            } else {
                Ok("done")
            }
        });
        assert_eq!(result.unwrap(), "done");
        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[test]
    fn test_exhausts_after_max_attempts() {
        let mut calls = 0;
        let result: Result<(), _> = instant(3).run("push", |attempt| {
            calls += 1;
            Err(PublishError::remote(format!("failure {}", attempt)))
        });
        let exhausted = result.unwrap_err();
        assert_eq!(calls, 3);
        assert_eq!(exhausted.attempts, 3);
        assert!(exhausted.last_error.to_string().contains("failure 3"));
    }

    #[test]
    fn test_zero_attempts_still_tries_once() {
        let policy = instant(0);
        assert_eq!(policy.max_attempts(), 1);
        let mut calls = 0;
        let _ = policy.run("push", |_| {
            calls += 1;
            Err::<(), _>(PublishError::remote("down"))
        });
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 3);
        assert_eq!(policy.delay(), Duration::from_secs(2));
    }
}
