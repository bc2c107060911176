//! Bounded retry for flaky remote commands

use tracing::warn;

use super::Clock;
use crate::config::RetryPolicy;
use crate::vcs::VcsError;

/// Run `operation` up to `policy.attempts` times.
///
/// Only transient errors (see [`VcsError::is_transient`]) are retried; the
/// clock sleeps `policy.wait_seconds` between attempts but not after the
/// last one. The last error is returned once attempts run out.
pub fn execute_with_retries<T, F>(
    policy: &RetryPolicy,
    clock: &dyn Clock,
    mut operation: F,
) -> Result<T, VcsError>
where
    F: FnMut() -> Result<T, VcsError>,
{
    let attempts = policy.attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation() {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < attempts => {
                warn!(
                    attempt,
                    attempts,
                    error = %err,
                    "Attempt {} of {} failed, retrying in {} s",
                    attempt,
                    attempts,
                    policy.wait_seconds
                );
                clock.sleep(policy.wait());
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    use chrono::{DateTime, Utc};

    #[derive(Default)]
    struct RecordingClock {
        sleeps: Mutex<Vec<Duration>>,
    }

    impl Clock for RecordingClock {
        fn now(&self) -> DateTime<Utc> {
            DateTime::<Utc>::UNIX_EPOCH
        }

        fn sleep(&self, duration: Duration) {
            self.sleeps.lock().unwrap().push(duration);
        }
    }

    fn flaky() -> VcsError {
        VcsError::ExternalToolFailure {
            command: "vault history".to_string(),
            exit_code: 1,
            stderr: "connection reset".to_string(),
        }
    }

    #[test]
    fn test_always_failing_runs_exactly_n_times() {
        let clock = RecordingClock::default();
        let policy = RetryPolicy::default().with_attempts(3).with_wait_seconds(2);
        let mut calls = 0;

        let result: Result<(), VcsError> = execute_with_retries(&policy, &clock, || {
            calls += 1;
            Err(flaky())
        });

        assert!(matches!(result, Err(VcsError::ExternalToolFailure { .. })));
        assert_eq!(calls, 3);
        assert_eq!(
            *clock.sleeps.lock().unwrap(),
            vec![Duration::from_secs(2), Duration::from_secs(2)]
        );
    }

    #[test]
    fn test_succeeds_after_transient_failure() {
        let clock = RecordingClock::default();
        let mut calls = 0;

        let result = execute_with_retries(&RetryPolicy::default(), &clock, || {
            calls += 1;
            if calls < 3 { Err(flaky()) } else { Ok("history") }
        });

        assert_eq!(result.unwrap(), "history");
        assert_eq!(calls, 3);
        assert_eq!(clock.sleeps.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_parse_failure_is_not_retried() {
        let clock = RecordingClock::default();
        let mut calls = 0;

        let result: Result<(), VcsError> = execute_with_retries(&RetryPolicy::default(), &clock, || {
            calls += 1;
            Err(VcsError::ParseFailure("garbage".to_string()))
        });

        assert!(matches!(result, Err(VcsError::ParseFailure(_))));
        assert_eq!(calls, 1);
        assert!(clock.sleeps.lock().unwrap().is_empty());
    }

    #[test]
    fn test_zero_attempts_runs_once() {
        let clock = RecordingClock::default();
        let policy = RetryPolicy::default().with_attempts(0);
        let mut calls = 0;

        let _: Result<(), VcsError> = execute_with_retries(&policy, &clock, || {
            calls += 1;
            Err(flaky())
        });

        assert_eq!(calls, 1);
    }

    #[test]
    #[tracing_test::traced_test]
    fn test_each_retry_is_logged() {
        let clock = RecordingClock::default();
        let policy = RetryPolicy::default().with_attempts(3).with_wait_seconds(5);

        let _: Result<(), VcsError> = execute_with_retries(&policy, &clock, || Err(flaky()));

        assert!(logs_contain("Attempt 1 of 3 failed, retrying in 5 s"));
        assert!(logs_contain("Attempt 2 of 3 failed, retrying in 5 s"));
        assert!(!logs_contain("Attempt 3 of 3"));
    }
}
