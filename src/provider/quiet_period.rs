//! Quiet period (debounce) before a change set triggers a build

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{info, warn};

use super::SourceControl;
use crate::model::{IntegrationResult, Modification};
use crate::vcs::VcsError;
use crate::vcs::constants::quiet_period::MIN_SLEEP_MS;

/// Source of "now" and of blocking delays.
///
/// Quiet period and retry sleep through this so tests can substitute a fake
/// clock that advances instantly.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
    fn sleep(&self, duration: Duration);
}

/// Wall clock backed by `std::thread::sleep`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Holds back a change set until no modification is newer than
/// `modification_delay` relative to the integration being considered.
///
/// The loop blocks the calling thread for as long as commits keep arriving.
pub struct QuietPeriod {
    clock: Box<dyn Clock>,
    modification_delay: TimeDelta,
}

impl std::fmt::Debug for QuietPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuietPeriod")
            .field("modification_delay", &self.modification_delay)
            .finish_non_exhaustive()
    }
}

impl QuietPeriod {
    /// Quiet period with a delay of 0 (disabled)
    pub fn new(clock: impl Clock + 'static) -> Self {
        Self {
            clock: Box::new(clock),
            modification_delay: TimeDelta::zero(),
        }
    }

    pub fn with_modification_delay(mut self, seconds: u64) -> Self {
        self.modification_delay = i64::try_from(seconds)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX);
        self
    }

    pub fn modification_delay(&self) -> TimeDelta {
        self.modification_delay
    }

    /// Poll `source_control` until the change set in `[from, to]` settles.
    ///
    /// Each time the newest modification is still inside the delay window,
    /// sleep for the remainder, move `to` to the clock's new "now", and poll
    /// again.
    pub fn get_modifications(
        &self,
        source_control: &mut dyn SourceControl,
        from: &IntegrationResult,
        to: &IntegrationResult,
    ) -> Result<Vec<Modification>, VcsError> {
        let mut to = to.clone();
        let mut modifications = source_control.get_modifications(from, &to)?;

        if self.modification_delay.is_zero() {
            return Ok(modifications);
        }

        while let Some(wait) = self.time_to_wait(&modifications, to.start_time) {
            info!(
                seconds = wait.as_secs_f64(),
                delay_seconds = self.modification_delay.num_seconds(),
                "modifications are still inside the quiet period, sleeping"
            );
            self.clock.sleep(wait);
            to = to.at(self.clock.now());
            modifications = source_control.get_modifications(from, &to)?;
        }

        Ok(modifications)
    }

    /// How long to sleep before polling again, if at all
    fn time_to_wait(&self, modifications: &[Modification], to: DateTime<Utc>) -> Option<Duration> {
        let latest = Modification::latest_time(modifications)?;

        // Beyond `to + delay` the server clock is skewed; do not wait on it
        if let Some(limit) = to.checked_add_signed(self.modification_delay)
            && latest > limit
        {
            warn!(
                latest = %latest,
                to = %to,
                "newest modification is too far in the future, ignoring the quiet period"
            );
            return None;
        }

        let wait = self.modification_delay.checked_sub(&(to - latest))?;
        if wait.num_milliseconds() < MIN_SLEEP_MS {
            return None;
        }
        wait.to_std().ok()
    }
}
