//! Settings structs
//!
//! Loading configuration is the host's job; these types only describe the
//! shape. They all deserialize with serde (missing fields fall back to the
//! defaults in [`crate::vcs::constants`]) and offer `with_*` builders.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::provider::{Clock, QuietPeriod};
use crate::vcs::ProcessInfo;
use crate::vcs::constants::{DEFAULT_TIMEOUT_MS, quiet_period, retry};

/// Debounce window applied before a detected change set triggers a build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QuietPeriodSettings {
    /// 0 disables the quiet period
    pub modification_delay_seconds: u64,
}

impl Default for QuietPeriodSettings {
    fn default() -> Self {
        Self {
            modification_delay_seconds: quiet_period::DEFAULT_MODIFICATION_DELAY_SECONDS,
        }
    }
}

impl QuietPeriodSettings {
    pub fn with_modification_delay_seconds(mut self, seconds: u64) -> Self {
        self.modification_delay_seconds = seconds;
        self
    }

    /// Build a [`QuietPeriod`] driven by `clock`
    pub fn build(&self, clock: impl Clock + 'static) -> QuietPeriod {
        QuietPeriod::new(clock).with_modification_delay(self.modification_delay_seconds)
    }
}

/// Bounded retry for commands talking to a remote server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Maximum number of invocations (0 behaves like 1)
    pub attempts: u32,
    /// Pause between two attempts
    pub wait_seconds: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: retry::DEFAULT_ATTEMPTS,
            wait_seconds: retry::DEFAULT_WAIT_SECONDS,
        }
    }
}

impl RetryPolicy {
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    pub fn with_wait_seconds(mut self, wait_seconds: u64) -> Self {
        self.wait_seconds = wait_seconds;
        self
    }

    pub fn wait(&self) -> Duration {
        Duration::from_secs(self.wait_seconds)
    }
}

/// Defaults applied to every command a provider spawns
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProcessSettings {
    pub timeout_ms: u64,
    /// Added to the inherited environment
    pub environment: BTreeMap<String, String>,
    /// Used when the command itself names no working directory
    pub working_directory: Option<PathBuf>,
}

impl Default for ProcessSettings {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            environment: BTreeMap::new(),
            working_directory: None,
        }
    }
}

impl ProcessSettings {
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment.insert(key.into(), value.into());
        self
    }

    pub fn with_working_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.working_directory = Some(path.into());
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Apply these defaults to `info`.
    ///
    /// Variables already set on `info` win over the configured ones.
    pub fn apply(&self, info: ProcessInfo) -> ProcessInfo {
        let mut environment = self.environment.clone();
        environment.extend(
            info.environment()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );

        let info = match (&self.working_directory, info.working_directory()) {
            (Some(dir), None) => info.with_working_directory(dir.clone()),
            _ => info,
        };
        info.with_envs(environment).with_timeout(self.timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vcs::ArgumentBuilder;

    #[test]
    fn test_defaults() {
        assert_eq!(QuietPeriodSettings::default().modification_delay_seconds, 0);
        assert_eq!(RetryPolicy::default().attempts, 5);
        assert_eq!(RetryPolicy::default().wait(), Duration::from_secs(5));
        assert_eq!(
            ProcessSettings::default().timeout(),
            Duration::from_millis(600_000)
        );
    }

    #[test]
    fn test_apply_keeps_command_environment() {
        let settings = ProcessSettings::default()
            .with_timeout_ms(1_000)
            .with_env("HOME", "/ci/home")
            .with_env("P4USER", "ci")
            .with_working_directory("/ci/work");
        let info = ProcessInfo::new("p4", ArgumentBuilder::new().arg("changes"))
            .with_env("P4USER", "build");

        let info = settings.apply(info);

        assert_eq!(info.timeout(), Duration::from_secs(1));
        assert_eq!(info.environment().get("HOME").map(String::as_str), Some("/ci/home"));
        assert_eq!(info.environment().get("P4USER").map(String::as_str), Some("build"));
        assert_eq!(
            info.working_directory(),
            Some(std::path::Path::new("/ci/work"))
        );
    }

    #[test]
    fn test_apply_does_not_override_working_directory() {
        let settings = ProcessSettings::default().with_working_directory("/ci/work");
        let info = ProcessInfo::new("svn", ArgumentBuilder::new()).with_working_directory("/src");

        let info = settings.apply(info);
        assert_eq!(info.working_directory(), Some(std::path::Path::new("/src")));
    }
}
