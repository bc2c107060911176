//! Process description and captured result
//!
//! A [`ProcessInfo`] says what to run; a [`ProcessResult`] says what came back.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::constants::{self, process::MASK};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Argument {
    value: String,
    secret: bool,
}

/// Ordered command line arguments, some of which may be secret.
///
/// Secret arguments are passed to the process untouched but rendered as
/// `********` by [`ArgumentBuilder::public_line`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentBuilder {
    args: Vec<Argument>,
}

impl ArgumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a public argument
    pub fn arg(mut self, value: impl Into<String>) -> Self {
        self.args.push(Argument {
            value: value.into(),
            secret: false,
        });
        self
    }

    /// Append several public arguments
    pub fn args<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for value in values {
            self = self.arg(value);
        }
        self
    }

    /// Append an argument that must never show up in logs
    pub fn secret(mut self, value: impl Into<String>) -> Self {
        self.args.push(Argument {
            value: value.into(),
            secret: true,
        });
        self
    }

    /// Append `flag` followed by `value`, skipping both when `value` is empty
    pub fn arg_if_set(self, flag: &str, value: &str) -> Self {
        if value.is_empty() {
            self
        } else {
            self.arg(flag).arg(value)
        }
    }

    /// Raw argument values, in order, as passed to the process
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.args.iter().map(|a| a.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Arguments rendered for logs, secrets masked
    pub fn public_line(&self) -> String {
        self.render(true)
    }

    /// Arguments rendered verbatim
    pub fn full_line(&self) -> String {
        self.render(false)
    }

    fn render(&self, mask: bool) -> String {
        self.args
            .iter()
            .map(|a| {
                if mask && a.secret {
                    MASK.to_string()
                } else {
                    quote(&a.value)
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Quote an argument for display when it contains whitespace or is empty
fn quote(value: &str) -> String {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        format!("\"{}\"", value)
    } else {
        value.to_string()
    }
}

/// Everything needed to run one external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInfo {
    executable: PathBuf,
    arguments: ArgumentBuilder,
    working_directory: Option<PathBuf>,
    environment: BTreeMap<String, String>,
    timeout: Duration,
    standard_input: Option<String>,
    success_exit_codes: Vec<i32>,
    ignorable_stderr: Vec<String>,
}

impl ProcessInfo {
    /// Describe a run of `executable` with `arguments` and the default timeout
    pub fn new(executable: impl Into<PathBuf>, arguments: ArgumentBuilder) -> Self {
        Self {
            executable: executable.into(),
            arguments,
            working_directory: None,
            environment: BTreeMap::new(),
            timeout: Duration::from_millis(constants::DEFAULT_TIMEOUT_MS),
            standard_input: None,
            success_exit_codes: vec![0],
            ignorable_stderr: Vec::new(),
        }
    }

    pub fn with_working_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.working_directory = Some(path.into());
        self
    }

    /// Add a variable on top of the inherited environment
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment.insert(key.into(), value.into());
        self
    }

    /// Add several variables on top of the inherited environment
    pub fn with_envs<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in vars {
            self.environment.insert(key.into(), value.into());
        }
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Text written to the child's standard input, which is then closed
    pub fn with_standard_input(mut self, input: impl Into<String>) -> Self {
        self.standard_input = Some(input.into());
        self
    }

    /// Exit codes that count as success (replaces the default `[0]`)
    pub fn with_success_exit_codes(mut self, codes: impl Into<Vec<i32>>) -> Self {
        self.success_exit_codes = codes.into();
        self
    }

    /// A failing exit whose stderr contains `pattern` is treated as success
    pub fn ignore_stderr_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.ignorable_stderr.push(pattern.into());
        self
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn arguments(&self) -> &ArgumentBuilder {
        &self.arguments
    }

    pub fn working_directory(&self) -> Option<&Path> {
        self.working_directory.as_deref()
    }

    pub fn environment(&self) -> &BTreeMap<String, String> {
        &self.environment
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn standard_input(&self) -> Option<&str> {
        self.standard_input.as_deref()
    }

    pub fn is_successful(&self, exit_code: i32) -> bool {
        self.success_exit_codes.contains(&exit_code)
    }

    /// Whether `stderr` matches one of the ignorable patterns
    pub fn is_ignorable_stderr(&self, stderr: &str) -> bool {
        self.ignorable_stderr
            .iter()
            .any(|pattern| stderr.contains(pattern.as_str()))
    }

    /// Command line safe for logs
    pub fn public_command_line(&self) -> String {
        self.command_line(self.arguments.public_line())
    }

    /// Command line exactly as executed, secrets included
    pub fn full_command_line(&self) -> String {
        self.command_line(self.arguments.full_line())
    }

    fn command_line(&self, args: String) -> String {
        let executable = quote(&self.executable.display().to_string());
        if args.is_empty() {
            executable
        } else {
            format!("{} {}", executable, args)
        }
    }
}

/// Captured outcome of a finished (or killed) process
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessResult {
    pub standard_output: String,
    pub standard_error: String,
    pub exit_code: i32,
    pub timed_out: bool,
}

impl ProcessResult {
    pub fn has_error_output(&self) -> bool {
        !self.standard_error.trim().is_empty()
    }
}
