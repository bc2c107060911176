//! Process-based provider: run a command, parse its output

use std::sync::Arc;

use tracing::debug;

use super::{Clock, SourceControl, SystemClock, execute_with_retries};
use crate::config::RetryPolicy;
use crate::issue::{IssueUrlBuilder, WebUrlBuilder};
use crate::model::{IntegrationResult, Modification, Project};
use crate::vcs::parser::{HistoryParser, filter_to_range};
use crate::vcs::{ProcessExecutor, ProcessInfo, ProcessResult, ProcessRunner, VcsError};

/// Tool-specific half of a [`ProcessSourceControl`].
///
/// An adapter knows the command lines of one tool and which parser reads its
/// history output. It never runs anything itself.
pub trait ProcessAdapter: Send {
    /// Name used in progress messages ("Getting source from {name}")
    fn name(&self) -> &str;

    fn parser(&self) -> &dyn HistoryParser;

    /// Command listing the changes between `from` and `to`
    fn history_process(
        &self,
        from: &IntegrationResult,
        to: &IntegrationResult,
    ) -> Result<ProcessInfo, VcsError>;

    /// Command materializing source, `None` when nothing should run
    fn get_source_process(
        &self,
        _result: &IntegrationResult,
    ) -> Result<Option<ProcessInfo>, VcsError> {
        Ok(None)
    }

    /// Command labelling the repository, `None` when nothing should run
    fn label_process(&self, _result: &IntegrationResult) -> Result<Option<ProcessInfo>, VcsError> {
        Ok(None)
    }

    /// Called with every successfully parsed change set, e.g. to cache the
    /// last known remote revision
    fn modifications_received(&mut self, _modifications: &[Modification]) {}

    fn initialize(&mut self, _project: &Project) -> Result<(), VcsError> {
        Ok(())
    }

    fn purge(&mut self, _project: &Project) -> Result<(), VcsError> {
        Ok(())
    }
}

/// Provider that executes an adapter's commands and parses their output.
///
/// Parser output is trimmed to the `[from, to]` window and annotated with
/// the optional issue and web URLs. Path and user filtering belongs to
/// [`super::FilteredSourceControl`].
pub struct ProcessSourceControl<A: ProcessAdapter> {
    adapter: A,
    runner: Box<dyn ProcessRunner>,
    retry: Option<(RetryPolicy, Arc<dyn Clock>)>,
    issue_url_builder: Option<Box<dyn IssueUrlBuilder>>,
    web_url_builder: Option<WebUrlBuilder>,
}

impl<A: ProcessAdapter> ProcessSourceControl<A> {
    /// Provider spawning real processes through [`ProcessExecutor`]
    pub fn new(adapter: A) -> Self {
        Self::with_runner(adapter, ProcessExecutor::new())
    }

    pub fn with_runner(adapter: A, runner: impl ProcessRunner + 'static) -> Self {
        Self {
            adapter,
            runner: Box::new(runner),
            retry: None,
            issue_url_builder: None,
            web_url_builder: None,
        }
    }

    /// Retry transient command failures with the wall clock
    pub fn with_retry(self, policy: RetryPolicy) -> Self {
        self.with_retry_clock(policy, Arc::new(SystemClock))
    }

    pub fn with_retry_clock(mut self, policy: RetryPolicy, clock: Arc<dyn Clock>) -> Self {
        self.retry = Some((policy, clock));
        self
    }

    pub fn with_issue_url_builder(mut self, builder: impl IssueUrlBuilder + 'static) -> Self {
        self.issue_url_builder = Some(Box::new(builder));
        self
    }

    pub fn with_web_url_builder(mut self, builder: WebUrlBuilder) -> Self {
        self.web_url_builder = Some(builder);
        self
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut A {
        &mut self.adapter
    }

    /// Run `info`, retrying when a policy is configured
    pub fn execute(&self, info: &ProcessInfo) -> Result<ProcessResult, VcsError> {
        match &self.retry {
            Some((policy, clock)) => {
                execute_with_retries(policy, clock.as_ref(), || self.runner.execute(info))
            }
            None => self.runner.execute(info),
        }
    }
}

impl<A: ProcessAdapter> SourceControl for ProcessSourceControl<A> {
    fn get_modifications(
        &mut self,
        from: &IntegrationResult,
        to: &IntegrationResult,
    ) -> Result<Vec<Modification>, VcsError> {
        let info = self.adapter.history_process(from, to)?;
        let result = self.execute(&info)?;

        let parsed =
            self.adapter
                .parser()
                .parse(&result.standard_output, from.start_time, to.start_time)?;
        let mut modifications = filter_to_range(parsed, from.start_time, to.start_time);
        debug!(
            provider = self.adapter.name(),
            count = modifications.len(),
            "parsed history"
        );

        if let Some(builder) = &self.issue_url_builder {
            builder.setup_modifications(&mut modifications);
        }
        if let Some(builder) = &self.web_url_builder {
            builder.setup_modifications(&mut modifications);
        }
        self.adapter.modifications_received(&modifications);
        Ok(modifications)
    }

    fn get_source(&mut self, result: &IntegrationResult) -> Result<(), VcsError> {
        result
            .progress()
            .signal_start_run_task(format!("Getting source from {}", self.adapter.name()));

        if let Some(info) = self.adapter.get_source_process(result)? {
            self.execute(&info)?;
        }
        Ok(())
    }

    fn label_source_control(&mut self, result: &IntegrationResult) -> Result<(), VcsError> {
        if let Some(info) = self.adapter.label_process(result)? {
            self.execute(&info)?;
        }
        Ok(())
    }

    fn initialize(&mut self, project: &Project) -> Result<(), VcsError> {
        self.adapter.initialize(project)
    }

    fn purge(&mut self, project: &Project) -> Result<(), VcsError> {
        self.adapter.purge(project)
    }
}
