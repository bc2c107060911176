//! Provider backed by a user-supplied executable
//!
//! The executable implements three commands:
//!
//! ```text
//! <exe> GETMODS "<to>" "<from>" [args...]      # prints an <ArrayOfModification>
//! <exe> GETSOURCE "<workdir>" "<time>" [args...]
//! <exe> SETLABEL "<label>" "<time>" [args...]
//! ```
//!
//! Times are `yyyy-MM-dd HH:mm:ss` in UTC. Integration properties and the
//! configured variables are exported in the environment.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::{ProcessAdapter, ProcessSourceControl};
use crate::model::IntegrationResult;
use crate::vcs::constants::external::{
    COMMAND_DATE_FORMAT, GET_MODIFICATIONS, GET_SOURCE, SET_LABEL,
};
use crate::vcs::parser::{HistoryParser, ModificationXmlParser};
use crate::vcs::{ArgumentBuilder, ProcessInfo, VcsError};

/// External command provider
pub type ExternalSourceControl = ProcessSourceControl<ExternalCommand>;

/// Adapter describing the external executable and its options
#[derive(Debug, Clone)]
pub struct ExternalCommand {
    executable: PathBuf,
    args: Vec<String>,
    environment: BTreeMap<String, String>,
    auto_get_source: bool,
    label_on_success: bool,
    timeout: Option<Duration>,
    parser: ModificationXmlParser,
}

impl ExternalCommand {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            args: Vec::new(),
            environment: BTreeMap::new(),
            auto_get_source: false,
            label_on_success: false,
            timeout: None,
            parser: ModificationXmlParser,
        }
    }

    /// Extra arguments appended to every command
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment.insert(key.into(), value.into());
        self
    }

    /// Run `GETSOURCE` from `get_source`
    pub fn auto_get_source(mut self, enabled: bool) -> Self {
        self.auto_get_source = enabled;
        self
    }

    /// Run `SETLABEL` after successful integrations
    pub fn label_on_success(mut self, enabled: bool) -> Self {
        self.label_on_success = enabled;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn command(
        &self,
        verb: &str,
        first: &str,
        time: DateTime<Utc>,
        result: &IntegrationResult,
    ) -> Result<ProcessInfo, VcsError> {
        if self.executable.as_os_str().is_empty() {
            return Err(VcsError::Configuration(
                "external source control requires an executable".to_string(),
            ));
        }

        let args = ArgumentBuilder::new()
            .arg(verb)
            .arg(first)
            .arg(format_command_date(time))
            .args(self.args.iter().cloned());

        let mut info = ProcessInfo::new(&self.executable, args)
            .with_working_directory(&result.working_directory)
            .with_envs(self.environment.clone())
            .with_envs(result.properties.clone());
        if let Some(timeout) = self.timeout {
            info = info.with_timeout(timeout);
        }

        debug!(command = %info.public_command_line(), "prepared external source control command");
        Ok(info)
    }
}

fn format_command_date(time: DateTime<Utc>) -> String {
    time.format(COMMAND_DATE_FORMAT).to_string()
}

impl ProcessAdapter for ExternalCommand {
    fn name(&self) -> &str {
        "External Source Control"
    }

    fn parser(&self) -> &dyn HistoryParser {
        &self.parser
    }

    fn history_process(
        &self,
        from: &IntegrationResult,
        to: &IntegrationResult,
    ) -> Result<ProcessInfo, VcsError> {
        self.command(
            GET_MODIFICATIONS,
            &format_command_date(to.start_time),
            from.start_time,
            from,
        )
    }

    fn get_source_process(
        &self,
        result: &IntegrationResult,
    ) -> Result<Option<ProcessInfo>, VcsError> {
        if !self.auto_get_source {
            return Ok(None);
        }
        let workdir = result.working_directory.display().to_string();
        self.command(GET_SOURCE, &workdir, result.start_time, result)
            .map(Some)
    }

    fn label_process(&self, result: &IntegrationResult) -> Result<Option<ProcessInfo>, VcsError> {
        if !self.label_on_success || !result.succeeded() || result.label.is_empty() {
            return Ok(None);
        }
        self.command(SET_LABEL, &result.label, result.start_time, result)
            .map(Some)
    }
}
