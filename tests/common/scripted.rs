//! Providers and process runners that replay scripted answers.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use sourcewatch::model::{IntegrationResult, Modification, Project};
use sourcewatch::provider::SourceControl;
use sourcewatch::vcs::{ProcessInfo, ProcessResult, ProcessRunner, VcsError};

/// Shared, ordered record of calls made on test doubles
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    pub fn push(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }
}

type Answer = Box<dyn FnMut(&IntegrationResult, &IntegrationResult) -> Result<Vec<Modification>, VcsError> + Send>;

/// Provider answering `get_modifications` from a closure and logging every
/// call as `"<name>:<operation>"`.
pub struct ScriptedSourceControl {
    name: String,
    answer: Answer,
    log: CallLog,
    polled_to: Arc<Mutex<Vec<DateTime<Utc>>>>,
}

impl ScriptedSourceControl {
    pub fn new(
        name: &str,
        log: &CallLog,
        answer: impl FnMut(&IntegrationResult, &IntegrationResult) -> Result<Vec<Modification>, VcsError>
        + Send
        + 'static,
    ) -> Self {
        Self {
            name: name.to_string(),
            answer: Box::new(answer),
            log: log.clone(),
            polled_to: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Provider that always reports `modifications`
    pub fn returning(name: &str, log: &CallLog, modifications: Vec<Modification>) -> Self {
        Self::new(name, log, move |_, _| Ok(modifications.clone()))
    }

    /// `to.start_time` of every poll, shared with clones of this handle
    pub fn polled_to(&self) -> Arc<Mutex<Vec<DateTime<Utc>>>> {
        Arc::clone(&self.polled_to)
    }
}

impl SourceControl for ScriptedSourceControl {
    fn get_modifications(
        &mut self,
        from: &IntegrationResult,
        to: &IntegrationResult,
    ) -> Result<Vec<Modification>, VcsError> {
        self.log.push(format!("{}:get_modifications", self.name));
        self.polled_to.lock().unwrap().push(to.start_time);
        (self.answer)(from, to)
    }

    fn get_source(&mut self, result: &IntegrationResult) -> Result<(), VcsError> {
        self.log.push(format!("{}:get_source:{}", self.name, result.project_name));
        Ok(())
    }

    fn label_source_control(&mut self, result: &IntegrationResult) -> Result<(), VcsError> {
        self.log.push(format!("{}:label:{}", self.name, result.label));
        Ok(())
    }

    fn initialize(&mut self, project: &Project) -> Result<(), VcsError> {
        self.log.push(format!("{}:initialize:{}", self.name, project.name));
        Ok(())
    }

    fn purge(&mut self, project: &Project) -> Result<(), VcsError> {
        self.log.push(format!("{}:purge:{}", self.name, project.name));
        Ok(())
    }
}

/// Process runner replaying queued results and recording every command
#[derive(Clone, Default)]
pub struct ScriptedRunner {
    answers: Arc<Mutex<VecDeque<Result<ProcessResult, VcsError>>>>,
    executed: Arc<Mutex<Vec<ProcessInfo>>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful run printing `stdout`
    pub fn then_output(self, stdout: &str) -> Self {
        self.then(Ok(ProcessResult {
            standard_output: stdout.to_string(),
            ..Default::default()
        }))
    }

    pub fn then(self, answer: Result<ProcessResult, VcsError>) -> Self {
        self.answers.lock().unwrap().push_back(answer);
        self
    }

    pub fn executed(&self) -> Vec<ProcessInfo> {
        self.executed.lock().unwrap().clone()
    }
}

impl ProcessRunner for ScriptedRunner {
    fn execute(&self, info: &ProcessInfo) -> Result<ProcessResult, VcsError> {
        self.executed.lock().unwrap().push(info.clone());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ProcessResult::default()))
    }
}
