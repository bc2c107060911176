//! Integration (build) context handed to providers by the orchestrator

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

/// Outcome of an integration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntegrationStatus {
    Success,
    Failure,
    Exception,
    Cancelled,
    #[default]
    Unknown,
}

/// Receives progress messages while a provider materializes source.
#[derive(Debug, Default)]
pub struct BuildProgress {
    tasks: Mutex<Vec<String>>,
}

impl BuildProgress {
    /// Record that a long-running task started
    pub fn signal_start_run_task(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!(task = %message, "build progress");
        if let Ok(mut tasks) = self.tasks.lock() {
            tasks.push(message);
        }
    }

    /// Messages signalled so far, oldest first
    pub fn tasks(&self) -> Vec<String> {
        self.tasks
            .lock()
            .map(|tasks| tasks.clone())
            .unwrap_or_default()
    }
}

/// The slice of an integration that change detection needs.
///
/// `from` and `to` windows passed to providers are two of these: the last
/// build and the build being considered.
#[derive(Debug, Clone)]
pub struct IntegrationResult {
    pub project_name: String,
    pub start_time: DateTime<Utc>,
    pub label: String,
    pub status: IntegrationStatus,
    pub working_directory: PathBuf,
    pub artifact_directory: PathBuf,
    /// Exported to external commands as environment variables
    pub properties: BTreeMap<String, String>,
    progress: Arc<BuildProgress>,
}

impl IntegrationResult {
    /// Create a result for `project_name` starting at `start_time`
    pub fn new(project_name: impl Into<String>, start_time: DateTime<Utc>) -> Self {
        Self {
            project_name: project_name.into(),
            start_time,
            label: String::new(),
            status: IntegrationStatus::Unknown,
            working_directory: PathBuf::from("."),
            artifact_directory: PathBuf::from("."),
            properties: BTreeMap::new(),
            progress: Arc::new(BuildProgress::default()),
        }
    }

    /// Create a successful result, the usual shape of a "last build"
    pub fn successful(project_name: impl Into<String>, start_time: DateTime<Utc>) -> Self {
        Self::new(project_name, start_time).with_status(IntegrationStatus::Success)
    }

    pub fn with_status(mut self, status: IntegrationStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_working_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.working_directory = path.into();
        self
    }

    pub fn with_artifact_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.artifact_directory = path.into();
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Same integration, moved to a different start time
    pub fn at(&self, start_time: DateTime<Utc>) -> Self {
        Self {
            start_time,
            ..self.clone()
        }
    }

    pub fn succeeded(&self) -> bool {
        self.status == IntegrationStatus::Success
    }

    /// Resolve `path` against the working directory (absolute paths pass through)
    pub fn base_from_working_directory(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.working_directory.join(path)
        }
    }

    /// Resolve `path` against the artifact directory (absolute paths pass through)
    pub fn base_from_artifact_directory(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.artifact_directory.join(path)
        }
    }

    pub fn progress(&self) -> &BuildProgress {
        &self.progress
    }
}

/// A configured project, as seen by provider lifecycle hooks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    pub working_directory: PathBuf,
    pub artifact_directory: PathBuf,
}

impl Project {
    pub fn new(name: impl Into<String>, working_directory: impl Into<PathBuf>) -> Self {
        let working_directory = working_directory.into();
        Self {
            name: name.into(),
            artifact_directory: working_directory.clone(),
            working_directory,
        }
    }
}
