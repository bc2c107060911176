//! Provider watching file timestamps under a directory

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::SourceControl;
use crate::model::{IntegrationResult, Modification};
use crate::vcs::VcsError;

/// Reports every file or directory under `repository_root` whose write or
/// creation time is later than the last integration and no later than the
/// current one.
#[derive(Debug, Clone)]
pub struct FileSourceControl {
    repository_root: PathBuf,
    check_recursively: bool,
    ignore_missing_root: bool,
    auto_get_source: bool,
}

impl FileSourceControl {
    /// Watch `repository_root` (relative paths resolve against the working
    /// directory of the integration)
    pub fn new(repository_root: impl Into<PathBuf>) -> Self {
        Self {
            repository_root: repository_root.into(),
            check_recursively: true,
            ignore_missing_root: false,
            auto_get_source: false,
        }
    }

    pub fn check_recursively(mut self, enabled: bool) -> Self {
        self.check_recursively = enabled;
        self
    }

    /// Report no changes instead of failing when the root does not exist
    pub fn ignore_missing_root(mut self, enabled: bool) -> Self {
        self.ignore_missing_root = enabled;
        self
    }

    /// Copy the repository into the working directory on `get_source`
    pub fn auto_get_source(mut self, enabled: bool) -> Self {
        self.auto_get_source = enabled;
        self
    }

    fn scan(
        &self,
        dir: &Path,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
        out: &mut Vec<Modification>,
    ) -> Result<(), VcsError> {
        let mut entries = match fs::read_dir(dir) {
            Ok(entries) => entries.collect::<Result<Vec<_>, io::Error>>()?,
            Err(e) if e.kind() == io::ErrorKind::NotFound && self.ignore_missing_root => {
                debug!(path = %dir.display(), "repository directory is missing, ignoring");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        entries.sort_by_key(|entry| entry.file_name());

        let mut directories = Vec::new();
        for entry in entries {
            let metadata = entry.metadata()?;
            if metadata.is_dir() {
                directories.push((entry.path(), metadata));
            } else if let Some(time) = changed_between(&metadata, since, until) {
                out.push(file_modification(&entry.path(), time));
            }
        }

        for (path, metadata) in directories {
            if let Some(time) = changed_between(&metadata, since, until) {
                out.push(Modification {
                    folder_name: display_path(&path),
                    modified_time: time,
                    ..Default::default()
                });
            }
            if self.check_recursively {
                self.scan(&path, since, until, out)?;
            }
        }
        Ok(())
    }
}

/// Latest of write and creation time, if it lies in `(since, until]`
fn changed_between(
    metadata: &fs::Metadata,
    since: DateTime<Utc>,
    until: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    let written = metadata.modified().ok().map(to_utc);
    let created = metadata.created().ok().map(to_utc);
    written
        .max(created)
        .filter(|time| since < *time && *time <= until)
}

fn to_utc(time: SystemTime) -> DateTime<Utc> {
    DateTime::<Utc>::from(time)
}

fn display_path(path: &Path) -> String {
    path.display().to_string().replace('\\', "/")
}

fn file_modification(path: &Path, time: DateTime<Utc>) -> Modification {
    Modification {
        file_name: path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
        folder_name: path.parent().map(display_path).unwrap_or_default(),
        modified_time: time,
        ..Default::default()
    }
}

/// Recursively copy the contents of `from` into `to`
fn copy_tree(from: &Path, to: &Path) -> io::Result<()> {
    fs::create_dir_all(to)?;
    for entry in fs::read_dir(from)? {
        let entry = entry?;
        let target = to.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_tree(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

impl SourceControl for FileSourceControl {
    fn get_modifications(
        &mut self,
        from: &IntegrationResult,
        to: &IntegrationResult,
    ) -> Result<Vec<Modification>, VcsError> {
        let root = from.base_from_working_directory(&self.repository_root);
        let mut modifications = Vec::new();
        self.scan(&root, from.start_time, to.start_time, &mut modifications)?;
        Ok(modifications)
    }

    fn get_source(&mut self, result: &IntegrationResult) -> Result<(), VcsError> {
        result
            .progress()
            .signal_start_run_task("Getting source from FileSourceControl");

        if self.auto_get_source {
            let root = result.base_from_working_directory(&self.repository_root);
            copy_tree(&root, &result.working_directory)?;
        }
        Ok(())
    }
}
