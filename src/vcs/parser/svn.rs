//! Subversion log parser (`svn log --xml -v`)
//!
//! ```xml
//! <log>
//!   <logentry revision="4321">
//!     <author>alice</author>
//!     <date>2007-01-25T13:29:21.151174Z</date>
//!     <paths>
//!       <path action="M">/trunk/src/main.c</path>
//!     </paths>
//!     <msg>CCNET-1223 fixed bug</msg>
//!   </logentry>
//! </log>
//! ```
//!
//! One modification per `<path>`. `svn log -r {from}:{to}` includes the
//! revision just before `from`, so entries outside the window are dropped here.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use super::super::VcsError;
use super::super::constants::kinds;
use super::HistoryParser;
use super::date::{DateFormat, parse_with_formats};
use crate::model::{Modification, split_path};

const DATE_FORMATS: &[DateFormat] = &[DateFormat::Rfc3339];

#[derive(Debug, Deserialize)]
struct SvnLog {
    #[serde(rename = "logentry", default)]
    entries: Vec<LogEntry>,
}

#[derive(Debug, Deserialize)]
struct LogEntry {
    #[serde(rename = "@revision")]
    revision: String,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    paths: Option<Paths>,
    #[serde(default)]
    msg: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Paths {
    #[serde(rename = "path", default)]
    paths: Vec<PathEntry>,
}

#[derive(Debug, Deserialize)]
struct PathEntry {
    #[serde(rename = "@action", default)]
    action: String,
    #[serde(rename = "$text", default)]
    path: String,
}

/// Parser for `svn log --xml` output
#[derive(Debug, Clone, Copy, Default)]
pub struct SvnHistoryParser;

fn action_kind(action: &str) -> String {
    match action {
        "A" => kinds::ADDED.to_string(),
        "D" => kinds::DELETED.to_string(),
        "M" => kinds::MODIFIED.to_string(),
        "R" => kinds::REPLACED.to_string(),
        other => format!("Unknown action: {}", other),
    }
}

impl SvnHistoryParser {
    fn entry_modifications(
        entry: LogEntry,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Modification>, VcsError> {
        let Some(date) = entry.date.as_deref() else {
            return Err(VcsError::ParseFailure(format!(
                "svn log entry {} has no date",
                entry.revision.trim()
            )));
        };
        let modified_time = parse_with_formats(date, DATE_FORMATS)?;
        if modified_time < from || to < modified_time {
            return Ok(Vec::new());
        }

        if entry.revision.trim().parse::<u64>().is_err() {
            return Err(VcsError::ParseFailure(format!(
                "svn log entry has a non-numeric revision: {:?}",
                entry.revision
            )));
        }

        let author = entry.author.unwrap_or_default();
        let comment = entry.msg.filter(|msg| !msg.is_empty());
        let paths = entry.paths.map(|p| p.paths).unwrap_or_default();

        Ok(paths
            .into_iter()
            .map(|path| {
                let (folder_name, file_name) = split_path(path.path.trim());
                Modification {
                    kind: action_kind(&path.action),
                    file_name,
                    folder_name,
                    modified_time,
                    user_name: author.clone(),
                    comment: comment.clone(),
                    change_number: entry.revision.trim().to_string(),
                    ..Default::default()
                }
            })
            .collect())
    }
}

impl HistoryParser for SvnHistoryParser {
    fn parse(
        &self,
        output: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Modification>, VcsError> {
        let log: SvnLog = quick_xml::de::from_str(output).map_err(|e| {
            VcsError::ParseFailure(format!("Unable to load the output from svn: {}", e))
        })?;

        if log.entries.is_empty() {
            debug!("no <logentry> elements under <log>");
        }

        let mut modifications = Vec::new();
        for entry in log.entries {
            modifications.extend(Self::entry_modifications(entry, from, to)?);
        }
        Ok(modifications)
    }
}
