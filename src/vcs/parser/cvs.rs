//! CVS log parser (`cvs log`)
//!
//! Output is a sequence of file blocks. Each block starts with `RCS file:`,
//! names the working file, and lists revisions separated by dashed lines:
//!
//! ```text
//! RCS file: /cvsroot/project/main/build.xml,v
//! Working file: main/build.xml
//! head: 1.42
//! description:
//! ----------------------------
//! revision 1.42
//! date: 2002/03/15 19:20:28;  author: alden;  state: Exp;  lines: +1 -1
//! enabled debug info when compiling tests.
//! =============================================================================
//! ```

use chrono::{DateTime, Utc};
use tracing::debug;

use super::super::VcsError;
use super::date::{DateFormat, parse_with_formats};
use super::{HistoryParser, lines};
use crate::model::{Modification, split_path};

const RCS_FILE: &str = "RCS file: ";
const WORKING_FILE: &str = "Working file: ";
const FILE_DELIMITER: &str =
    "=============================================================================";
const REVISION_DELIMITER: &str = "----------------------------";
const REVISION: &str = "revision ";
const DATE: &str = "date:";
const BRANCHES: &str = "branches:";
const DEAD_STATE: &str = "dead";

/// `cvs log` emits `yyyy/MM/dd` on old servers and ISO with offset on 1.12+
const DATE_FORMATS: &[DateFormat] = &[
    DateFormat::Utc("%Y/%m/%d %H:%M:%S"),
    DateFormat::WithOffset("%Y-%m-%d %H:%M:%S %z"),
    DateFormat::Utc("%Y-%m-%d %H:%M:%S"),
];

/// Modification types reported by CVS
pub mod kinds {
    pub const ADDED: &str = "added";
    pub const MODIFIED: &str = "modified";
    pub const DELETED: &str = "deleted";
}

/// Parser for `cvs log` output
#[derive(Debug, Clone, Copy, Default)]
pub struct CvsHistoryParser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    /// Before the first revision of a file block
    FileHeader,
    /// After a revision delimiter, waiting for `revision` / `date:`
    RevisionHeader,
    /// Collecting comment lines of the current revision
    Comment,
}

/// Scan state for one `parse` call
struct CvsScan {
    section: Section,
    saw_rcs_file: bool,
    working_file: Option<String>,
    version: String,
    current: Option<Modification>,
    comment: Vec<String>,
    modifications: Vec<Modification>,
}

impl CvsScan {
    fn new() -> Self {
        Self {
            section: Section::FileHeader,
            saw_rcs_file: false,
            working_file: None,
            version: String::new(),
            current: None,
            comment: Vec::new(),
            modifications: Vec::new(),
        }
    }

    fn feed(&mut self, line: &str) -> Result<(), VcsError> {
        if line.starts_with(FILE_DELIMITER) {
            self.flush();
            self.section = Section::FileHeader;
            self.working_file = None;
            return Ok(());
        }

        if line.starts_with(RCS_FILE) && self.section != Section::Comment {
            self.flush();
            self.saw_rcs_file = true;
            self.section = Section::FileHeader;
            self.working_file = None;
            return Ok(());
        }

        match self.section {
            Section::FileHeader => {
                if let Some(path) = line.strip_prefix(WORKING_FILE) {
                    self.working_file = Some(path.trim().to_string());
                } else if line.trim_end() == REVISION_DELIMITER {
                    self.section = Section::RevisionHeader;
                }
            }
            Section::RevisionHeader => {
                if let Some(rest) = line.strip_prefix(REVISION) {
                    self.version = rest.split_whitespace().next().unwrap_or_default().to_string();
                } else if line.starts_with(DATE) {
                    self.current = Some(self.parse_date_line(line)?);
                    self.section = Section::Comment;
                } else {
                    debug!(line, "skipping cvs revision header line");
                }
            }
            Section::Comment => {
                if line.trim_end() == REVISION_DELIMITER {
                    self.flush();
                    self.section = Section::RevisionHeader;
                } else if self.comment.is_empty() && line.starts_with(BRANCHES) {
                    debug!(line, "skipping cvs branches line");
                } else {
                    self.comment.push(line.to_string());
                }
            }
        }
        Ok(())
    }

    /// Parse `date: ...;  author: ...;  state: ...;  lines: ...`
    fn parse_date_line(&self, line: &str) -> Result<Modification, VcsError> {
        let working_file = self.working_file.as_deref().ok_or_else(|| {
            VcsError::ParseFailure(format!("cvs revision without a working file: {}", line))
        })?;

        let mut date = None;
        let mut author = "";
        let mut state = "";
        let mut has_lines = false;

        for field in line.split(';') {
            let Some((key, value)) = field.split_once(':') else {
                continue;
            };
            match key.trim() {
                "date" => date = Some(value.trim()),
                "author" => author = value.trim(),
                "state" => state = value.trim(),
                "lines" => has_lines = true,
                _ => {}
            }
        }

        let date = date
            .ok_or_else(|| VcsError::ParseFailure(format!("cvs date line without a date: {}", line)))?;
        let modified_time = parse_with_formats(date, DATE_FORMATS)?;

        let kind = if state.eq_ignore_ascii_case(DEAD_STATE) {
            kinds::DELETED
        } else if !has_lines {
            kinds::ADDED
        } else {
            kinds::MODIFIED
        };

        let (folder_name, file_name) = split_path(working_file);
        Ok(Modification {
            kind: kind.to_string(),
            file_name,
            folder_name,
            modified_time,
            user_name: author.to_string(),
            version: self.version.clone(),
            ..Default::default()
        })
    }

    /// Finish the revision under construction, if any
    fn flush(&mut self) {
        if let Some(mut modification) = self.current.take() {
            let comment = self.comment.join("\n");
            modification.comment = (!comment.is_empty()).then_some(comment);
            self.modifications.push(modification);
        }
        self.comment.clear();
        self.version.clear();
    }

    fn finish(mut self, output: &str) -> Result<Vec<Modification>, VcsError> {
        self.flush();
        if !self.saw_rcs_file && !output.trim().is_empty() {
            return Err(VcsError::ParseFailure(format!(
                "cvs log output contains no '{}' entries",
                RCS_FILE.trim()
            )));
        }
        Ok(self.modifications)
    }
}

impl HistoryParser for CvsHistoryParser {
    fn parse(
        &self,
        output: &str,
        _from: DateTime<Utc>,
        _to: DateTime<Utc>,
    ) -> Result<Vec<Modification>, VcsError> {
        let mut scan = CvsScan::new();
        for line in lines(output) {
            scan.feed(line)?;
        }
        scan.finish(output)
    }
}
