//! git log parser
//!
//! Expects the output of
//! `git log --name-status --pretty=format:"Commit:%H%nTime:%ci%nAuthor:%an%nE-Mail:%ae%nMessage:%B%nChanges:"`:
//!
//! ```text
//! Commit:24024978a9823df37a23afe533ad1c81f62467ed
//! Time:2009-06-13 10:37:42 +0000
//! Author:cj_sutherland
//! E-Mail:cj@example.com
//! Message:Expanded the tests.
//!
//! Changes:
//! M	project/UnitTests/Core/Tasks/ReplacementDynamicValueTests.cs
//! ```
//!
//! One modification is produced per changed path.

use chrono::{DateTime, Utc};
use tracing::debug;

use super::super::VcsError;
use super::super::constants::kinds;
use super::date::{DateFormat, parse_with_formats};
use super::{HistoryParser, lines};
use crate::model::{Modification, split_path};

const COMMIT: &str = "Commit:";
const TIME: &str = "Time:";
const AUTHOR: &str = "Author:";
const EMAIL: &str = "E-Mail:";
const MESSAGE: &str = "Message:";
const CHANGES: &str = "Changes:";

const DATE_FORMATS: &[DateFormat] = &[
    DateFormat::WithOffset("%Y-%m-%d %H:%M:%S %z"),
    DateFormat::Rfc3339,
];

/// Parser for formatted `git log --name-status` output
#[derive(Debug, Clone, Copy, Default)]
pub struct GitHistoryParser;

/// Map a `--name-status` letter to a modification type
fn change_kind(status: &str) -> &'static str {
    match status.chars().next() {
        Some('A') => kinds::ADDED,
        Some('C') => kinds::COPIED,
        Some('D') => kinds::DELETED,
        Some('M') => kinds::MODIFIED,
        Some('R') => kinds::RENAMED,
        Some('T') => kinds::TYPE_CHANGED,
        Some('U') => kinds::UNMERGED,
        _ => kinds::UNKNOWN,
    }
}

/// Undo git's C-style path quoting (`"caf\303\251.txt"` -> `café.txt`)
fn unquote_path(path: &str) -> String {
    let Some(inner) = path
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        return path.to_string();
    };

    let mut bytes = Vec::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut buf = [0u8; 4];
            bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }
        match chars.next() {
            Some('n') => bytes.push(b'\n'),
            Some('t') => bytes.push(b'\t'),
            Some(d @ '0'..='7') => {
                let mut value = d.to_digit(8).unwrap_or_default();
                for _ in 0..2 {
                    match chars.peek().and_then(|c| c.to_digit(8)) {
                        Some(digit) => {
                            value = value * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                bytes.push((value & 0xff) as u8);
            }
            Some(other) => {
                let mut buf = [0u8; 4];
                bytes.extend_from_slice(other.encode_utf8(&mut buf).as_bytes());
            }
            None => bytes.push(b'\\'),
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Commit under construction
#[derive(Default)]
struct CommitBlock {
    hash: String,
    time: Option<String>,
    author: String,
    email: String,
    message: Vec<String>,
    changes: Vec<(String, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Headers,
    Message,
    Changes,
}

/// Scan state for one `parse` call
struct GitScan {
    section: Section,
    commit: Option<CommitBlock>,
    modifications: Vec<Modification>,
}

impl GitScan {
    fn new() -> Self {
        Self {
            section: Section::Headers,
            commit: None,
            modifications: Vec::new(),
        }
    }

    fn feed(&mut self, line: &str) -> Result<(), VcsError> {
        if let Some(hash) = line.strip_prefix(COMMIT) {
            self.flush()?;
            self.commit = Some(CommitBlock {
                hash: hash.trim().to_string(),
                ..Default::default()
            });
            self.section = Section::Headers;
            return Ok(());
        }

        let Some(commit) = self.commit.as_mut() else {
            if line.trim().is_empty() {
                return Ok(());
            }
            return Err(VcsError::ParseFailure(format!(
                "git log output does not start with '{}': {}",
                COMMIT, line
            )));
        };

        match self.section {
            Section::Headers => {
                if let Some(time) = line.strip_prefix(TIME) {
                    commit.time = Some(time.trim().to_string());
                } else if let Some(author) = line.strip_prefix(AUTHOR) {
                    commit.author = author.trim().to_string();
                } else if let Some(email) = line.strip_prefix(EMAIL) {
                    commit.email = email.trim().to_string();
                } else if let Some(first) = line.strip_prefix(MESSAGE) {
                    commit.message.push(first.to_string());
                    self.section = Section::Message;
                } else if line.starts_with(CHANGES) {
                    self.section = Section::Changes;
                } else {
                    debug!(line, "skipping unknown git header line");
                }
            }
            Section::Message => {
                if line.starts_with(CHANGES) {
                    self.section = Section::Changes;
                } else {
                    commit.message.push(line.to_string());
                }
            }
            Section::Changes => {
                if line.trim().is_empty() {
                    return Ok(());
                }
                let mut fields = line.split('\t');
                let status = fields.next().unwrap_or_default().trim();
                // Renames and copies list source then destination; keep the destination
                match fields.last() {
                    Some(path) if !status.is_empty() => {
                        commit.changes.push((status.to_string(), unquote_path(path)));
                    }
                    _ => {
                        return Err(VcsError::ParseFailure(format!(
                            "Malformed git change line: {:?}",
                            line
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), VcsError> {
        let Some(commit) = self.commit.take() else {
            return Ok(());
        };
        if commit.changes.is_empty() {
            debug!(commit = %commit.hash, "git commit without file changes");
            return Ok(());
        }

        let time = commit.time.as_deref().ok_or_else(|| {
            VcsError::ParseFailure(format!("git commit {} has no '{}' line", commit.hash, TIME))
        })?;
        let modified_time = parse_with_formats(time, DATE_FORMATS)?;
        let comment = commit.message.join("\n").trim_end().to_string();
        let email = (!commit.email.is_empty()).then(|| commit.email.clone());

        for (status, path) in &commit.changes {
            let (folder_name, file_name) = split_path(path);
            self.modifications.push(Modification {
                kind: change_kind(status).to_string(),
                file_name,
                folder_name,
                modified_time,
                user_name: commit.author.clone(),
                email_address: email.clone(),
                comment: Some(comment.clone()),
                change_number: commit.hash.clone(),
                ..Default::default()
            });
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<Modification>, VcsError> {
        self.flush()?;
        Ok(self.modifications)
    }
}

impl HistoryParser for GitHistoryParser {
    fn parse(
        &self,
        output: &str,
        _from: DateTime<Utc>,
        _to: DateTime<Utc>,
    ) -> Result<Vec<Modification>, VcsError> {
        let mut scan = GitScan::new();
        for line in lines(output) {
            scan.feed(line)?;
        }
        scan.finish()
    }
}
