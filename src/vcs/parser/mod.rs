//! History parsers
//!
//! Each parser turns one tool's raw log output into [`Modification`]s. They
//! keep no state between calls: scan state lives in a local struct created
//! per [`HistoryParser::parse`] invocation.

mod cvs;
pub mod date;
mod git;
mod modification_xml;
mod svn;

pub use cvs::CvsHistoryParser;
pub use date::{DateFormat, parse_with_formats};
pub use git::GitHistoryParser;
pub use modification_xml::ModificationXmlParser;
pub use svn::SvnHistoryParser;


use std::fmt::Debug;

use chrono::{DateTime, Utc};

use super::VcsError;
use crate::model::Modification;

/// Converts a tool's history output into modifications.
///
/// Parsers may return records outside `[from, to]` when the tool cannot
/// filter by time on the server; callers apply [`filter_to_range`].
pub trait HistoryParser: Debug + Send + Sync {
    fn parse(
        &self,
        output: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Modification>, VcsError>;
}

/// Drop every modification outside the inclusive window `[from, to]`
pub fn filter_to_range(
    modifications: Vec<Modification>,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Vec<Modification> {
    let before = modifications.len();
    let kept: Vec<Modification> = modifications
        .into_iter()
        .filter(|m| m.is_within(from, to))
        .collect();

    if kept.len() != before {
        tracing::debug!(
            dropped = before - kept.len(),
            "dropped modifications outside the query window"
        );
    }
    kept
}

/// Lines of `output` with any trailing `\r` removed (CRLF tolerant)
fn lines(output: &str) -> impl Iterator<Item = &str> {
    output.lines().map(|line| line.trim_end_matches('\r'))
}
