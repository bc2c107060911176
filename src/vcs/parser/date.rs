//! Format-explicit timestamp parsing
//!
//! Every parser states the exact formats its tool emits. Nothing here looks
//! at the process locale, so the CI server and the source control server can
//! disagree on culture without changing the result.

use chrono::{DateTime, NaiveDateTime, Utc};

use super::super::VcsError;

/// One accepted timestamp shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// `strftime` pattern without offset; the value is taken as UTC
    Utc(&'static str),
    /// `strftime` pattern that includes an offset (`%z`)
    WithOffset(&'static str),
    /// RFC 3339 / ISO 8601 with `Z` or an offset
    Rfc3339,
}

impl DateFormat {
    fn parse(self, text: &str) -> Option<DateTime<Utc>> {
        match self {
            DateFormat::Utc(fmt) => NaiveDateTime::parse_from_str(text, fmt)
                .ok()
                .map(|naive| naive.and_utc()),
            DateFormat::WithOffset(fmt) => DateTime::parse_from_str(text, fmt)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            DateFormat::Rfc3339 => DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

/// Parse `text` with the first matching format, normalized to UTC.
///
/// Fails with `VcsError::ParseFailure` when no format matches.
pub fn parse_with_formats(text: &str, formats: &[DateFormat]) -> Result<DateTime<Utc>, VcsError> {
    let text = text.trim();
    formats
        .iter()
        .find_map(|format| format.parse(text))
        .ok_or_else(|| {
            VcsError::ParseFailure(format!(
                "Unrecognized timestamp {:?} (expected one of {:?})",
                text, formats
            ))
        })
}
