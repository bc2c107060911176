use super::{ISSUE_PLACEHOLDER, IssueUrlBuilder};
use crate::model::Modification;

/// Links comments that start with an issue key such as `CCNET-1223:`.
///
/// The number is the last run of digits in the first word of the comment
/// and replaces `{0}` in the URL template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultIssueTrackerUrlBuilder {
    url: String,
}

impl DefaultIssueTrackerUrlBuilder {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Trailing digit run of the first whitespace-delimited token
fn issue_number(comment: &str) -> Option<&str> {
    let token = comment.split_whitespace().next()?;
    let end = token.rfind(|c: char| c.is_ascii_digit())? + 1;
    let start = token[..end]
        .char_indices()
        .rev()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(0, |(i, c)| i + c.len_utf8());
    Some(&token[start..end])
}

impl IssueUrlBuilder for DefaultIssueTrackerUrlBuilder {
    fn setup_modifications(&self, modifications: &mut [Modification]) {
        for modification in modifications {
            let Some(number) = modification.comment.as_deref().and_then(issue_number) else {
                continue;
            };
            modification.issue_url = Some(self.url.replace(ISSUE_PLACEHOLDER, number));
        }
    }
}
