use regex::Regex;

use super::IssueUrlBuilder;
use crate::model::Modification;
use crate::vcs::VcsError;

/// Builds the issue URL by regex find/replace over the whole comment.
///
/// `replace` may refer to capture groups (`$1`, `${name}`). Comments the
/// pattern does not match are left alone.
#[derive(Debug, Clone)]
pub struct RegexIssueTrackerUrlBuilder {
    find: Regex,
    replace: String,
}

impl RegexIssueTrackerUrlBuilder {
    pub fn new(find: &str, replace: impl Into<String>) -> Result<Self, VcsError> {
        let find = Regex::new(find).map_err(|e| {
            VcsError::Configuration(format!("Invalid issue pattern {:?}: {}", find, e))
        })?;
        Ok(Self {
            find,
            replace: replace.into(),
        })
    }
}

impl IssueUrlBuilder for RegexIssueTrackerUrlBuilder {
    fn setup_modifications(&self, modifications: &mut [Modification]) {
        for modification in modifications {
            let Some(comment) = modification.comment.as_deref() else {
                continue;
            };
            if self.find.is_match(comment) {
                let url = self.find.replace_all(comment, self.replace.as_str());
                modification.issue_url = Some(url.into_owned());
            }
        }
    }
}
