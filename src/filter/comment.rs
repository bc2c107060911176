use regex::Regex;

use super::ModificationFilter;
use crate::model::Modification;
use crate::vcs::VcsError;

/// Matches modifications whose comment matches a regular expression.
///
/// A modification without a comment never matches.
#[derive(Debug, Clone)]
pub struct CommentFilter {
    pattern: Regex,
}

impl CommentFilter {
    pub fn new(pattern: &str) -> Result<Self, VcsError> {
        let pattern = Regex::new(pattern).map_err(|e| {
            VcsError::Configuration(format!("Invalid comment filter pattern {:?}: {}", pattern, e))
        })?;
        Ok(Self { pattern })
    }
}

impl ModificationFilter for CommentFilter {
    fn accept(&self, modification: &Modification) -> bool {
        modification
            .comment
            .as_deref()
            .is_some_and(|comment| self.pattern.is_match(comment))
    }
}
