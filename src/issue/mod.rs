//! Issue tracker and web links for modifications
//!
//! Issue URL builders derive [`Modification::issue_url`] from the comment;
//! [`WebUrlBuilder`] derives [`Modification::url`] from path and change
//! number. A comment without a recognizable issue leaves the link unset.

mod default;
mod multi;
mod pattern;
mod web;

pub use default::DefaultIssueTrackerUrlBuilder;
pub use multi::MultiIssueTrackerUrlBuilder;
pub use pattern::RegexIssueTrackerUrlBuilder;
pub use web::WebUrlBuilder;

use std::fmt::Debug;

use crate::model::Modification;

/// Sets `issue_url` on the modifications it recognizes
pub trait IssueUrlBuilder: Debug + Send + Sync {
    fn setup_modifications(&self, modifications: &mut [Modification]);
}

impl<B: IssueUrlBuilder + ?Sized> IssueUrlBuilder for Box<B> {
    fn setup_modifications(&self, modifications: &mut [Modification]) {
        (**self).setup_modifications(modifications)
    }
}

/// Placeholder replaced by the issue number in URL templates
const ISSUE_PLACEHOLDER: &str = "{0}";
