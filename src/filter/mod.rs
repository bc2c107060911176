//! Modification filters
//!
//! Filters are stateless predicates over one [`Modification`], composed by
//! [`MultiFilter`] and applied by
//! [`FilteredSourceControl`](crate::provider::FilteredSourceControl).

mod action;
mod comment;
mod multi;
mod path;
mod user;

pub use action::ActionFilter;
pub use comment::CommentFilter;
pub use multi::MultiFilter;
pub use path::PathFilter;
pub use user::UserFilter;

use std::fmt::Debug;

use crate::model::Modification;

/// Predicate deciding whether a modification matches
pub trait ModificationFilter: Debug + Send + Sync {
    fn accept(&self, modification: &Modification) -> bool;
}

impl<F: ModificationFilter + ?Sized> ModificationFilter for Box<F> {
    fn accept(&self, modification: &Modification) -> bool {
        (**self).accept(modification)
    }
}
