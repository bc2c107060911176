use super::ModificationFilter;
use crate::model::Modification;

/// Matches modifications made by one of the configured users
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    names: Vec<String>,
}

impl UserFilter {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl ModificationFilter for UserFilter {
    fn accept(&self, modification: &Modification) -> bool {
        self.names.iter().any(|name| *name == modification.user_name)
    }
}
