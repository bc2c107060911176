use super::ModificationFilter;
use crate::model::Modification;

/// Matches modifications whose type is one of the configured actions
/// (ASCII case-insensitive)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionFilter {
    actions: Vec<String>,
}

impl ActionFilter {
    pub fn new<I, S>(actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            actions: actions.into_iter().map(Into::into).collect(),
        }
    }
}

impl ModificationFilter for ActionFilter {
    fn accept(&self, modification: &Modification) -> bool {
        self.actions
            .iter()
            .any(|action| action.eq_ignore_ascii_case(&modification.kind))
    }
}
