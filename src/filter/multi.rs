use super::ModificationFilter;
use crate::model::Modification;

/// Conjunction of filters. An empty conjunction matches nothing.
#[derive(Debug, Default)]
pub struct MultiFilter {
    filters: Vec<Box<dyn ModificationFilter>>,
}

impl MultiFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, filter: impl ModificationFilter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }
}

impl ModificationFilter for MultiFilter {
    fn accept(&self, modification: &Modification) -> bool {
        !self.filters.is_empty() && self.filters.iter().all(|f| f.accept(modification))
    }
}
