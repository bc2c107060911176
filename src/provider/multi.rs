//! Fan-out over several providers

use super::SourceControl;
use crate::model::{IntegrationResult, Modification, Project};
use crate::vcs::VcsError;

/// Aggregates child providers.
///
/// Modifications are concatenated in child order without deduplication.
/// Lifecycle calls go to every child in order; the first error stops the
/// broadcast.
#[derive(Default)]
pub struct MultiSourceControl {
    children: Vec<Box<dyn SourceControl>>,
    require_changes_from_all: bool,
}

impl MultiSourceControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, child: impl SourceControl + 'static) -> Self {
        self.children.push(Box::new(child));
        self
    }

    pub fn push(&mut self, child: Box<dyn SourceControl>) {
        self.children.push(child);
    }

    /// Report nothing unless every child reported at least one change
    pub fn require_changes_from_all(mut self, enabled: bool) -> Self {
        self.require_changes_from_all = enabled;
        self
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl SourceControl for MultiSourceControl {
    fn get_modifications(
        &mut self,
        from: &IntegrationResult,
        to: &IntegrationResult,
    ) -> Result<Vec<Modification>, VcsError> {
        let mut modifications = Vec::new();
        for child in &mut self.children {
            let found = child.get_modifications(from, to)?;
            if found.is_empty() && self.require_changes_from_all {
                return Ok(Vec::new());
            }
            modifications.extend(found);
        }
        Ok(modifications)
    }

    fn get_source(&mut self, result: &IntegrationResult) -> Result<(), VcsError> {
        self.children
            .iter_mut()
            .try_for_each(|child| child.get_source(result))
    }

    fn label_source_control(&mut self, result: &IntegrationResult) -> Result<(), VcsError> {
        self.children
            .iter_mut()
            .try_for_each(|child| child.label_source_control(result))
    }

    fn initialize(&mut self, project: &Project) -> Result<(), VcsError> {
        self.children
            .iter_mut()
            .try_for_each(|child| child.initialize(project))
    }

    fn purge(&mut self, project: &Project) -> Result<(), VcsError> {
        self.children
            .iter_mut()
            .try_for_each(|child| child.purge(project))
    }
}
