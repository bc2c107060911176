//! Provider decorator applying inclusion and exclusion filters

use tracing::debug;

use super::SourceControl;
use crate::filter::ModificationFilter;
use crate::model::{IntegrationResult, Modification, Project};
use crate::vcs::VcsError;

/// Wraps a provider and drops modifications by filter.
///
/// A modification is kept when (no inclusion filter is configured or at
/// least one accepts it) and no exclusion filter accepts it.
pub struct FilteredSourceControl<S: SourceControl> {
    inner: S,
    inclusion_filters: Vec<Box<dyn ModificationFilter>>,
    exclusion_filters: Vec<Box<dyn ModificationFilter>>,
}

impl<S: SourceControl> FilteredSourceControl<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            inclusion_filters: Vec::new(),
            exclusion_filters: Vec::new(),
        }
    }

    pub fn include(mut self, filter: impl ModificationFilter + 'static) -> Self {
        self.inclusion_filters.push(Box::new(filter));
        self
    }

    pub fn exclude(mut self, filter: impl ModificationFilter + 'static) -> Self {
        self.exclusion_filters.push(Box::new(filter));
        self
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Whether `modification` survives the configured filters
    pub fn is_kept(&self, modification: &Modification) -> bool {
        let included = self.inclusion_filters.is_empty()
            || self.inclusion_filters.iter().any(|f| f.accept(modification));
        included && !self.exclusion_filters.iter().any(|f| f.accept(modification))
    }
}

impl<S: SourceControl> SourceControl for FilteredSourceControl<S> {
    fn get_modifications(
        &mut self,
        from: &IntegrationResult,
        to: &IntegrationResult,
    ) -> Result<Vec<Modification>, VcsError> {
        let modifications = self.inner.get_modifications(from, to)?;
        let total = modifications.len();

        let kept: Vec<Modification> = modifications
            .into_iter()
            .filter(|m| self.is_kept(m))
            .collect();
        debug!(total, kept = kept.len(), "applied modification filters");
        Ok(kept)
    }

    fn get_source(&mut self, result: &IntegrationResult) -> Result<(), VcsError> {
        self.inner.get_source(result)
    }

    fn label_source_control(&mut self, result: &IntegrationResult) -> Result<(), VcsError> {
        self.inner.label_source_control(result)
    }

    fn initialize(&mut self, project: &Project) -> Result<(), VcsError> {
        self.inner.initialize(project)
    }

    fn purge(&mut self, project: &Project) -> Result<(), VcsError> {
        self.inner.purge(project)
    }
}
