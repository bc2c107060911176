use super::IssueUrlBuilder;
use crate::model::Modification;

/// Runs several builders in order; a later builder overwrites the link set
/// by an earlier one
#[derive(Debug, Default)]
pub struct MultiIssueTrackerUrlBuilder {
    builders: Vec<Box<dyn IssueUrlBuilder>>,
}

impl MultiIssueTrackerUrlBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, builder: impl IssueUrlBuilder + 'static) -> Self {
        self.builders.push(Box::new(builder));
        self
    }
}

impl IssueUrlBuilder for MultiIssueTrackerUrlBuilder {
    fn setup_modifications(&self, modifications: &mut [Modification]) {
        for builder in &self.builders {
            builder.setup_modifications(modifications);
        }
    }
}
