//! Source control providers
//!
//! A provider answers "what changed between two integrations?" for one
//! repository and can materialize or label it. Providers compose: the
//! filtered and multi variants wrap other providers, and [`QuietPeriod`]
//! drives any provider until its change set settles.

mod external;
mod filesystem;
mod filtered;
mod multi;
mod process;
mod quiet_period;
mod retry;

pub use external::{ExternalCommand, ExternalSourceControl};
pub use filesystem::FileSourceControl;
pub use filtered::FilteredSourceControl;
pub use multi::MultiSourceControl;
pub use process::{ProcessAdapter, ProcessSourceControl};
pub use quiet_period::{Clock, QuietPeriod, SystemClock};
pub use retry::execute_with_retries;

use crate::model::{IntegrationResult, Modification, Project};
use crate::vcs::VcsError;

/// Capability set every provider implements.
///
/// `from` is the last integration and `to` the one being considered; their
/// `start_time`s bound the query window. Lifecycle hooks default to no-ops.
pub trait SourceControl: Send {
    fn get_modifications(
        &mut self,
        from: &IntegrationResult,
        to: &IntegrationResult,
    ) -> Result<Vec<Modification>, VcsError>;

    /// Bring the working directory of `result` up to date
    fn get_source(&mut self, _result: &IntegrationResult) -> Result<(), VcsError> {
        Ok(())
    }

    /// Tag the repository with the label of `result`
    fn label_source_control(&mut self, _result: &IntegrationResult) -> Result<(), VcsError> {
        Ok(())
    }

    fn initialize(&mut self, _project: &Project) -> Result<(), VcsError> {
        Ok(())
    }

    fn purge(&mut self, _project: &Project) -> Result<(), VcsError> {
        Ok(())
    }
}

impl<S: SourceControl + ?Sized> SourceControl for Box<S> {
    fn get_modifications(
        &mut self,
        from: &IntegrationResult,
        to: &IntegrationResult,
    ) -> Result<Vec<Modification>, VcsError> {
        (**self).get_modifications(from, to)
    }

    fn get_source(&mut self, result: &IntegrationResult) -> Result<(), VcsError> {
        (**self).get_source(result)
    }

    fn label_source_control(&mut self, result: &IntegrationResult) -> Result<(), VcsError> {
        (**self).label_source_control(result)
    }

    fn initialize(&mut self, project: &Project) -> Result<(), VcsError> {
        (**self).initialize(project)
    }

    fn purge(&mut self, project: &Project) -> Result<(), VcsError> {
        (**self).purge(project)
    }
}
