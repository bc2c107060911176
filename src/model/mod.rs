//! Data models for sourcewatch
//!
//! Provider-independent structures: the canonical change record and the
//! integration context providers are called with.

mod integration;
mod modification;

pub use integration::{BuildProgress, IntegrationResult, IntegrationStatus, Project};
pub use modification::{Modification, split_path};
