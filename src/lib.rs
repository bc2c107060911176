//! sourcewatch - change detection for continuous integration
//!
//! Polls version control tools, normalizes what they report into
//! [`model::Modification`]s and decides when a change set is settled enough
//! to build.
//!
//! This library provides:
//! - [`model`]: Modification and integration context types
//! - [`vcs`]: Process execution and history parsers
//! - [`provider`]: Source control providers, quiet period and retry
//! - [`filter`]: Modification filters
//! - [`issue`]: Issue tracker and web links
//! - [`config`]: Settings structs

pub mod config;
pub mod filter;
pub mod issue;
pub mod model;
pub mod provider;
pub mod vcs;
