//! Common test utilities for integration and scenario tests.
//!
//! This module provides a fake clock, scripted providers and process
//! runners, and temporary workspaces.
//!
//! Note: Each integration test file compiles as a separate crate,
//! so not all helpers are used in every test file. We suppress
//! dead_code warnings at the module level.

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod clock;
pub mod scripted;
pub mod workspace;

pub use clock::FakeClock;
pub use scripted::{CallLog, ScriptedRunner, ScriptedSourceControl};
pub use workspace::Workspace;

use chrono::{DateTime, TimeZone, Utc};
use sourcewatch::model::Modification;

/// 2004-12-01 at the given time of day, UTC
pub fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2004, 12, 1, h, m, s).unwrap()
}

/// A modification of `path` at `time`
pub fn modification(path: &str, time: DateTime<Utc>) -> Modification {
    Modification::new("modified", path, time)
}

/// Render modifications one per line for snapshot comparisons
pub fn render(modifications: &[Modification]) -> String {
    modifications
        .iter()
        .map(|m| {
            format!(
                "{} {} {} {} {}",
                m.modified_time.format("%Y-%m-%d %H:%M:%S"),
                m.kind,
                m.full_path(),
                m.user_name,
                m.change_number
            )
            .trim_end()
            .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
