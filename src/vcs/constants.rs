//! Source control constants
//!
//! Centralized defaults, keywords and formats shared by providers and parsers.

/// Default timeout for an external source control command (10 minutes)
pub const DEFAULT_TIMEOUT_MS: u64 = 600_000;

/// Process execution
pub mod process {
    /// How often a running child is polled for exit
    pub const POLL_INTERVAL_MS: u64 = 10;
    /// Replacement text for secret arguments in logs
    pub const MASK: &str = "********";
    /// Exit code reported when the OS gives none (killed by signal)
    pub const UNKNOWN_EXIT_CODE: i32 = -1;
}

/// Retry wrapper defaults
pub mod retry {
    pub const DEFAULT_ATTEMPTS: u32 = 5;
    pub const DEFAULT_WAIT_SECONDS: u64 = 5;
}

/// Quiet period defaults
pub mod quiet_period {
    /// 0 disables the quiet period
    pub const DEFAULT_MODIFICATION_DELAY_SECONDS: u64 = 0;
    /// Remaining waits shorter than this are not worth sleeping for
    pub const MIN_SLEEP_MS: i64 = 100;
}

/// Canonical modification types used by the bundled parsers
pub mod kinds {
    pub const ADDED: &str = "Added";
    pub const MODIFIED: &str = "Modified";
    pub const DELETED: &str = "Deleted";
    pub const REPLACED: &str = "Replaced";
    pub const RENAMED: &str = "Renamed";
    pub const COPIED: &str = "Copied";
    pub const TYPE_CHANGED: &str = "TypeChanged";
    pub const UNMERGED: &str = "Unmerged";
    pub const UNKNOWN: &str = "Unknown";
}

/// Commands understood by the external source control protocol
pub mod external {
    pub const GET_MODIFICATIONS: &str = "GETMODS";
    pub const GET_SOURCE: &str = "GETSOURCE";
    pub const SET_LABEL: &str = "SETLABEL";
    /// Date format of the timestamps passed on the command line
    pub const COMMAND_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
}
