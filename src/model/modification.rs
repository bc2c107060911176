//! Modification (canonical change record) data model

use chrono::{DateTime, Utc};

/// One normalized change reported by a source control provider.
///
/// Every provider, whatever its native output looks like, reduces its
/// history to a list of these. A record may describe a directory, in which
/// case `file_name` is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modification {
    /// Provider-defined classification ("added", "Modified", "checkin", ...)
    pub kind: String,

    pub file_name: String,

    /// Directory part of the path, `/`-separated (may be empty)
    pub folder_name: String,

    /// When the change happened (always UTC)
    pub modified_time: DateTime<Utc>,

    pub user_name: String,

    pub email_address: Option<String>,

    pub comment: Option<String>,

    /// Opaque revision identifier, only comparable within one provider
    pub change_number: String,

    /// Per-file revision (e.g. CVS "1.4")
    pub version: String,

    /// Direct web link to the change, set by a web url builder
    pub url: Option<String>,

    /// Issue tracker link derived from the comment
    pub issue_url: Option<String>,
}

impl Default for Modification {
    fn default() -> Self {
        Self {
            kind: String::new(),
            file_name: String::new(),
            folder_name: String::new(),
            modified_time: DateTime::<Utc>::UNIX_EPOCH,
            user_name: String::new(),
            email_address: None,
            comment: None,
            change_number: String::new(),
            version: String::new(),
            url: None,
            issue_url: None,
        }
    }
}

impl Modification {
    /// Create a record for `path` at `modified_time`, splitting the path into
    /// folder and file name.
    pub fn new(kind: impl Into<String>, path: &str, modified_time: DateTime<Utc>) -> Self {
        let (folder_name, file_name) = split_path(path);
        Self {
            kind: kind.into(),
            file_name,
            folder_name,
            modified_time,
            ..Default::default()
        }
    }

    /// Folder and file joined with `/`, with `\` separators normalized.
    ///
    /// An empty folder yields the bare file name.
    pub fn full_path(&self) -> String {
        let folder = self.folder_name.replace('\\', "/");
        let file = self.file_name.replace('\\', "/");

        if folder.is_empty() {
            file
        } else if file.is_empty() {
            folder
        } else if folder.ends_with('/') {
            format!("{}{}", folder, file)
        } else {
            format!("{}/{}", folder, file)
        }
    }

    /// Whether `modified_time` lies in the inclusive window `[from, to]`
    pub fn is_within(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> bool {
        from <= self.modified_time && self.modified_time <= to
    }

    /// Comment text, or "" when the provider reported none
    pub fn comment_text(&self) -> &str {
        self.comment.as_deref().unwrap_or_default()
    }

    /// Change number of the most recent modification in `modifications`.
    ///
    /// Adapters that cache "last known remote revision" use this after a poll.
    pub fn last_change_number(modifications: &[Modification]) -> Option<&str> {
        modifications
            .iter()
            .max_by_key(|m| m.modified_time)
            .map(|m| m.change_number.as_str())
    }

    /// Most recent `modified_time` in `modifications`
    pub fn latest_time(modifications: &[Modification]) -> Option<DateTime<Utc>> {
        modifications.iter().map(|m| m.modified_time).max()
    }
}

/// Split a `/`-separated path into (folder, file name).
///
/// `"src/lib/main.c"` -> `("src/lib", "main.c")`, `"main.c"` -> `("", "main.c")`
pub fn split_path(path: &str) -> (String, String) {
    match path.rfind('/') {
        Some(idx) => (path[..idx].to_string(), path[idx + 1..].to_string()),
        None => (String::new(), path.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2004, 12, 1, h, m, s).unwrap()
    }

    #[test]
    fn test_new_splits_path() {
        let m = Modification::new("added", "project/core/Project.cs", at(12, 0, 0));
        assert_eq!(m.folder_name, "project/core");
        assert_eq!(m.file_name, "Project.cs");
        assert_eq!(m.kind, "added");
    }

    #[test]
    fn test_new_without_folder() {
        let m = Modification::new("added", "build.sh", at(12, 0, 0));
        assert_eq!(m.folder_name, "");
        assert_eq!(m.file_name, "build.sh");
    }

    #[test]
    fn test_full_path_normalizes_separators() {
        let m = Modification {
            file_name: "theName.dav".to_string(),
            folder_name: "\\theFolder\\theSubFolder".to_string(),
            ..Default::default()
        };
        assert_eq!(m.full_path(), "/theFolder/theSubFolder/theName.dav");
    }

    #[test]
    fn test_full_path_trailing_slash_folder() {
        let m = Modification {
            file_name: "project.info".to_string(),
            folder_name: "/".to_string(),
            ..Default::default()
        };
        assert_eq!(m.full_path(), "/project.info");
    }

    #[test]
    fn test_full_path_directory_record() {
        let m = Modification {
            folder_name: "src/module".to_string(),
            ..Default::default()
        };
        assert_eq!(m.full_path(), "src/module");
    }

    #[test]
    fn test_is_within_inclusive_bounds() {
        let m = Modification::new("modified", "a", at(12, 1, 0));
        assert!(m.is_within(at(12, 1, 0), at(12, 1, 0)));
        assert!(m.is_within(at(12, 0, 0), at(12, 2, 0)));
        assert!(!m.is_within(at(12, 1, 1), at(12, 2, 0)));
        assert!(!m.is_within(at(12, 0, 0), at(12, 0, 59)));
    }

    #[test]
    fn test_last_change_number_picks_newest() {
        let mut older = Modification::new("modified", "a", at(12, 0, 0));
        older.change_number = "10".to_string();
        let mut newer = Modification::new("modified", "b", at(12, 5, 0));
        newer.change_number = "12".to_string();

        let mods = vec![newer, older];
        assert_eq!(Modification::last_change_number(&mods), Some("12"));
        assert_eq!(Modification::last_change_number(&[]), None);
    }

    #[test]
    fn test_comment_text_defaults_to_empty() {
        let m = Modification::default();
        assert_eq!(m.comment_text(), "");
    }
}
