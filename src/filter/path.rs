//! Path glob filter
//!
//! Pattern syntax, matched against [`Modification::full_path`]:
//!
//! - `*` any run of characters inside one path segment
//! - `?` one character inside a segment
//! - `**` any number of directories, including none
//! - a whole segment `*.*` matches any name, with or without an extension
//! - `\` is treated as `/` in both the pattern and the path

use regex::{Regex, RegexBuilder};

use super::ModificationFilter;
use crate::model::Modification;
use crate::vcs::VcsError;

/// Matches modifications whose path matches a glob pattern
#[derive(Debug, Clone)]
pub struct PathFilter {
    pattern: String,
    regex: Regex,
    case_sensitive: bool,
}

impl PathFilter {
    /// Case-sensitive filter for `pattern`
    pub fn new(pattern: &str) -> Result<Self, VcsError> {
        let pattern = pattern.replace('\\', "/");
        let regex = compile(&pattern, true)?;
        Ok(Self {
            pattern,
            regex,
            case_sensitive: true,
        })
    }

    pub fn case_sensitive(self, case_sensitive: bool) -> Result<Self, VcsError> {
        let regex = compile(&self.pattern, case_sensitive)?;
        Ok(Self {
            regex,
            case_sensitive,
            ..self
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Whether `path` (either separator style) matches the pattern
    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(&path.replace('\\', "/"))
    }
}

impl ModificationFilter for PathFilter {
    fn accept(&self, modification: &Modification) -> bool {
        self.matches(&modification.full_path())
    }
}

fn compile(pattern: &str, case_sensitive: bool) -> Result<Regex, VcsError> {
    RegexBuilder::new(&glob_to_regex(pattern))
        .case_insensitive(!case_sensitive)
        .build()
        .map_err(|e| VcsError::Configuration(format!("Invalid path pattern {:?}: {}", pattern, e)))
}

/// Translate a `/`-separated glob into an anchored regex
fn glob_to_regex(pattern: &str) -> String {
    let segments: Vec<&str> = pattern.split('/').collect();
    let last = segments.len() - 1;
    let mut regex = String::from("^");

    for (i, segment) in segments.iter().enumerate() {
        match *segment {
            "**" if i == last && regex.ends_with('/') => {
                // "dir/**" also matches "dir" itself; undo the separator
                regex.pop();
                regex.push_str("(?:/.*)?");
            }
            "**" if i == last => regex.push_str(".*"),
            "**" => {
                regex.push_str("(?:.*/)?");
                continue;
            }
            "*.*" => regex.push_str("[^/]*"),
            _ => {
                for c in segment.chars() {
                    match c {
                        '*' => regex.push_str("[^/]*"),
                        '?' => regex.push_str("[^/]"),
                        _ => regex.push_str(&regex::escape(c.encode_utf8(&mut [0u8; 4]))),
                    }
                }
            }
        }
        if i != last {
            regex.push('/');
        }
    }

    regex.push('$');
    regex
}
