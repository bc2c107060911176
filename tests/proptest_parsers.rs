//! Property-based tests for history parsers and path filters
//!
//! Uses proptest to verify parsers handle arbitrary input without panicking.
//! Reference: https://lib.rs/crates/proptest

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use sourcewatch::filter::PathFilter;
use sourcewatch::issue::{DefaultIssueTrackerUrlBuilder, IssueUrlBuilder};
use sourcewatch::model::{Modification, split_path};
use sourcewatch::vcs::parser::{
    CvsHistoryParser, GitHistoryParser, HistoryParser, ModificationXmlParser, SvnHistoryParser,
};

fn parse(parser: &dyn HistoryParser, input: &str) {
    let from = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
    let to = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
    // Ok or Err, never a panic
    let _ = parser.parse(input, from, to);
}

// =============================================================================
// Strategy generators for realistic-ish tool output
// =============================================================================

/// Generate a git commit hash (40 hex chars)
fn commit_hash_strategy() -> impl Strategy<Value = String> {
    "[a-f0-9]{40}".prop_map(|s| s.to_string())
}

/// Generate a relative file path with an extension
fn file_path_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,8}(/[a-z_]{1,8}){0,3}\\.[a-z]{1,3}".prop_map(|s| s.to_string())
}

/// Generate a user name
fn author_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,11}".prop_map(|s| s.to_string())
}

/// Generate a single line commit message (no colons, no tabs)
fn message_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9][a-zA-Z0-9 .,_-]{0,60}".prop_map(|s| s.to_string())
}

/// Generate (hour, minute, second)
fn time_of_day_strategy() -> impl Strategy<Value = (u32, u32, u32)> {
    (0u32..24, 0u32..60, 0u32..60)
}

// =============================================================================
// Robustness tests: parsers should never panic on arbitrary input
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// CVS parser should not panic on arbitrary input
    #[test]
    fn cvs_parser_does_not_panic(input in ".*") {
        parse(&CvsHistoryParser, &input);
    }

    /// SVN parser should not panic on arbitrary input
    #[test]
    fn svn_parser_does_not_panic(input in ".*") {
        parse(&SvnHistoryParser, &input);
    }

    /// git parser should not panic on arbitrary input
    #[test]
    fn git_parser_does_not_panic(input in ".*") {
        parse(&GitHistoryParser, &input);
    }

    /// Modification list parser should not panic on arbitrary input
    #[test]
    fn modification_xml_parser_does_not_panic(input in ".*") {
        parse(&ModificationXmlParser, &input);
    }

    /// Path filters should compile from any pattern without panicking
    #[test]
    fn path_filter_does_not_panic(pattern in ".*", path in ".*") {
        if let Ok(filter) = PathFilter::new(&pattern) {
            let _ = filter.matches(&path);
        }
    }

    /// Issue links should never panic on arbitrary comments
    #[test]
    fn issue_url_builder_does_not_panic(comment in ".*") {
        let mut mods = vec![Modification {
            comment: Some(comment),
            ..Default::default()
        }];
        DefaultIssueTrackerUrlBuilder::new("http://x/{0}").setup_modifications(&mut mods);
        if let Some(url) = &mods[0].issue_url {
            prop_assert!(url.starts_with("http://x/"));
        }
    }
}

// =============================================================================
// Structured input tests: parsers handle well-formed input correctly
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// A well-formed git commit yields one modification with its fields
    #[test]
    fn git_parser_handles_structured_input(
        hash in commit_hash_strategy(),
        author in author_strategy(),
        message in message_strategy(),
        path in file_path_strategy(),
        (hour, minute, second) in time_of_day_strategy(),
    ) {
        let output = format!(
            "Commit:{hash}\nTime:2009-06-13 {hour:02}:{minute:02}:{second:02} +0000\nAuthor:{author}\nE-Mail:{author}@example.com\nMessage:{message}\n\nChanges:\nM\t{path}\n"
        );

        let mods = GitHistoryParser
            .parse(&output, Utc::now(), Utc::now())
            .unwrap();

        prop_assert_eq!(mods.len(), 1);
        let (folder, file) = split_path(&path);
        prop_assert_eq!(&mods[0].folder_name, &folder);
        prop_assert_eq!(&mods[0].file_name, &file);
        prop_assert_eq!(mods[0].full_path(), path);
        prop_assert_eq!(&mods[0].change_number, &hash);
        prop_assert_eq!(&mods[0].user_name, &author);
        prop_assert_eq!(mods[0].comment.as_deref(), Some(message.trim_end()));
        prop_assert_eq!(
            mods[0].modified_time,
            Utc.with_ymd_and_hms(2009, 6, 13, hour, minute, second).unwrap()
        );
    }

    /// A well-formed CVS file block yields one modification per revision
    #[test]
    fn cvs_parser_handles_structured_input(
        path in file_path_strategy(),
        author in author_strategy(),
        comment in message_strategy(),
        minor in 2u32..100,
        (hour, minute, second) in time_of_day_strategy(),
    ) {
        let output = format!(
            "RCS file: /cvsroot/{path},v\nWorking file: {path}\nhead: 1.{minor}\ndescription:\n----------------------------\nrevision 1.{minor}\ndate: 2002/03/15 {hour:02}:{minute:02}:{second:02};  author: {author};  state: Exp;  lines: +1 -1\n{comment}\n=============================================================================\n"
        );

        let mods = CvsHistoryParser
            .parse(&output, Utc::now(), Utc::now())
            .unwrap();

        prop_assert_eq!(mods.len(), 1);
        prop_assert_eq!(mods[0].full_path(), path);
        prop_assert_eq!(&mods[0].kind, "modified");
        prop_assert_eq!(&mods[0].user_name, &author);
        prop_assert_eq!(&mods[0].version, &format!("1.{minor}"));
        prop_assert_eq!(mods[0].comment.as_deref(), Some(comment.as_str()));
    }

    /// `**/*.*` accepts every path
    #[test]
    fn any_path_matches_catch_all_pattern(path in "[a-zA-Z0-9_./-]{0,60}") {
        let filter = PathFilter::new("**/*.*").unwrap();
        prop_assert!(filter.matches(&path));
    }

    /// A literal pattern matches exactly its own path
    #[test]
    fn literal_pattern_matches_itself(path in file_path_strategy()) {
        let filter = PathFilter::new(&path).unwrap();
        prop_assert!(filter.matches(&path));
        let other = format!("{path}x");
        prop_assert!(!filter.matches(&other));
    }
}

// =============================================================================
// Edge cases
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// git parser handles many changed paths in one commit
    #[test]
    fn git_parser_handles_many_changes(count in 1usize..200) {
        let changes: String = (0..count).map(|i| format!("A\tsrc/file{i}.rs\n")).collect();
        let output = format!(
            "Commit:abc\nTime:2009-06-13 10:37:42 +0000\nAuthor:a\nMessage:bulk\nChanges:\n{changes}"
        );
        let mods = GitHistoryParser.parse(&output, Utc::now(), Utc::now()).unwrap();
        prop_assert_eq!(mods.len(), count);
    }

    /// Parsers handle long lines
    #[test]
    fn parsers_handle_long_lines(len in 100usize..10000) {
        let line = "x".repeat(len);
        parse(&CvsHistoryParser, &line);
        parse(&GitHistoryParser, &line);
        parse(&SvnHistoryParser, &line);
    }

    /// Parsers handle unicode
    #[test]
    fn parsers_handle_unicode(s in "\\PC{1,100}") {
        parse(&CvsHistoryParser, &s);
        parse(&GitHistoryParser, &s);
        parse(&SvnHistoryParser, &s);
        parse(&ModificationXmlParser, &s);
    }
}
