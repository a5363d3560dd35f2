//! Tests for the full recognize -> resolve -> synthesize path

use std::io::Write;
use tempfile::NamedTempFile;
use ticketlink_core::link::{GITHUB_LABEL, JIRA_LABEL};
use ticketlink_core::{
    LinkTarget, RawSettings, ResolvedConfig, Selection, TokenKind, resolve_selection, scan,
    synthesize,
};

fn settings(tracker: &str, repo: &str) -> ResolvedConfig {
    ResolvedConfig::from_settings(&RawSettings {
        tracker_base_url: tracker.to_string(),
        repo_base_url: repo.to_string(),
        ..RawSettings::default()
    })
}

fn target(label: &str, url: &str) -> LinkTarget {
    LinkTarget {
        label: label.to_string(),
        url: url.to_string(),
    }
}

#[test]
fn test_tracker_key_scenario() {
    let cfg = settings("https://x.atlassian.net", "https://github.com/o/r");
    assert_eq!(
        synthesize("ABC-123", &cfg),
        vec![target(JIRA_LABEL, "https://x.atlassian.net/browse/ABC-123")]
    );
}

#[test]
fn test_issue_scenario() {
    let cfg = settings("https://x.atlassian.net", "https://github.com/o/r");
    assert_eq!(
        synthesize("#42", &cfg),
        vec![target(GITHUB_LABEL, "https://github.com/o/r/issues/42")]
    );
}

#[test]
fn test_pull_request_scenario() {
    let cfg = settings("https://x.atlassian.net", "https://github.com/o/r");
    assert_eq!(
        synthesize("PR-9", &cfg),
        vec![target(GITHUB_LABEL, "https://github.com/o/r/pull/9")]
    );
}

#[test]
fn test_issue_without_repo_scenario() {
    let cfg = settings("https://x.atlassian.net", "");
    assert!(synthesize("#42", &cfg).is_empty());
}

#[test]
fn test_scan_then_synthesize_every_hit() {
    let cfg = settings("https://x.atlassian.net/browse/", "https://github.com/o/r/");
    let text = "Fixes ABC-7 (#12), follow-up in PR-30.\n#5 is a dup of XYZ9-1.";

    let links: Vec<(TokenKind, String)> = scan(text, &cfg)
        .flat_map(|hit| {
            let kind = hit.kind;
            synthesize(&hit.candidate.matched_text, &cfg)
                .into_iter()
                .map(move |t| (kind, t.url))
        })
        .collect();

    assert_eq!(
        links,
        vec![
            (
                TokenKind::TrackerKey,
                "https://x.atlassian.net/browse/ABC-7".to_string()
            ),
            (
                TokenKind::TrackerKey,
                "https://x.atlassian.net/browse/XYZ9-1".to_string()
            ),
            (
                TokenKind::IssueRef,
                "https://github.com/o/r/issues/5".to_string()
            ),
            (
                TokenKind::PullRequestRef,
                "https://github.com/o/r/pull/30".to_string()
            ),
        ]
    );
}

#[test]
fn test_every_scanned_range_points_at_its_text() {
    let cfg = settings("https://j", "https://g/o/r");
    let text = "  #1\tPR-2 ABC-3 #4 ";
    for hit in scan(text, &cfg) {
        let c = &hit.candidate;
        assert_eq!(&text[c.range()], c.matched_text);
        assert_eq!(c.end - c.start, c.matched_text.len());
        assert!(!c.matched_text.starts_with(char::is_whitespace));
    }
}

#[test]
fn test_selection_feeds_synthesis() {
    let cfg = settings("https://x.atlassian.net", "https://github.com/o/r");
    let text = "Blocked by ABC-123).";
    let start = text.find("ABC").unwrap();
    let token = resolve_selection(text, Selection::Range(start..text.len())).unwrap();
    assert_eq!(token, "ABC-123");
    assert_eq!(
        synthesize(&token, &cfg),
        vec![target(JIRA_LABEL, "https://x.atlassian.net/browse/ABC-123")]
    );
}

#[test]
fn test_settings_file_round_trip_into_links() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{ "ticketlink": {{ "trackerBaseUrl": " https://x.atlassian.net/ ", "repoBaseUrl": "https://github.com/o/r" }} }}"#
    )
    .unwrap();

    let raw = RawSettings::load(file.path()).unwrap();
    let cfg = ResolvedConfig::from_settings(&raw);
    assert_eq!(cfg.tracker_base_url, "https://x.atlassian.net/browse/");
    assert_eq!(cfg.repo_base_url, "https://github.com/o/r/");
}

#[test]
fn test_missing_settings_file_is_an_error() {
    let dir = tempfile::TempDir::new().unwrap();
    assert!(RawSettings::load(&dir.path().join("absent.json")).is_err());
}
