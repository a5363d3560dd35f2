//! Recognizers for the three ticket token shapes.
//!
//! Every kind has a *single* pattern that validates an already extracted word
//! and a *scanning* pattern that finds occurrences inside free text. The
//! single patterns are mutually exclusive: a tracker key may never start with
//! `PR-`, an issue reference needs a leading `#`, and a pull request needs
//! the literal `PR-` prefix.
//!
//! Digits and word boundaries are ASCII only, so every token is URL-safe as
//! matched.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

/// Prefix reserved for pull requests; tracker keys must not use it.
pub const PULL_REQUEST_PREFIX: &str = "PR-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenKind {
    TrackerKey,
    IssueRef,
    PullRequestRef,
}

impl TokenKind {
    pub const ALL: [TokenKind; 3] = [
        TokenKind::TrackerKey,
        TokenKind::IssueRef,
        TokenKind::PullRequestRef,
    ];

    pub fn pattern(self) -> &'static TokenPattern {
        match self {
            TokenKind::TrackerKey => &TRACKER_KEY,
            TokenKind::IssueRef => &ISSUE_REF,
            TokenKind::PullRequestRef => &PULL_REQUEST_REF,
        }
    }

    /// Whether `word` is, as a whole, a token of this kind.
    pub fn matches(self, word: &str) -> bool {
        let pattern = self.pattern();
        pattern.single.is_match(word) && !pattern.is_excluded(word)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::TrackerKey => "tracker-key",
            TokenKind::IssueRef => "issue",
            TokenKind::PullRequestRef => "pull-request",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct TokenPattern {
    pub kind: TokenKind,
    /// Anchored, whole-string validator.
    pub single: Regex,
    /// Unanchored finder. Group 1 is the significant token; group 2, when
    /// present, is its numeric suffix.
    pub scanning: Regex,
}

impl TokenPattern {
    fn new(kind: TokenKind, single: &str, scanning: &str) -> Self {
        Self {
            kind,
            single: Regex::new(single).expect("built-in single pattern must compile"),
            scanning: Regex::new(scanning).expect("built-in scanning pattern must compile"),
        }
    }

    /// Stands in for the `(?!PR-)` lookahead the `regex` crate cannot express.
    pub fn is_excluded(&self, token: &str) -> bool {
        self.kind == TokenKind::TrackerKey && token.starts_with(PULL_REQUEST_PREFIX)
    }
}

static TRACKER_KEY: Lazy<TokenPattern> = Lazy::new(|| {
    TokenPattern::new(
        TokenKind::TrackerKey,
        r"^[A-Z][A-Z0-9]+-[0-9]+$",
        r"(?-u:\b)([A-Z][A-Z0-9]+-[0-9]+)(?-u:\b)",
    )
});

static ISSUE_REF: Lazy<TokenPattern> = Lazy::new(|| {
    TokenPattern::new(
        TokenKind::IssueRef,
        r"^#[0-9]+$",
        r"(?:^|\s)(#([0-9]+))(?-u:\b)",
    )
});

static PULL_REQUEST_REF: Lazy<TokenPattern> = Lazy::new(|| {
    TokenPattern::new(
        TokenKind::PullRequestRef,
        r"^PR-[0-9]+$",
        r"(?-u:\b)(PR-([0-9]+))(?-u:\b)",
    )
});

/// Returns the kinds whose single pattern accepts `word`, in synthesis order.
///
/// By construction this yields at most one kind.
pub fn matching_kinds(word: &str) -> impl Iterator<Item = TokenKind> + '_ {
    TokenKind::ALL.into_iter().filter(move |kind| kind.matches(word))
}

pub fn classify(word: &str) -> Option<TokenKind> {
    matching_kinds(word).next()
}

/// Numeric suffix of an issue or pull request token (`#42` -> `42`,
/// `PR-9` -> `9`). Tracker keys have no separate number.
pub fn numeric_suffix(kind: TokenKind, token: &str) -> Option<&str> {
    match kind {
        TokenKind::TrackerKey => None,
        TokenKind::IssueRef => token.strip_prefix('#'),
        TokenKind::PullRequestRef => token.strip_prefix(PULL_REQUEST_PREFIX),
    }
}
