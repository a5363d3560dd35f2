//! Finds every ticket token in a document.
//!
//! Each kind's scanning pattern runs independently over the whole text with
//! leftmost-first, non-overlapping semantics; the three result sets are
//! chained. Reported offsets are byte offsets of the significant token only,
//! never of the context a pattern consumes to enforce its boundary rule.

use crate::config::ResolvedConfig;
use crate::pattern::TokenKind;
use regex::Captures;
use serde::Serialize;
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchCandidate {
    pub matched_text: String,
    pub start: usize,
    pub end: usize,
}

impl MatchCandidate {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanHit {
    pub kind: TokenKind,
    pub candidate: MatchCandidate,
}

/// Lazily yields all hits in `text`. Yields nothing when no base URL is
/// configured since nothing could be linked anyway.
pub fn scan<'t>(
    text: &'t str,
    config: &ResolvedConfig,
) -> impl Iterator<Item = ScanHit> + use<'t> {
    let enabled = config.has_any_base();
    TokenKind::ALL
        .into_iter()
        .filter(move |_| enabled)
        .flat_map(move |kind| scan_kind(kind, text))
}

/// All hits of a single kind, independent of configuration.
pub fn scan_kind(kind: TokenKind, text: &str) -> impl Iterator<Item = ScanHit> + '_ {
    let pattern = kind.pattern();
    pattern.scanning.captures_iter(text).filter_map(move |caps| {
        let span = significant_span(&caps)?;
        let matched = &text[span.clone()];
        if pattern.is_excluded(matched) {
            return None;
        }
        Some(ScanHit {
            kind,
            candidate: MatchCandidate {
                matched_text: matched.to_string(),
                start: span.start,
                end: span.end,
            },
        })
    })
}

/// Narrows a scanning match to its significant token (capture group 1),
/// dropping leading whitespace or other consumed context.
pub fn significant_span(caps: &Captures<'_>) -> Option<Range<usize>> {
    caps.get(1).map(|m| m.range())
}
