use crate::config::ResolvedConfig;
use crate::pattern::{TokenKind, matching_kinds, numeric_suffix};
use serde::Serialize;

pub const JIRA_LABEL: &str = "Open in Jira";
pub const GITHUB_LABEL: &str = "Open in GitHub";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkTarget {
    pub label: String,
    pub url: String,
}

impl LinkTarget {
    fn new(label: &str, url: String) -> Self {
        Self {
            label: label.to_string(),
            url,
        }
    }
}

/// Destination for `token` read as a token of `kind`, if its base URL is
/// configured.
pub fn target_for(kind: TokenKind, token: &str, config: &ResolvedConfig) -> Option<LinkTarget> {
    match kind {
        TokenKind::TrackerKey if config.has_tracker() => Some(LinkTarget::new(
            JIRA_LABEL,
            format!("{}{}", config.tracker_base_url, token),
        )),
        TokenKind::IssueRef if config.has_repo() => {
            let number = numeric_suffix(kind, token)?;
            Some(LinkTarget::new(
                GITHUB_LABEL,
                format!("{}issues/{}", config.repo_base_url, number),
            ))
        }
        TokenKind::PullRequestRef if config.has_repo() => {
            let number = numeric_suffix(kind, token)?;
            Some(LinkTarget::new(
                GITHUB_LABEL,
                format!("{}pull/{}", config.repo_base_url, number),
            ))
        }
        _ => None,
    }
}

/// Maps a token to its link targets. Jira targets always come before GitHub
/// targets; an unknown token or a missing base URL gives an empty list.
pub fn synthesize(token: &str, config: &ResolvedConfig) -> Vec<LinkTarget> {
    matching_kinds(token)
        .filter_map(|kind| target_for(kind, token, config))
        .collect()
}

pub fn first_target(token: &str, config: &ResolvedConfig) -> Option<LinkTarget> {
    synthesize(token, config).into_iter().next()
}
