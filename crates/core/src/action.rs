//! User-initiated actions: copy a token's URL, open it in a browser.
//!
//! The clipboard and the browser belong to the host. They are reached through
//! [`Host`] so the decision logic stays testable without an editor.

use crate::config::ResolvedConfig;
use crate::link::first_target;
use async_trait::async_trait;

pub const NO_LINK_WARNING: &str = "No Jira/GitHub reference found or base URL not set.";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct HostError(pub String);

#[async_trait]
pub trait Host: Send + Sync {
    async fn write_clipboard(&self, text: &str) -> Result<(), HostError>;
    async fn open_external(&self, url: &str) -> Result<(), HostError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Nothing to act on and nothing worth telling the user.
    Skipped,
    /// No token could be resolved for an action that requires one.
    NoToken,
    NoLink { token: String },
    Copied { url: String },
    Opened { url: String },
    HostFailed { url: String, reason: String },
}

impl ActionOutcome {
    /// The transient message the host should show, if any.
    pub fn message(&self) -> Option<(MessageLevel, String)> {
        match self {
            ActionOutcome::Skipped | ActionOutcome::Opened { .. } => None,
            ActionOutcome::NoToken | ActionOutcome::NoLink { .. } => {
                Some((MessageLevel::Warning, NO_LINK_WARNING.to_string()))
            }
            ActionOutcome::Copied { url } => Some((MessageLevel::Info, format!("Copied: {}", url))),
            ActionOutcome::HostFailed { url, reason } => Some((
                MessageLevel::Warning,
                format!("Could not handle {}: {}", url, reason),
            )),
        }
    }
}

/// Writes the first link of `token` to the clipboard. Without a token this
/// is a silent no-op.
pub async fn copy_url(
    host: &dyn Host,
    token: Option<&str>,
    config: &ResolvedConfig,
) -> ActionOutcome {
    let Some(token) = token else {
        return ActionOutcome::Skipped;
    };
    let Some(target) = first_target(token, config) else {
        return ActionOutcome::NoLink {
            token: token.to_string(),
        };
    };
    match host.write_clipboard(&target.url).await {
        Ok(()) => {
            tracing::info!("copied {} for {}", target.url, token);
            ActionOutcome::Copied { url: target.url }
        }
        Err(e) => {
            tracing::warn!("clipboard write failed for {}: {}", target.url, e);
            ActionOutcome::HostFailed {
                url: target.url,
                reason: e.0,
            }
        }
    }
}

/// Asks the host to open the first link of `token` externally.
pub async fn open_url(
    host: &dyn Host,
    token: Option<&str>,
    config: &ResolvedConfig,
) -> ActionOutcome {
    let Some(token) = token else {
        return ActionOutcome::NoToken;
    };
    let Some(target) = first_target(token, config) else {
        return ActionOutcome::NoLink {
            token: token.to_string(),
        };
    };
    match host.open_external(&target.url).await {
        Ok(()) => {
            tracing::info!("opened {} for {}", target.url, token);
            ActionOutcome::Opened { url: target.url }
        }
        Err(e) => {
            tracing::warn!("open failed for {}: {}", target.url, e);
            ActionOutcome::HostFailed {
                url: target.url,
                reason: e.0,
            }
        }
    }
}
