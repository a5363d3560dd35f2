use crate::error::{Result, TicketlinkError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tokio::sync::watch;

/// Namespace the settings live under in editor configuration payloads.
pub const SETTINGS_SECTION: &str = "ticketlink";
/// Namespace used by the original editor extension, still honored.
pub const LEGACY_SETTINGS_SECTION: &str = "jiraGithubLinker";

const BROWSE_SUFFIX: &str = "/browse/";

fn default_true() -> bool {
    true
}

/// Settings exactly as the user wrote them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSettings {
    #[serde(default, alias = "jiraBaseUrl")]
    pub tracker_base_url: String,
    #[serde(default, alias = "githubRepoUrl")]
    pub repo_base_url: String,
    #[serde(default = "default_true")]
    pub enable_hover: bool,
    #[serde(default = "default_true")]
    pub enable_code_lens: bool,
}

impl Default for RawSettings {
    fn default() -> Self {
        Self {
            tracker_base_url: String::new(),
            repo_base_url: String::new(),
            enable_hover: true,
            enable_code_lens: true,
        }
    }
}

/// Keys a flat settings object may carry, legacy names included.
const SETTINGS_KEYS: [&str; 6] = [
    "trackerBaseUrl",
    "repoBaseUrl",
    "jiraBaseUrl",
    "githubRepoUrl",
    "enableHover",
    "enableCodeLens",
];

impl RawSettings {
    /// Accepts either a flat settings object or one nested under
    /// [`SETTINGS_SECTION`] / [`LEGACY_SETTINGS_SECTION`].
    ///
    /// Returns `None` when the payload carries no ticketlink settings at all
    /// (`null`, or an object with neither a section nor a known key), which
    /// callers treat as "no change".
    pub fn from_json_value(value: Value) -> Result<Option<Self>> {
        let section = match value {
            Value::Null => return Ok(None),
            Value::Object(mut map) => {
                let nested = match map.remove(SETTINGS_SECTION) {
                    Some(Value::Null) | None => map.remove(LEGACY_SETTINGS_SECTION),
                    found => found,
                };
                match nested {
                    Some(inner @ Value::Object(_)) => inner,
                    Some(Value::Null) | None => {
                        if !SETTINGS_KEYS.iter().any(|key| map.contains_key(*key)) {
                            return Ok(None);
                        }
                        Value::Object(map)
                    }
                    Some(other) => {
                        return Err(TicketlinkError::Config(format!(
                            "`{}` must be an object, got {}",
                            SETTINGS_SECTION, other
                        )));
                    }
                }
            }
            other => {
                return Err(TicketlinkError::Config(format!(
                    "settings must be a JSON object, got {}",
                    other
                )));
            }
        };
        Ok(Some(serde_json::from_value(section)?))
    }

    /// Reads a JSON settings file. A file without ticketlink settings yields
    /// the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&content)?;
        Ok(Self::from_json_value(value)?.unwrap_or_default())
    }
}

/// Settings after normalization. Recomputed for every query, never cached
/// across configuration changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfig {
    pub tracker_base_url: String,
    pub repo_base_url: String,
    pub hover_enabled: bool,
    pub annotations_enabled: bool,
}

impl ResolvedConfig {
    pub fn from_settings(raw: &RawSettings) -> Self {
        Self {
            tracker_base_url: normalize_tracker_base(&raw.tracker_base_url),
            repo_base_url: normalize_repo_base(&raw.repo_base_url),
            hover_enabled: raw.enable_hover,
            annotations_enabled: raw.enable_code_lens,
        }
    }

    pub fn has_tracker(&self) -> bool {
        !self.tracker_base_url.is_empty()
    }

    pub fn has_repo(&self) -> bool {
        !self.repo_base_url.is_empty()
    }

    pub fn has_any_base(&self) -> bool {
        self.has_tracker() || self.has_repo()
    }
}

/// `https://x.atlassian.net` -> `https://x.atlassian.net/browse/`.
pub fn normalize_tracker_base(raw: &str) -> String {
    let mut base = raw.trim().to_string();
    if base.is_empty() || base.ends_with(BROWSE_SUFFIX) {
        return base;
    }
    if !base.ends_with('/') {
        base.push('/');
    }
    if !base.ends_with("browse/") {
        base.push_str("browse/");
    }
    base
}

/// `https://github.com/o/r` -> `https://github.com/o/r/`.
pub fn normalize_repo_base(raw: &str) -> String {
    let mut base = raw.trim().to_string();
    if !base.is_empty() && !base.ends_with('/') {
        base.push('/');
    }
    base
}

/// Owner of the current settings snapshot and the single change channel.
///
/// Readers call [`SettingsStore::resolve`] per query; surfaces that cache
/// presentation subscribe and re-request when notified.
pub struct SettingsStore {
    tx: watch::Sender<RawSettings>,
}

impl SettingsStore {
    pub fn new(initial: RawSettings) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn resolve(&self) -> ResolvedConfig {
        ResolvedConfig::from_settings(&self.tx.borrow())
    }

    /// Replaces the snapshot. Subscribers are notified only when something
    /// actually changed; the return value says whether that happened.
    pub fn update(&self, raw: RawSettings) -> bool {
        let changed = self.tx.send_if_modified(|current| {
            if *current == raw {
                false
            } else {
                *current = raw;
                true
            }
        });
        if changed {
            tracing::info!("ticketlink settings changed");
        }
        changed
    }

    pub fn subscribe(&self) -> watch::Receiver<RawSettings> {
        self.tx.subscribe()
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(RawSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tracker_base_gets_browse_suffix() {
        assert_eq!(
            normalize_tracker_base("https://x.atlassian.net"),
            "https://x.atlassian.net/browse/"
        );
        assert_eq!(
            normalize_tracker_base("  https://x.atlassian.net/  "),
            "https://x.atlassian.net/browse/"
        );
        assert_eq!(
            normalize_tracker_base("https://x.atlassian.net/browse"),
            "https://x.atlassian.net/browse/"
        );
        assert_eq!(
            normalize_tracker_base("https://x.atlassian.net/browse/"),
            "https://x.atlassian.net/browse/"
        );
        assert_eq!(normalize_tracker_base("   "), "");
    }

    #[test]
    fn repo_base_gets_single_trailing_slash() {
        assert_eq!(
            normalize_repo_base("https://github.com/o/r"),
            "https://github.com/o/r/"
        );
        assert_eq!(
            normalize_repo_base("https://github.com/o/r/"),
            "https://github.com/o/r/"
        );
        assert_eq!(normalize_repo_base(""), "");
    }

    #[test]
    fn normalization_is_idempotent() {
        let inputs = [
            "",
            "https://x.atlassian.net",
            "https://x.atlassian.net/",
            "https://x.atlassian.net/browse",
            "https://x.atlassian.net/browse/",
            " https://github.com/o/r ",
            "https://github.com/o/r/",
        ];
        for input in inputs {
            let once = normalize_tracker_base(input);
            assert_eq!(normalize_tracker_base(&once), once, "tracker {input:?}");
            assert!(!once.contains("browse/browse/"));
            let once = normalize_repo_base(input);
            assert_eq!(normalize_repo_base(&once), once, "repo {input:?}");
        }
    }

    #[test]
    fn settings_defaults_enable_both_surfaces() {
        let raw = RawSettings::from_json_value(json!({ "ticketlink": {} }))
            .unwrap()
            .unwrap();
        assert_eq!(raw, RawSettings::default());
        let resolved = ResolvedConfig::from_settings(&raw);
        assert!(resolved.hover_enabled);
        assert!(resolved.annotations_enabled);
        assert!(!resolved.has_any_base());
    }

    #[test]
    fn settings_accept_namespaced_and_legacy_keys() {
        let raw = RawSettings::from_json_value(json!({
            "ticketlink": { "trackerBaseUrl": "https://x.atlassian.net", "enableHover": false }
        }))
        .unwrap()
        .unwrap();
        assert_eq!(raw.tracker_base_url, "https://x.atlassian.net");
        assert!(!raw.enable_hover);

        let legacy = RawSettings::from_json_value(json!({
            "jiraGithubLinker": { "jiraBaseUrl": "https://j", "githubRepoUrl": "https://g/o/r" }
        }))
        .unwrap()
        .unwrap();
        assert_eq!(legacy.tracker_base_url, "https://j");
        assert_eq!(legacy.repo_base_url, "https://g/o/r");
    }

    #[test]
    fn settings_reject_non_objects() {
        assert!(RawSettings::from_json_value(json!("nope")).is_err());
        assert!(RawSettings::from_json_value(json!({ "ticketlink": 3 })).is_err());
    }

    #[test]
    fn payloads_without_ticketlink_settings_mean_no_change() {
        assert_eq!(RawSettings::from_json_value(Value::Null).unwrap(), None);
        assert_eq!(RawSettings::from_json_value(json!({})).unwrap(), None);
        assert_eq!(
            RawSettings::from_json_value(json!({ "editor": { "tabSize": 4 } })).unwrap(),
            None
        );
        assert_eq!(
            RawSettings::from_json_value(json!({ "ticketlink": null, "editor": {} })).unwrap(),
            None
        );

        let flat = RawSettings::from_json_value(json!({ "repoBaseUrl": "https://github.com/o/r" }))
            .unwrap()
            .unwrap();
        assert_eq!(flat.repo_base_url, "https://github.com/o/r");

        let legacy_after_null = RawSettings::from_json_value(json!({
            "ticketlink": null,
            "jiraGithubLinker": { "jiraBaseUrl": "https://j" }
        }))
        .unwrap()
        .unwrap();
        assert_eq!(legacy_after_null.tracker_base_url, "https://j");
    }

    #[test]
    fn store_notifies_only_on_change() {
        let store = SettingsStore::default();
        let mut rx = store.subscribe();
        assert!(!store.update(RawSettings::default()));
        assert!(!rx.has_changed().unwrap());

        let raw = RawSettings {
            repo_base_url: "https://github.com/o/r".into(),
            ..RawSettings::default()
        };
        assert!(store.update(raw));
        assert!(rx.has_changed().unwrap());
        assert_eq!(store.resolve().repo_base_url, "https://github.com/o/r/");
    }
}
