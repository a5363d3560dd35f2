pub mod action;
pub mod config;
pub mod error;
pub mod link;
pub mod logging;
pub mod pattern;
pub mod scanner;
pub mod selection;
pub mod text;

pub use config::{RawSettings, ResolvedConfig, SettingsStore};
pub use error::{Result, TicketlinkError};
pub use link::{LinkTarget, synthesize};
pub use pattern::{TokenKind, classify};
pub use scanner::{MatchCandidate, ScanHit, scan};
pub use selection::{Selection, resolve_selection};
pub use text::LineIndex;
