use crate::host::LspHost;
use crate::util::Document;
use crate::LspServer;
use serde::Deserialize;
use serde_json::Value;
use ticketlink_core::action::{self, ActionOutcome, MessageLevel};
use ticketlink_core::{resolve_selection, Selection};
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;

pub const COPY_URL: &str = "ticketlink.copyUrl";
pub const OPEN_URL: &str = "ticketlink.openUrl";
pub const COMMANDS: [&str; 2] = [COPY_URL, OPEN_URL];

/// First command argument: either the token itself or where the user's
/// selection (or cursor) is.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CommandTarget {
    Token(String),
    Selection(SelectionArgs),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionArgs {
    pub text_document: TextDocumentIdentifier,
    pub range: Option<Range>,
    pub position: Option<Position>,
}

impl CommandTarget {
    pub fn from_arguments(arguments: &[Value]) -> Option<Self> {
        let first = arguments.first()?;
        match serde_json::from_value(first.clone()) {
            Ok(target) => Some(target),
            Err(e) => {
                tracing::warn!("ignoring malformed command argument {}: {}", first, e);
                None
            }
        }
    }
}

/// Token for a selection inside `doc`, converting LSP positions first.
pub fn token_from_selection(doc: &Document, args: &SelectionArgs) -> Option<String> {
    let selection = match (args.range, args.position) {
        (Some(range), _) => Selection::Range(doc.offset_at(range.start)..doc.offset_at(range.end)),
        (None, Some(position)) => Selection::Cursor(doc.offset_at(position)),
        (None, None) => return None,
    };
    resolve_selection(&doc.content, selection)
}

fn resolve_token(server: &LspServer, target: Option<CommandTarget>) -> Option<String> {
    match target? {
        CommandTarget::Token(token) => (!token.is_empty()).then_some(token),
        CommandTarget::Selection(args) => {
            let doc = server
                .documents
                .get(&args.text_document.uri)
                .map(|d| d.value().clone())?;
            token_from_selection(&doc, &args)
        }
    }
}

pub async fn execute(server: &LspServer, params: ExecuteCommandParams) -> Result<Option<Value>> {
    let target = CommandTarget::from_arguments(&params.arguments);
    let token = resolve_token(server, target);
    let config = server.settings.resolve();
    let host = LspHost::new(server.client.clone());

    let outcome = match params.command.as_str() {
        COPY_URL => action::copy_url(&host, token.as_deref(), &config).await,
        OPEN_URL => action::open_url(&host, token.as_deref(), &config).await,
        other => {
            return Err(tower_lsp::jsonrpc::Error::invalid_params(format!(
                "unknown command: {}",
                other
            )));
        }
    };

    report(server, &outcome).await;
    Ok(match outcome {
        ActionOutcome::Copied { url } | ActionOutcome::Opened { url } => Some(Value::String(url)),
        _ => None,
    })
}

async fn report(server: &LspServer, outcome: &ActionOutcome) {
    if let Some((level, message)) = outcome.message() {
        let kind = match level {
            MessageLevel::Info => MessageType::INFO,
            MessageLevel::Warning => MessageType::WARNING,
        };
        server.client.show_message(kind, message).await;
    }
}
