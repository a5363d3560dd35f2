pub mod capabilities;
pub mod command;
pub mod host;
pub mod hover;
pub mod lens;
pub mod util;

use crate::util::Document;
use dashmap::DashMap;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use ticketlink_core::config::{LEGACY_SETTINGS_SECTION, SETTINGS_SECTION};
use ticketlink_core::{RawSettings, SettingsStore};
use tokio_util::sync::CancellationToken;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

pub struct LspServer {
    client: Client,
    pub settings: Arc<SettingsStore>,
    pub documents: DashMap<Url, Arc<Document>>,
    supports_configuration: AtomicBool,
    cancel_token: CancellationToken,
}

impl LspServer {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            settings: Arc::new(SettingsStore::default()),
            documents: DashMap::new(),
            supports_configuration: AtomicBool::new(false),
            cancel_token: CancellationToken::new(),
        }
    }

    fn parse_settings(value: Value) -> Option<RawSettings> {
        match RawSettings::from_json_value(value) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("ignoring invalid ticketlink settings: {}", e);
                None
            }
        }
    }

    /// Applies a settings payload. Payloads without any ticketlink settings
    /// leave the store untouched.
    fn apply_settings(&self, value: Value) {
        match Self::parse_settings(value) {
            Some(raw) => {
                self.settings.update(raw);
            }
            None => tracing::debug!("settings payload carries no ticketlink settings"),
        }
    }

    /// Pulls the settings sections from clients that only signal a change
    /// without sending the new values. The first section that carries
    /// settings wins.
    async fn pull_settings(&self) {
        if !self.supports_configuration.load(Ordering::Relaxed) {
            return;
        }
        let items = [SETTINGS_SECTION, LEGACY_SETTINGS_SECTION]
            .into_iter()
            .map(|section| ConfigurationItem {
                scope_uri: None,
                section: Some(section.to_string()),
            })
            .collect();
        match self.client.configuration(items).await {
            Ok(values) => {
                if let Some(raw) = values.into_iter().find_map(Self::parse_settings) {
                    self.settings.update(raw);
                }
            }
            Err(e) => tracing::warn!("workspace/configuration failed: {}", e),
        }
    }

    /// Re-requests code lenses whenever the settings store changes.
    fn spawn_refresh_watcher(&self) {
        let mut rx = self.settings.subscribe();
        let client = self.client.clone();
        let cancel = self.cancel_token.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    changed = rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        if let Err(e) = client.code_lens_refresh().await {
                            tracing::warn!("workspace/codeLens/refresh failed: {}", e);
                        }
                    }
                }
            }
        });
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for LspServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        if let Some(options) = params.initialization_options {
            self.apply_settings(options);
        }
        let supports_configuration = params
            .capabilities
            .workspace
            .as_ref()
            .and_then(|w| w.configuration)
            .unwrap_or(false);
        self.supports_configuration
            .store(supports_configuration, Ordering::Relaxed);

        let config = self.settings.resolve();
        tracing::info!(
            "initialize: hover={} codeLens={} tracker={:?} repo={:?}",
            config.hover_enabled,
            config.annotations_enabled,
            config.tracker_base_url,
            config.repo_base_url
        );

        Ok(InitializeResult {
            server_info: Some(ServerInfo {
                name: "ticketlink".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
            capabilities: capabilities::server_capabilities(&config),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.pull_settings().await;
        self.spawn_refresh_watcher();
    }

    async fn shutdown(&self) -> Result<()> {
        self.cancel_token.cancel();
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let doc = params.text_document;
        self.documents
            .insert(doc.uri, Arc::new(Document::new(doc.text, doc.version)));
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;

        if let Some(mut doc_ref) = self.documents.get_mut(&uri) {
            let doc = doc_ref.value_mut();
            let changes = params
                .content_changes
                .iter()
                .map(|c| (c.range, c.text.as_str()));
            *doc = Arc::new(doc.apply_changes(changes, version));
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        self.client
            .log_message(
                MessageType::LOG,
                format!("LSP Event: did_close uri={}", params.text_document.uri),
            )
            .await;
        self.documents.remove(&params.text_document.uri);
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        self.client
            .log_message(MessageType::LOG, "LSP Event: workspace/didChangeConfiguration")
            .await;
        if params.settings.is_null() {
            self.pull_settings().await;
        } else {
            self.apply_settings(params.settings);
        }
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let pos = params.text_document_position_params.position;
        self.client
            .log_message(
                MessageType::LOG,
                format!(
                    "LSP Request: textDocument/hover uri={} pos={}:{}",
                    uri, pos.line, pos.character
                ),
            )
            .await;
        let result = hover::hover(self, params).await;
        match &result {
            Ok(Some(_)) => {
                self.client
                    .log_message(MessageType::LOG, "LSP Response: found ticket links")
                    .await
            }
            Ok(None) => {
                self.client
                    .log_message(MessageType::LOG, "LSP Response: no ticket at position")
                    .await
            }
            Err(e) => {
                self.client
                    .log_message(MessageType::ERROR, format!("LSP Error: {}", e))
                    .await
            }
        }
        result
    }

    async fn code_lens(&self, params: CodeLensParams) -> Result<Option<Vec<CodeLens>>> {
        self.client
            .log_message(
                MessageType::LOG,
                format!(
                    "LSP Request: textDocument/codeLens uri={}",
                    params.text_document.uri
                ),
            )
            .await;
        let result = lens::code_lens(self, params).await;
        if let Ok(Some(lenses)) = &result {
            self.client
                .log_message(
                    MessageType::LOG,
                    format!("LSP Response: found {} lenses", lenses.len()),
                )
                .await;
        }
        result
    }

    async fn execute_command(&self, params: ExecuteCommandParams) -> Result<Option<Value>> {
        self.client
            .log_message(
                MessageType::LOG,
                format!("LSP Request: workspace/executeCommand {}", params.command),
            )
            .await;
        let result = command::execute(self, params).await;
        if let Err(e) = &result {
            self.client
                .log_message(MessageType::ERROR, format!("LSP Error: {}", e))
                .await;
        }
        result
    }
}

pub async fn run_server() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = tower_lsp::LspService::new(LspServer::new);
    tower_lsp::Server::new(stdin, stdout, socket)
        .serve(service)
        .await;

    Ok(())
}
