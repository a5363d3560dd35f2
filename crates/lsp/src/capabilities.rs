use crate::command::COMMANDS;
use ticketlink_core::ResolvedConfig;
use tower_lsp::lsp_types::*;

/// Hover and code lens are only advertised when their toggle is on at
/// startup.
pub fn server_capabilities(config: &ResolvedConfig) -> ServerCapabilities {
    ServerCapabilities {
        text_document_sync: Some(TextDocumentSyncCapability::Kind(
            TextDocumentSyncKind::INCREMENTAL,
        )),
        hover_provider: config
            .hover_enabled
            .then_some(HoverProviderCapability::Simple(true)),
        code_lens_provider: config.annotations_enabled.then_some(CodeLensOptions {
            resolve_provider: Some(false),
        }),
        execute_command_provider: Some(ExecuteCommandOptions {
            commands: COMMANDS.iter().map(|c| c.to_string()).collect(),
            work_done_progress_options: WorkDoneProgressOptions::default(),
        }),
        ..Default::default()
    }
}
