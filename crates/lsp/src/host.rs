use ticketlink_core::action::{Host, HostError};
use tower_lsp::lsp_types::{ShowDocumentParams, Url};
use tower_lsp::Client;

/// Editor-side effects: the browser is opened by the client, the clipboard
/// is the one of the machine running the server.
pub struct LspHost {
    client: Client,
}

impl LspHost {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[tower_lsp::async_trait]
impl Host for LspHost {
    async fn write_clipboard(&self, text: &str) -> Result<(), HostError> {
        let text = text.to_string();
        tokio::task::spawn_blocking(move || {
            let mut clipboard = arboard::Clipboard::new()
                .map_err(|e| HostError(format!("Failed to access clipboard: {}", e)))?;
            clipboard
                .set_text(text)
                .map_err(|e| HostError(format!("Failed to copy to clipboard: {}", e)))
        })
        .await
        .map_err(|e| HostError(format!("Clipboard task failed: {}", e)))?
    }

    async fn open_external(&self, url: &str) -> Result<(), HostError> {
        let uri = Url::parse(url).map_err(|e| HostError(format!("Invalid URL: {}", e)))?;
        let shown = self
            .client
            .show_document(ShowDocumentParams {
                uri,
                external: Some(true),
                take_focus: Some(true),
                selection: None,
            })
            .await
            .map_err(|e| HostError(e.to_string()))?;
        if shown {
            Ok(())
        } else {
            Err(HostError("the editor declined to open the URL".to_string()))
        }
    }
}
