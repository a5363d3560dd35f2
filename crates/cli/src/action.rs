use ticketlink_core::action::{self, ActionOutcome, Host, HostError, MessageLevel};
use ticketlink_core::ResolvedConfig;

/// Clipboard and browser of the local machine.
struct SystemHost;

#[async_trait::async_trait]
impl Host for SystemHost {
    async fn write_clipboard(&self, text: &str) -> Result<(), HostError> {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| HostError(format!("Failed to access clipboard: {}", e)))?;
        clipboard
            .set_text(text)
            .map_err(|e| HostError(format!("Failed to copy to clipboard: {}", e)))
    }

    async fn open_external(&self, url: &str) -> Result<(), HostError> {
        webbrowser::open(url).map_err(|e| HostError(format!("Failed to open browser: {}", e)))
    }
}

pub async fn copy(token: &str, config: &ResolvedConfig) -> Result<(), Box<dyn std::error::Error>> {
    report(action::copy_url(&SystemHost, Some(token), config).await)
}

pub async fn open(token: &str, config: &ResolvedConfig) -> Result<(), Box<dyn std::error::Error>> {
    report(action::open_url(&SystemHost, Some(token), config).await)
}

fn report(outcome: ActionOutcome) -> Result<(), Box<dyn std::error::Error>> {
    if let ActionOutcome::Opened { url } = &outcome {
        println!("Opened: {}", url);
    }
    match outcome.message() {
        Some((MessageLevel::Info, message)) => println!("{}", message),
        Some((MessageLevel::Warning, message)) => return Err(message.into()),
        None => {}
    }
    Ok(())
}
