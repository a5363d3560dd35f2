mod action;
mod link;
mod scan;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use ticketlink_core::{RawSettings, ResolvedConfig};

#[derive(Parser)]
#[command(
    name = "ticketlink",
    version,
    about = "Turns ticket references in text into Jira and GitHub links",
    long_about = "Ticketlink recognizes tracker keys (ABC-123), issue references (#42) and pull request \
                  references (PR-9) in any text and maps them to Jira and GitHub URLs. It runs as a \
                  language server for editors or directly from the command line."
)]
pub struct Cli {
    /// JSON settings file, flat or nested under "ticketlink"
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Jira base URL, e.g. https://company.atlassian.net
    #[arg(long, global = true, env = "TICKETLINK_TRACKER_BASE_URL")]
    pub tracker_base_url: Option<String>,

    /// Repository URL, e.g. https://github.com/owner/repo
    #[arg(long, global = true, env = "TICKETLINK_REPO_BASE_URL")]
    pub repo_base_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the Language Server Protocol (LSP) server on stdio
    Lsp,
    /// List every ticket reference in a file
    #[command(
        long_about = "Scans a file (or stdin when the path is '-') for ticket references and prints \
                            their position, kind and destination URLs."
    )]
    Scan {
        /// File to scan, '-' for stdin
        #[arg(value_name = "FILE")]
        path: PathBuf,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print the links for a single token
    Link {
        #[arg(value_name = "TOKEN")]
        token: String,
    },
    /// Copy the first link for a token to the system clipboard
    Copy {
        #[arg(value_name = "TOKEN")]
        token: String,
    },
    /// Open the first link for a token in the default browser
    Open {
        #[arg(value_name = "TOKEN")]
        token: String,
    },
}

impl Cli {
    /// Settings file first, then flags and environment on top.
    pub fn settings(&self) -> ticketlink_core::Result<RawSettings> {
        let mut raw = match &self.config {
            Some(path) => RawSettings::load(path)?,
            None => RawSettings::default(),
        };
        if let Some(url) = &self.tracker_base_url {
            raw.tracker_base_url = url.clone();
        }
        if let Some(url) = &self.repo_base_url {
            raw.repo_base_url = url.clone();
        }
        Ok(raw)
    }
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let component = match &cli.command {
        Commands::Lsp => "lsp",
        _ => "cli",
    };
    let _guard =
        ticketlink_core::logging::init_logging(component, !matches!(cli.command, Commands::Lsp));

    let rt = tokio::runtime::Runtime::new()?;

    if let Commands::Lsp = cli.command {
        return rt.block_on(ticketlink_lsp::run_server());
    }

    let config = ResolvedConfig::from_settings(&cli.settings()?);
    match cli.command {
        Commands::Lsp => Ok(()),
        Commands::Scan { path, json } => scan::run(&path, &config, json),
        Commands::Link { token } => link::run(&token, &config),
        Commands::Copy { token } => rt.block_on(action::copy(&token, &config)),
        Commands::Open { token } => rt.block_on(action::open(&token, &config)),
    }
}
