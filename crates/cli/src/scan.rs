use serde::Serialize;
use std::io::Read;
use std::path::Path;
use tabled::{Table, Tabled};
use ticketlink_core::{scan, synthesize, LineIndex, LinkTarget, ResolvedConfig, TokenKind};

#[derive(Debug, Serialize)]
struct ScanEntry {
    line: usize,
    column: usize,
    kind: TokenKind,
    token: String,
    links: Vec<LinkTarget>,
}

#[derive(Tabled)]
struct ScanRow {
    #[tabled(rename = "Line")]
    line: usize,
    #[tabled(rename = "Col")]
    column: usize,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Token")]
    token: String,
    #[tabled(rename = "Links")]
    links: String,
}

pub fn run(path: &Path, config: &ResolvedConfig, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let text = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)?
    };

    if !config.has_any_base() {
        tracing::warn!("no tracker or repository URL configured; nothing can be linked");
    }

    let entries = collect_entries(&text, config);
    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No ticket references found.");
        return Ok(());
    }

    let rows: Vec<ScanRow> = entries
        .into_iter()
        .map(|e| ScanRow {
            line: e.line,
            column: e.column,
            kind: e.kind.to_string(),
            token: e.token,
            links: if e.links.is_empty() {
                "-".to_string()
            } else {
                e.links
                    .iter()
                    .map(|l| l.url.as_str())
                    .collect::<Vec<_>>()
                    .join("\n")
            },
        })
        .collect();
    println!("{}", Table::new(rows));
    Ok(())
}

/// Hits in document order with 1-based line/column (in characters).
fn collect_entries(text: &str, config: &ResolvedConfig) -> Vec<ScanEntry> {
    let lines = LineIndex::new(text);
    let mut entries: Vec<(usize, ScanEntry)> = scan(text, config)
        .map(|hit| {
            let start = hit.candidate.start;
            let line = lines.line_of(start);
            let entry = ScanEntry {
                line: line + 1,
                column: text[lines.line_start(line)..start].chars().count() + 1,
                kind: hit.kind,
                links: synthesize(&hit.candidate.matched_text, config),
                token: hit.candidate.matched_text,
            };
            (start, entry)
        })
        .collect();
    entries.sort_by_key(|(start, _)| *start);
    entries.into_iter().map(|(_, e)| e).collect()
}
