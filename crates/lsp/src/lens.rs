use crate::command::{COPY_URL, OPEN_URL};
use crate::util::Document;
use crate::LspServer;
use serde_json::Value;
use ticketlink_core::{scan, synthesize, ResolvedConfig};
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;

pub const COPY_TITLE: &str = "Copy URL";

pub async fn code_lens(server: &LspServer, params: CodeLensParams) -> Result<Option<Vec<CodeLens>>> {
    let config = server.settings.resolve();
    if !config.annotations_enabled {
        return Ok(None);
    }
    let Some(doc) = server
        .documents
        .get(&params.text_document.uri)
        .map(|d| d.value().clone())
    else {
        return Ok(None);
    };
    Ok(Some(build_lenses(&doc, &config)))
}

/// For every token in the document: one lens per link target, then a copy
/// lens.
pub fn build_lenses(doc: &Document, config: &ResolvedConfig) -> Vec<CodeLens> {
    let mut lenses = Vec::new();
    for hit in scan(&doc.content, config) {
        let token = hit.candidate.matched_text.as_str();
        let range = doc.range_at(hit.candidate.range());
        for target in synthesize(token, config) {
            lenses.push(lens(range, target.label, OPEN_URL, token));
        }
        lenses.push(lens(range, COPY_TITLE.to_string(), COPY_URL, token));
    }
    lenses
}

fn lens(range: Range, title: String, command: &str, token: &str) -> CodeLens {
    CodeLens {
        range,
        command: Some(Command {
            title,
            command: command.to_string(),
            arguments: Some(vec![Value::String(token.to_string())]),
        }),
        data: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticketlink_core::RawSettings;

    fn config(tracker: &str, repo: &str) -> ResolvedConfig {
        ResolvedConfig::from_settings(&RawSettings {
            tracker_base_url: tracker.into(),
            repo_base_url: repo.into(),
            ..RawSettings::default()
        })
    }

    fn lenses_for(text: &str, config: &ResolvedConfig) -> Vec<CodeLens> {
        build_lenses(&Document::new(text.to_string(), 1), config)
    }

    fn titles(lenses: &[CodeLens]) -> Vec<&str> {
        lenses
            .iter()
            .filter_map(|l| l.command.as_ref())
            .map(|c| c.title.as_str())
            .collect()
    }

    #[test]
    fn each_token_gets_open_and_copy_lenses() {
        let lenses = lenses_for("ABC-1\nsee #2", &config("https://j", "https://g/o/r"));
        assert_eq!(
            titles(&lenses),
            vec!["Open in Jira", COPY_TITLE, "Open in GitHub", COPY_TITLE]
        );
        assert_eq!(
            lenses[2].range,
            Range::new(Position::new(1, 4), Position::new(1, 6))
        );
        let cmd = lenses[3].command.as_ref().unwrap();
        assert_eq!(cmd.command, COPY_URL);
        assert_eq!(cmd.arguments, Some(vec![Value::String("#2".into())]));
    }

    #[test]
    fn tokens_without_base_still_get_a_copy_lens() {
        let lenses = lenses_for("ABC-1 PR-2", &config("", "https://g/o/r"));
        assert_eq!(titles(&lenses), vec![COPY_TITLE, "Open in GitHub", COPY_TITLE]);
        assert_eq!(
            lenses[0].range,
            Range::new(Position::new(0, 0), Position::new(0, 5))
        );
        assert_eq!(
            lenses[1].range,
            Range::new(Position::new(0, 6), Position::new(0, 10))
        );
    }

    #[test]
    fn nothing_configured_means_no_lenses() {
        assert!(lenses_for("ABC-1 #2 PR-3", &config("", "")).is_empty());
    }

    #[test]
    fn large_documents_map_every_hit_to_its_line() {
        let lines = 20_000;
        let text: String = (0..lines)
            .map(|i| format!("log line {i} ABC-{i}\n"))
            .collect();
        let lenses = lenses_for(&text, &config("https://j", ""));
        assert_eq!(lenses.len(), lines * 2);

        let last = lines - 1;
        let column = format!("log line {last} ").len() as u32;
        let width = format!("ABC-{last}").len() as u32;
        assert_eq!(
            lenses.last().unwrap().range,
            Range::new(
                Position::new(last as u32, column),
                Position::new(last as u32, column + width)
            )
        );
    }
}
