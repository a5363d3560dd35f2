use crate::LspServer;
use ticketlink_core::selection::{clean_token, word_range_at};
use ticketlink_core::{synthesize, LinkTarget};
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;

pub async fn hover(server: &LspServer, params: HoverParams) -> Result<Option<Hover>> {
    let config = server.settings.resolve();
    if !config.hover_enabled {
        return Ok(None);
    }

    let uri = params.text_document_position_params.text_document.uri;
    let position = params.text_document_position_params.position;
    let Some(doc) = server.documents.get(&uri).map(|d| d.value().clone()) else {
        return Ok(None);
    };

    let offset = doc.offset_at(position);
    let Some(span) = word_range_at(&doc.content, offset) else {
        return Ok(None);
    };
    let token = clean_token(&doc.content[span.clone()]);
    let targets = synthesize(token, &config);
    if targets.is_empty() {
        return Ok(None);
    }

    Ok(Some(Hover {
        contents: HoverContents::Markup(MarkupContent {
            kind: MarkupKind::Markdown,
            value: build_hover_text(&targets),
        }),
        range: Some(doc.range_at(span)),
    }))
}

/// One markdown link per line.
fn build_hover_text(targets: &[LinkTarget]) -> String {
    targets
        .iter()
        .map(|t| format!("[{}]({})", t.label, t.url))
        .collect::<Vec<_>>()
        .join("  \n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hover_renders_markdown_links() {
        let text = build_hover_text(&[
            LinkTarget {
                label: "Open in Jira".into(),
                url: "https://x.atlassian.net/browse/ABC-1".into(),
            },
            LinkTarget {
                label: "Open in GitHub".into(),
                url: "https://github.com/o/r/issues/1".into(),
            },
        ]);
        assert_eq!(
            text,
            "[Open in Jira](https://x.atlassian.net/browse/ABC-1)  \n\
             [Open in GitHub](https://github.com/o/r/issues/1)"
        );
    }

    #[test]
    fn hover_for_single_target_has_no_trailing_break() {
        let text = build_hover_text(&[LinkTarget {
            label: "Open in GitHub".into(),
            url: "https://github.com/o/r/pull/9".into(),
        }]);
        assert!(!text.ends_with('\n'));
    }
}
