use scraper::{Html, Selector};

/// Markup extraction capability consumed by the token weightor only.
/// Weighted tags are read with `extract_by_tag`, then everything else with
/// `text_without_tags` so tagged text is never counted twice.
pub trait MarkupParser: Send + Sync {
    /// Concatenated text of every element matching `tag`, space-joined.
    fn extract_by_tag(&self, content: &str, tag: &str) -> String;

    /// Document text with the given tags' subtrees removed.
    fn text_without_tags(&self, content: &str, tags: &[&str]) -> String;
}

/// Default parser backed by an HTML5 tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlParser;

impl MarkupParser for HtmlParser {
    fn extract_by_tag(&self, content: &str, tag: &str) -> String {
        let sel = match Selector::parse(tag) {
            Ok(sel) => sel,
            Err(_) => return String::new(),
        };
        let doc = Html::parse_document(content);
        doc.select(&sel)
            .map(|el| el.text().collect::<String>())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn text_without_tags(&self, content: &str, tags: &[&str]) -> String {
        let doc = Html::parse_document(content);
        let mut out = String::new();
        for node in doc.tree.root().descendants() {
            let Some(text) = node.value().as_text() else { continue };
            let excluded = node.ancestors().any(|a| {
                a.value()
                    .as_element()
                    .map_or(false, |el| tags.contains(&el.name()))
            });
            if !excluded {
                out.push_str(&text.text);
                out.push(' ');
            }
        }
        out
    }
}
