//! HTML-to-text conversion for bodies that only had an HTML part.

use scraper::Html;

/// Elements whose text never reaches the reader.
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "head", "title", "noscript"];

/// Converts markup left in a body to plain text.
pub trait HtmlToText: Send + Sync {
    fn convert(&self, html: &str) -> String;
}

/// Default converter backed by `scraper`'s html5ever parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScraperHtmlToText;

impl HtmlToText for ScraperHtmlToText {
    fn convert(&self, html: &str) -> String {
        html_to_text(html)
    }
}

/// Collect every visible text node, one per line, trimmed overall.
///
/// Plain text parses to a single text node, so it comes back unchanged apart
/// from entity decoding and trimming.
pub fn html_to_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let texts: Vec<&str> = fragment
        .root_element()
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node
                .parent()
                .and_then(|p| p.value().as_element().map(|el| el.name()))
                .is_some_and(|name| SKIPPED_ELEMENTS.contains(&name));
            (!hidden).then_some(&**text)
        })
        .collect();

    texts.join("\n").trim().to_string()
}
