//! HTML document parser

use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Node, Selector};

use crate::domain::ingestion::{DocumentMetadata, DocumentParser, ParsedDocument, ParserInput};
use crate::domain::DomainError;

static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());
static BODY: Lazy<Selector> = Lazy::new(|| Selector::parse("body").unwrap());

/// Elements whose text never reaches the document
const SKIPPED: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Elements that start a new line of text
const BLOCKS: &[&str] = &[
    "p", "div", "section", "article", "h1", "h2", "h3", "h4", "h5", "h6", "li", "tr", "br",
    "pre", "blockquote", "table",
];

/// Parser for HTML files
#[derive(Debug, Clone, Default)]
pub struct HtmlParser;

impl HtmlParser {
    pub fn new() -> Self {
        Self
    }

    fn title(document: &Html) -> Option<String> {
        document
            .select(&TITLE)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn body_text(document: &Html) -> String {
        let root = document
            .select(&BODY)
            .next()
            .unwrap_or_else(|| document.root_element());

        let mut out = String::new();
        Self::collect_text(root, &mut out);

        out.lines()
            .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn collect_text(element: ElementRef, out: &mut String) {
        for child in element.children() {
            match child.value() {
                Node::Text(text) => out.push_str(text),
                Node::Element(el) => {
                    let name = el.name();
                    if SKIPPED.contains(&name) {
                        continue;
                    }

                    let block = BLOCKS.contains(&name);
                    if block {
                        out.push('\n');
                    }

                    if let Some(child_el) = ElementRef::wrap(child) {
                        Self::collect_text(child_el, out);
                    }

                    if block {
                        out.push('\n');
                    } else if matches!(name, "td" | "th") {
                        out.push(' ');
                    }
                }
                _ => {}
            }
        }
    }
}

#[async_trait]
impl DocumentParser for HtmlParser {
    fn supported_extensions(&self) -> &[&str] {
        &["html", "htm"]
    }

    async fn parse(&self, input: ParserInput) -> Result<ParsedDocument, DomainError> {
        let raw = input.text()?;
        let document = Html::parse_document(&raw);

        let metadata = DocumentMetadata {
            title: Self::title(&document),
            ..input.metadata(Some("text/html"))
        };

        Ok(ParsedDocument::new(Self::body_text(&document), metadata))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn parse(html: &str) -> ParsedDocument {
        HtmlParser::new()
            .parse(ParserInput::from_text(html))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_parse_simple_html() {
        let result = parse(
            r#"
            <!DOCTYPE html>
            <html>
            <head><title>Warranty Terms</title></head>
            <body>
                <h1>Coverage</h1>
                <p>The warranty   lasts two years.</p>
            </body>
            </html>
        "#,
        )
        .await;

        assert_eq!(result.content, "Coverage\nThe warranty lasts two years.");
        assert_eq!(result.metadata.title, Some("Warranty Terms".to_string()));
        assert_eq!(result.metadata.mime_type, Some("text/html".to_string()));
    }

    #[tokio::test]
    async fn test_parse_html_strips_scripts_and_styles() {
        let result = parse(
            r#"
            <html>
            <head><style>.hidden { display: none; }</style></head>
            <body>
                <p>Visible text</p>
                <script>var x = 'hidden';</script>
                <noscript>enable js</noscript>
                <p>More visible text</p>
            </body>
            </html>
        "#,
        )
        .await;

        assert_eq!(result.content, "Visible text\nMore visible text");
    }

    #[tokio::test]
    async fn test_parse_html_lists_and_inline_elements() {
        let result = parse(
            "<html><body><ul><li>Item <b>one</b></li><li>Item two</li></ul></body></html>",
        )
        .await;

        assert_eq!(result.content, "Item one\nItem two");
        assert!(result.metadata.title.is_none());
    }

    #[tokio::test]
    async fn test_parse_html_table_cells() {
        let result =
            parse("<table><tr><td>Plan</td><td>Price</td></tr><tr><td>Pro</td><td>10</td></tr></table>")
                .await;

        assert_eq!(result.content, "Plan Price\nPro 10");
    }

    #[tokio::test]
    async fn test_parse_html_fragment_without_body() {
        let result = parse("<div><span>Deeply nested</span></div>").await;
        assert_eq!(result.content, "Deeply nested");
    }

    #[test]
    fn test_supported_extensions() {
        let parser = HtmlParser::new();
        assert!(parser.supports_file("page.html"));
        assert!(parser.supports_file("page.htm"));
        assert!(!parser.supports_file("file.txt"));
    }
}
