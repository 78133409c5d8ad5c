//! Markdown document parser

use async_trait::async_trait;
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag};

use crate::domain::ingestion::{DocumentMetadata, DocumentParser, ParsedDocument, ParserInput};
use crate::domain::DomainError;

/// Parser for Markdown files; the first H1 becomes the title
#[derive(Debug, Clone, Default)]
pub struct MarkdownParser;

/// Plain text rendering of a Markdown source
struct Rendered {
    text: String,
    title: Option<String>,
}

impl MarkdownParser {
    pub fn new() -> Self {
        Self
    }

    fn render(markdown: &str) -> Rendered {
        let mut text = String::new();
        let mut title = None;
        let mut heading: Option<(HeadingLevel, String)> = None;

        for event in Parser::new(markdown) {
            match event {
                Event::Start(Tag::Heading(level, ..)) => {
                    heading = Some((level, String::new()));
                }
                Event::End(Tag::Heading(..)) => {
                    if let Some((level, content)) = heading.take() {
                        let content = content.trim().to_string();
                        if level == HeadingLevel::H1 && title.is_none() {
                            title = Some(content.clone());
                        }
                        new_line(&mut text);
                        text.push_str(&content);
                        text.push('\n');
                    }
                }
                Event::Text(t) | Event::Code(t) => match heading {
                    Some((_, ref mut content)) => content.push_str(&t),
                    None => text.push_str(&t),
                },
                Event::SoftBreak | Event::HardBreak => match heading {
                    Some((_, ref mut content)) => content.push(' '),
                    None => text.push(' '),
                },
                Event::Start(Tag::Item) => {
                    new_line(&mut text);
                    text.push_str("- ");
                }
                Event::Start(Tag::Paragraph | Tag::CodeBlock(_) | Tag::BlockQuote) => {
                    new_line(&mut text);
                }
                Event::End(Tag::Paragraph | Tag::CodeBlock(_) | Tag::Item) => {
                    new_line(&mut text);
                }
                _ => {}
            }
        }

        let text = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        Rendered { text, title }
    }
}

fn new_line(text: &mut String) {
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
}

#[async_trait]
impl DocumentParser for MarkdownParser {
    fn supported_extensions(&self) -> &[&str] {
        &["md", "markdown"]
    }

    async fn parse(&self, input: ParserInput) -> Result<ParsedDocument, DomainError> {
        let raw = input.text()?;
        let rendered = Self::render(&raw);

        let metadata = DocumentMetadata {
            title: rendered.title,
            ..input.metadata(Some("text/markdown"))
        };

        Ok(ParsedDocument::new(rendered.text, metadata))
    }
}
