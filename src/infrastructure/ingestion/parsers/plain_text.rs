//! `.txt` files

use async_trait::async_trait;

use crate::domain::ingestion::{DocumentParser, ParsedDocument, ParserInput};
use crate::domain::DomainError;

/// Strict UTF-8; the text is kept exactly as written, line endings included
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextParser;

impl PlainTextParser {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentParser for PlainTextParser {
    fn supported_extensions(&self) -> &[&str] {
        &["txt", "text"]
    }

    async fn parse(&self, input: ParserInput) -> Result<ParsedDocument, DomainError> {
        let text = input.text()?;
        Ok(ParsedDocument::new(text, input.metadata(Some("text/plain"))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_text_is_untouched() {
        let raw = "Opening hours:\r\n  Mon-Fri 9-17\n\n\tSat closed ";
        let parsed = PlainTextParser::new()
            .parse(ParserInput::from_text(raw))
            .await
            .unwrap();

        assert_eq!(parsed.content, raw);
        assert_eq!(parsed.metadata.mime_type.as_deref(), Some("text/plain"));
        assert!(parsed.metadata.source.is_none());
    }

    #[tokio::test]
    async fn test_source_comes_from_filename() {
        let input = ParserInput::from_bytes(b"Refunds take 5 days.".to_vec()).with_filename("policies/refunds.txt");

        let parsed = PlainTextParser::new().parse(input).await.unwrap();

        assert_eq!(parsed.metadata.source.as_deref(), Some("policies/refunds.txt"));
    }

    #[tokio::test]
    async fn test_latin1_bytes_are_a_parse_error() {
        let input = ParserInput::from_bytes(b"caf\xe9".to_vec()).with_filename("menu.txt");

        let err = PlainTextParser::new().parse(input).await.unwrap_err();
        assert!(matches!(err, DomainError::Parse { ref source_name, .. } if source_name == "menu.txt"));
    }

    #[test]
    fn test_extensions() {
        let parser = PlainTextParser::new();
        assert!(parser.supports_file("notes.TXT"));
        assert!(parser.supports_file("notes.text"));
        assert!(!parser.supports_file("notes.md"));
    }
}
